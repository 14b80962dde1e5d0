//! Table columns
//!
//! A column is either a **data** column, bound to a record field and
//! sortable, or a **virtual** column that renders something computed from
//! the whole row and can never be sorted.

use chrono::FixedOffset;

use lv_core::types::{FieldValue, Record};

use crate::annotate::ActionAnnotator;
use crate::controller::{HeaderState, TableSortController};
use crate::sorts::attributes;
use crate::temporal::parse_instant;

/// Horizontal alignment of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    Left,
    #[default]
    Center,
    Right,
}

/// How a cell turns its value into text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellFormat {
    /// The value's string form; nested values as JSON
    #[default]
    Plain,
    /// `DD/MM/YYYY HH:MM`, unparseable values as-is
    DateTime,
    /// Label of the classified `action_type`
    ActionLabel,
    /// Amount signed by the row's action, e.g. `+ 100 ₪`
    SignedAmount,
    /// `₪ 100`
    Shekel,
    /// `100 ₪`
    Balance,
    /// Display name of a payment request status
    RequestStatus,
    /// Display name of a user role
    Role,
    /// Approve/reject hint for pending requests
    RequestActions,
}

/// Column type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    /// Bound to a record field
    Data,
    /// Computed from the row
    Virtual,
}

/// A table column definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Record field, `None` for virtual columns
    pub key: Option<String>,
    /// Header caption
    pub label: String,
    pub align: Align,
    pub format: CellFormat,
}

impl Column {
    /// Create a data column bound to `key`
    pub fn data(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            label: label.into(),
            align: Align::Center,
            format: CellFormat::Plain,
        }
    }

    /// Create a virtual column
    pub fn computed(label: impl Into<String>, format: CellFormat) -> Self {
        Self {
            key: None,
            label: label.into(),
            align: Align::Center,
            format,
        }
    }

    pub fn with_align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn with_format(mut self, format: CellFormat) -> Self {
        self.format = format;
        self
    }

    pub fn column_type(&self) -> ColumnType {
        match self.key {
            Some(_) => ColumnType::Data,
            None => ColumnType::Virtual,
        }
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Check whether the header sorts, given the table's sort settings
    pub fn is_sortable(&self, table_sortable: bool, controlled: bool) -> bool {
        self.key.is_some() && (table_sortable || controlled)
    }

    /// Raw value of this column in `record`; virtual columns have none
    pub fn value<'r>(&self, record: &'r Record) -> Option<&'r FieldValue> {
        self.key.as_deref().map(|key| record.get(key))
    }

    /// Cell text for `record`
    pub fn render(&self, record: &Record, ctx: &RenderContext) -> String {
        let absent = FieldValue::Absent;
        let value = self.value(record).unwrap_or(&absent);
        match self.format {
            CellFormat::Plain => value.to_text(),
            CellFormat::DateTime => match value.as_str().and_then(|s| parse_instant(s, &ctx.offset)) {
                Some(instant) => instant.format("%d/%m/%Y %H:%M").to_string(),
                None => value.to_text(),
            },
            CellFormat::ActionLabel => ctx.actions.meta_for(record).label,
            CellFormat::SignedAmount => ctx.actions.meta_for(record).signed_amount(value),
            CellFormat::Shekel => format!("₪ {}", value.to_text()),
            CellFormat::Balance => format!("{} ₪", value.to_text()),
            CellFormat::RequestStatus => match value.as_str() {
                Some("pending") => "Pending",
                Some("approved") => "Approved",
                _ => "Rejected",
            }
            .to_string(),
            CellFormat::Role => match value.as_str() {
                Some("admin") => "Admin",
                _ => "User",
            }
            .to_string(),
            CellFormat::RequestActions => {
                if record.get(attributes::STATUS).as_str() == Some("pending") {
                    "approve | reject".to_string()
                } else {
                    "no actions".to_string()
                }
            }
        }
    }
}

/// Settings shared by every cell of one render pass
#[derive(Debug, Clone)]
pub struct RenderContext {
    /// Offset timestamps are shown in
    pub offset: FixedOffset,
    pub actions: ActionAnnotator,
}

impl RenderContext {
    pub fn new(offset: FixedOffset) -> Self {
        Self {
            offset,
            actions: ActionAnnotator::default(),
        }
    }
}

/// Header cell as a view draws it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub label: String,
    pub align: Align,
    /// `None` for headers that do not sort
    pub sort: Option<HeaderState>,
}

/// Ordered columns of a table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnSet {
    columns: Vec<Column>,
}

impl ColumnSet {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    pub fn push(&mut self, column: Column) {
        self.columns.push(column);
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Find a data column by field
    pub fn get(&self, key: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.key() == Some(key))
    }

    /// Fields of the data columns, in order
    pub fn keys(&self) -> Vec<&str> {
        self.columns.iter().filter_map(Column::key).collect()
    }

    /// Headers with sort indicators from `controller`
    pub fn headers(&self, controller: &TableSortController, table_sortable: bool) -> Vec<Header> {
        self.columns
            .iter()
            .map(|column| Header {
                label: column.label.clone(),
                align: column.align,
                sort: column
                    .is_sortable(table_sortable, controller.is_controlled())
                    .then(|| column.key().map(|key| controller.header_state(key)))
                    .flatten(),
            })
            .collect()
    }

    /// Cell texts of one row
    pub fn render_row(&self, record: &Record, ctx: &RenderContext) -> Vec<String> {
        self.columns.iter().map(|c| c.render(record, ctx)).collect()
    }
}

/// Column sets of the dashboard tables
pub mod standard {
    use super::*;

    pub fn transactions() -> ColumnSet {
        ColumnSet::new(vec![
            Column::data(attributes::TRANSACTION_DATE, "Date").with_format(CellFormat::DateTime),
            Column::data(attributes::ACTION_TYPE, "Action").with_format(CellFormat::ActionLabel),
            Column::data(attributes::DESCRIPTION, "Description"),
            Column::data(attributes::AMOUNT, "Amount").with_format(CellFormat::SignedAmount),
        ])
    }

    pub fn users() -> ColumnSet {
        ColumnSet::new(vec![
            Column::data(attributes::NAME, "Name").with_align(Align::Right),
            Column::data(attributes::PHONE, "Phone"),
            Column::data(attributes::ID_NUM, "ID number"),
            Column::data(attributes::BALANCE, "Balance")
                .with_align(Align::Left)
                .with_format(CellFormat::Balance),
            Column::data(attributes::ROLE, "Role").with_format(CellFormat::Role),
        ])
    }

    pub fn payment_requests(with_actions: bool) -> ColumnSet {
        let mut set = ColumnSet::new(vec![
            Column::data(attributes::STATUS, "Status").with_format(CellFormat::RequestStatus),
            Column::data(attributes::DATE, "Date").with_format(CellFormat::DateTime),
            Column::data(attributes::NAME, "Name"),
            Column::data(attributes::PHONE, "Phone"),
            Column::data(attributes::AMOUNT, "Amount").with_format(CellFormat::Shekel),
        ]);
        if with_actions {
            set.push(Column::computed("Actions", CellFormat::RequestActions));
        }
        set
    }
}
