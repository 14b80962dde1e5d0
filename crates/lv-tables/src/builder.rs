//! Table Query Builder
//!
//! Provides a fluent API for constructing table queries, plus the presets
//! the dashboard ships with.

use chrono::NaiveDate;

use crate::columns::{standard, ColumnSet};
use crate::filters::DateFilterSpec;
use crate::query::{TableKind, TableQuery};
use crate::sorts::{attributes, SortDirection, SortSpec};
use crate::status::StatusFilter;

/// Builder for constructing table queries fluently
#[derive(Debug, Default)]
pub struct TableQueryBuilder {
    kind: TableKind,
    columns: Option<ColumnSet>,
    date_filter: DateFilterSpec,
    status: StatusFilter,
    sort: SortSpec,
    sortable: bool,
    annotate: bool,
}

impl TableQueryBuilder {
    /// Create a builder for `kind`, with that table's standard columns
    pub fn new(kind: TableKind) -> Self {
        Self {
            kind,
            ..Default::default()
        }
    }

    /// Replace the standard columns
    pub fn columns(mut self, columns: ColumnSet) -> Self {
        self.columns = Some(columns);
        self
    }

    /// Set the date filter
    pub fn date_filter(mut self, filter: DateFilterSpec) -> Self {
        self.date_filter = filter;
        self
    }

    /// Keep today's rows
    pub fn today(self) -> Self {
        self.date_filter(DateFilterSpec::today())
    }

    /// Keep this week's rows
    pub fn this_week(self) -> Self {
        self.date_filter(DateFilterSpec::this_week())
    }

    /// Keep this month's rows
    pub fn this_month(self) -> Self {
        self.date_filter(DateFilterSpec::this_month())
    }

    /// Keep rows between two days, both included
    pub fn between(self, start: NaiveDate, end: NaiveDate) -> Self {
        self.date_filter(DateFilterSpec::custom(Some(start), Some(end)))
    }

    /// Set the status filter
    pub fn status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }

    /// Set the initial sort
    pub fn sort_by(mut self, column: impl Into<String>, direction: SortDirection) -> Self {
        self.sort = SortSpec::new(column, direction);
        self
    }

    /// Clear the initial sort
    pub fn unsorted(mut self) -> Self {
        self.sort = SortSpec::unsorted();
        self
    }

    /// Let users sort by clicking headers
    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Attach action metadata to rows
    pub fn annotate_actions(mut self) -> Self {
        self.annotate = true;
        self
    }

    /// Build the query
    pub fn build(self) -> TableQuery {
        let columns = self.columns.unwrap_or_else(|| match self.kind {
            TableKind::Transactions => standard::transactions(),
            TableKind::Users => standard::users(),
            TableKind::PaymentRequests => standard::payment_requests(true),
        });

        TableQuery {
            kind: self.kind,
            columns,
            date_filter: self.date_filter,
            status: self.status,
            sort: self.sort,
            sortable: self.sortable,
            annotate: self.annotate,
        }
    }
}

/// Preset queries for the dashboard tables
pub mod presets {
    use super::*;

    /// A user's transactions, newest first, with action labels
    pub fn transaction_history() -> TableQuery {
        TableQueryBuilder::new(TableKind::Transactions)
            .sort_by(attributes::TRANSACTION_DATE, SortDirection::Desc)
            .sortable()
            .annotate_actions()
            .build()
    }

    /// All users, richest first
    pub fn admin_users() -> TableQuery {
        TableQueryBuilder::new(TableKind::Users)
            .sort_by(attributes::BALANCE, SortDirection::Desc)
            .sortable()
            .build()
    }

    /// Payment requests with a status filter
    pub fn payment_requests(status: StatusFilter) -> TableQuery {
        TableQueryBuilder::new(TableKind::PaymentRequests)
            .status(status)
            .sortable()
            .build()
    }

    /// Preset for a table kind
    pub fn for_kind(kind: TableKind) -> TableQuery {
        match kind {
            TableKind::Transactions => transaction_history(),
            TableKind::Users => admin_users(),
            TableKind::PaymentRequests => payment_requests(StatusFilter::All),
        }
    }
}
