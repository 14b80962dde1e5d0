//! Table queries
//!
//! A [`TableQuery`] is everything a table view needs besides the rows
//! themselves: which columns to show, which rows to keep, how to order them
//! and whether to attach action metadata.

use std::fmt;
use std::str::FromStr;

use lv_core::error::LvError;
use lv_core::traits::Clock;
use lv_core::types::Record;

use crate::annotate::{ActionAnnotator, Annotator};
use crate::columns::ColumnSet;
use crate::controller::TableSortController;
use crate::filters::DateFilterSpec;
use crate::pipeline::SortFilterPipeline;
use crate::sorts::SortSpec;
use crate::status::StatusFilter;

/// The dashboard tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TableKind {
    /// A user's own transaction history
    #[default]
    Transactions,
    /// All users, for administrators
    Users,
    /// Payment requests awaiting review
    PaymentRequests,
}

impl TableKind {
    /// Parse from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "transactions" | "history" => Some(Self::Transactions),
            "users" => Some(Self::Users),
            "requests" | "payment_requests" | "payment-requests" => Some(Self::PaymentRequests),
            _ => None,
        }
    }

    /// Convert to string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Transactions => "transactions",
            Self::Users => "users",
            Self::PaymentRequests => "requests",
        }
    }

    /// Key of the collection in the upstream response envelope
    pub fn collection_key(&self) -> &'static str {
        match self {
            Self::Transactions => "history",
            Self::Users => "users",
            Self::PaymentRequests => "requests",
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TableKind {
    type Err = LvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| LvError::invalid_spec(format!("unknown table: {}", s)))
    }
}

/// Display configuration of one table
#[derive(Debug, Clone, Default)]
pub struct TableQuery {
    pub kind: TableKind,
    pub columns: ColumnSet,
    pub date_filter: DateFilterSpec,
    pub status: StatusFilter,
    /// Sort in effect when the table is first shown
    pub sort: SortSpec,
    /// Headers of data columns sort when clicked
    pub sortable: bool,
    /// Attach `actionMeta` to each row
    pub annotate: bool,
}

impl TableQuery {
    pub fn has_filters(&self) -> bool {
        !self.date_filter.is_noop() || self.status != StatusFilter::All
    }

    pub fn is_sorted(&self) -> bool {
        self.sort.is_sorted()
    }

    /// Controller that owns this table's sort, starting from [`TableQuery::sort`]
    pub fn controller(&self) -> TableSortController {
        TableSortController::uncontrolled(Some(self.sort.clone()))
    }

    /// Rows to display, ordered by `sort`
    pub fn apply<C: Clock + ?Sized>(
        &self,
        pipeline: &SortFilterPipeline,
        records: &[Record],
        clock: &C,
        sort: &SortSpec,
    ) -> Vec<Record> {
        let annotator = ActionAnnotator::default();
        let annotator: Option<&dyn Annotator> = if self.annotate {
            Some(&annotator)
        } else {
            None
        };

        if self.status == StatusFilter::All {
            return pipeline.run(records, &self.date_filter, clock, sort, annotator);
        }
        let kept = self.status.apply(records);
        pipeline.run(&kept, &self.date_filter, clock, sort, annotator)
    }
}
