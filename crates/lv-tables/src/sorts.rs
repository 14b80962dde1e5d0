//! Sort directions and sort state
//!
//! A [`SortSpec`] is the single piece of sort state a table carries: which
//! column is active (if any) and in which direction.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use lv_core::error::LvError;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending order (A-Z, 1-9, oldest first)
    #[default]
    Asc,
    /// Descending order (Z-A, 9-1, newest first)
    Desc,
}

impl SortDirection {
    /// Parse from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Some(Self::Asc),
            "desc" | "descending" => Some(Self::Desc),
            _ => None,
        }
    }

    /// Convert to string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    /// Get the opposite direction
    pub fn reverse(&self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    /// Apply this direction to an ascending ordering
    pub fn apply(&self, ordering: std::cmp::Ordering) -> std::cmp::Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

impl FromStr for SortDirection {
    type Err = LvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| LvError::invalid_spec(format!("unknown sort direction: {}", s)))
    }
}

/// The active sort of a table
///
/// `column == None` means no sort is applied and rows keep their filtered
/// order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortSpec {
    /// The column to sort by
    pub column: Option<String>,
    /// The sort direction
    pub direction: SortDirection,
}

impl SortSpec {
    /// Create a sort on a column
    pub fn new(column: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            column: Some(column.into()),
            direction,
        }
    }

    /// No sort applied
    pub fn unsorted() -> Self {
        Self::default()
    }

    /// Create ascending sort
    pub fn asc(column: impl Into<String>) -> Self {
        Self::new(column, SortDirection::Asc)
    }

    /// Create descending sort
    pub fn desc(column: impl Into<String>) -> Self {
        Self::new(column, SortDirection::Desc)
    }

    pub fn column(&self) -> Option<&str> {
        self.column.as_deref()
    }

    pub fn is_sorted(&self) -> bool {
        self.column.is_some()
    }

    /// Check if sorting by a specific column
    pub fn sorts_by(&self, column: &str) -> bool {
        self.column.as_deref() == Some(column)
    }
}

/// Column names of the dashboard tables
pub mod attributes {
    // transactions
    pub const TRANSACTION_DATE: &str = "transaction_date";
    pub const ACTION_TYPE: &str = "action_type";
    pub const DESCRIPTION: &str = "description";
    pub const AMOUNT: &str = "amount";
    // payment requests
    pub const STATUS: &str = "status";
    pub const DATE: &str = "date";
    pub const NAME: &str = "name";
    pub const PHONE: &str = "phone";
    pub const ID: &str = "id";
    // users
    pub const ID_NUM: &str = "idNum";
    pub const BALANCE: &str = "balance";
    pub const ROLE: &str = "role";
    pub const CREATED_AT: &str = "createdAt";
    // derived
    pub const ACTION_META: &str = "actionMeta";
}
