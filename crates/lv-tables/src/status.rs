//! Payment request status filter

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use lv_core::error::LvError;
use lv_core::types::Record;

use crate::sorts::attributes;

/// Status selection for the payment requests table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Approved,
    Rejected,
}

impl StatusFilter {
    pub const ALL: [StatusFilter; 4] = [Self::All, Self::Pending, Self::Approved, Self::Rejected];

    /// Parse from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "all" => Some(Self::All),
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Convert to string; also the stored `status` value
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Status values are compared exactly, as stored upstream
    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Self::All => true,
            status => record.get(attributes::STATUS).as_str() == Some(status.as_str()),
        }
    }

    pub fn apply(&self, records: &[Record]) -> Vec<Record> {
        records.iter().filter(|r| self.matches(r)).cloned().collect()
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusFilter {
    type Err = LvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| LvError::invalid_spec(format!("unknown status: {}", s)))
    }
}

/// Number of requests per status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StatusCounts {
    pub all: usize,
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
}

impl StatusCounts {
    pub fn tally(records: &[Record]) -> Self {
        let count = |status: StatusFilter| records.iter().filter(|r| status.matches(r)).count();
        Self {
            all: records.len(),
            pending: count(StatusFilter::Pending),
            approved: count(StatusFilter::Approved),
            rejected: count(StatusFilter::Rejected),
        }
    }

    pub fn get(&self, status: StatusFilter) -> usize {
        match status {
            StatusFilter::All => self.all,
            StatusFilter::Pending => self.pending,
            StatusFilter::Approved => self.approved,
            StatusFilter::Rejected => self.rejected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn requests() -> Vec<Record> {
        ["pending", "approved", "pending", "rejected", "cancelled"]
            .iter()
            .enumerate()
            .map(|(i, s)| Record::new().with("id", i as i64).with("status", *s))
            .chain(std::iter::once(Record::new().with("id", 99)))
            .collect()
    }

    #[test]
    fn test_parse() {
        assert_eq!(StatusFilter::parse("Pending"), Some(StatusFilter::Pending));
        assert_eq!("rejected".parse::<StatusFilter>().unwrap(), StatusFilter::Rejected);
        assert!("open".parse::<StatusFilter>().is_err());
    }

    #[test]
    fn test_apply() {
        let records = requests();
        assert_eq!(StatusFilter::All.apply(&records).len(), 6);
        let pending = StatusFilter::Pending.apply(&records);
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[0].get("id").as_f64(), Some(0.0));
        assert_eq!(pending[1].get("id").as_f64(), Some(2.0));
    }

    #[test]
    fn test_exact_match() {
        let record = Record::new().with("status", "Pending");
        assert!(!StatusFilter::Pending.matches(&record));
    }

    #[test]
    fn test_counts() {
        let counts = StatusCounts::tally(&requests());
        assert_eq!(
            counts,
            StatusCounts {
                all: 6,
                pending: 2,
                approved: 1,
                rejected: 1,
            }
        );
        assert_eq!(counts.get(StatusFilter::Pending), 2);
        assert_eq!(StatusCounts::tally(&[]), StatusCounts::default());
    }
}
