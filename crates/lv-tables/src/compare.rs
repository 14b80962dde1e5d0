//! Value comparison for heterogeneous columns
//!
//! A column may hold amounts (`"₪100"`, `50`), timestamps, free text or
//! nothing at all. Two values are ordered by the first rule that accepts
//! **both** of them:
//!
//! 1. numeric: strip everything but digits, signs, decimal separators and
//!    exponent markers, turn `,` into `.`, parse as a float;
//! 2. temporal: parse the string form as a calendar date/time;
//! 3. textual: trimmed string forms under [`collate`].
//!
//! The subtype is decided per comparison and never cached, so the same pair
//! always compares the same way.

use std::cmp::Ordering;
use std::sync::LazyLock;

use chrono::{DateTime, FixedOffset, Offset, Utc};
use regex::Regex;

use lv_core::types::{FieldValue, Record};

use crate::collation::collate;
use crate::sorts::SortDirection;
use crate::temporal::parse_instant;

/// Everything that cannot be part of a number
static NON_NUMERIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^0-9+\-.,eE]").unwrap()
});

/// The rule that decided a comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Numeric,
    Temporal,
    Textual,
}

/// Numeric reading of a value, if it has one.
///
/// The cleaned string must parse completely; a stray sign or a second
/// separator makes the value non-numeric.
pub fn parse_numeric(value: &FieldValue) -> Option<f64> {
    match value {
        FieldValue::Absent => None,
        FieldValue::Number(n) => n.is_finite().then_some(*n),
        other => {
            let text = other.to_text();
            let cleaned = NON_NUMERIC.replace_all(&text, "").replace(',', ".");
            cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
        }
    }
}

/// Orders field values by numeric, temporal, then textual rules
#[derive(Debug, Clone, Copy)]
pub struct ValueComparator {
    /// Offset applied to date strings that carry none
    offset: FixedOffset,
}

impl Default for ValueComparator {
    fn default() -> Self {
        Self {
            offset: Utc.fix(),
        }
    }
}

impl ValueComparator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_offset(offset: FixedOffset) -> Self {
        Self { offset }
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Compare two values in the given direction
    pub fn compare(&self, a: &FieldValue, b: &FieldValue, direction: SortDirection) -> Ordering {
        direction.apply(self.compare_ascending(a, b))
    }

    /// Compare two records on one field
    pub fn compare_records(
        &self,
        a: &Record,
        b: &Record,
        field: &str,
        direction: SortDirection,
    ) -> Ordering {
        self.compare(a.get(field), b.get(field), direction)
    }

    /// Ascending comparison
    pub fn compare_ascending(&self, a: &FieldValue, b: &FieldValue) -> Ordering {
        self.decide(a, b).1
    }

    /// Which rule orders this pair
    pub fn rule_for(&self, a: &FieldValue, b: &FieldValue) -> Comparison {
        self.decide(a, b).0
    }

    fn decide(&self, a: &FieldValue, b: &FieldValue) -> (Comparison, Ordering) {
        if let (Some(x), Some(y)) = (parse_numeric(a), parse_numeric(b)) {
            return (
                Comparison::Numeric,
                x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            );
        }

        if let (Some(x), Some(y)) = (self.parse_temporal(a), self.parse_temporal(b)) {
            return (Comparison::Temporal, x.cmp(&y));
        }

        let x = a.to_text();
        let y = b.to_text();
        (Comparison::Textual, collate(x.trim(), y.trim()))
    }

    fn parse_temporal(&self, value: &FieldValue) -> Option<DateTime<FixedOffset>> {
        if value.is_absent() {
            return None;
        }
        parse_instant(&value.to_text(), &self.offset)
    }
}
