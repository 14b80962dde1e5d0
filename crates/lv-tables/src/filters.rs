//! Date range filters
//!
//! Tables that show dated rows (transactions, payment requests) can be
//! narrowed to today, the current week, the current month or an explicit
//! range of calendar days. Relative presets are resolved against a [`Clock`]
//! once, when the filter is built.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use lv_core::config::{TablesConfig, DEFAULT_DATE_FIELDS};
use lv_core::error::LvError;
use lv_core::traits::Clock;
use lv_core::types::Record;

use crate::temporal::{
    end_of_day, end_of_month, end_of_week, instant_from_value, start_of_day, start_of_month,
    start_of_week,
};

/// Named date filter presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatePreset {
    /// No filtering
    #[default]
    All,
    /// The current calendar day
    Today,
    /// The current calendar week
    Week,
    /// The current calendar month
    Month,
    /// Explicit start and end days
    Custom,
}

impl DatePreset {
    /// Parse from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "all" => Some(Self::All),
            "today" | "day" => Some(Self::Today),
            "week" => Some(Self::Week),
            "month" => Some(Self::Month),
            "custom" => Some(Self::Custom),
            _ => None,
        }
    }

    /// Convert to string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Today => "today",
            Self::Week => "week",
            Self::Month => "month",
            Self::Custom => "custom",
        }
    }
}

/// A date filter selection
///
/// `start`/`end` are only consulted for [`DatePreset::Custom`]; a custom
/// selection with either bound missing filters nothing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateFilterSpec {
    pub preset: DatePreset,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateFilterSpec {
    pub fn new(preset: DatePreset) -> Self {
        Self {
            preset,
            start: None,
            end: None,
        }
    }

    pub fn all() -> Self {
        Self::new(DatePreset::All)
    }

    pub fn today() -> Self {
        Self::new(DatePreset::Today)
    }

    pub fn this_week() -> Self {
        Self::new(DatePreset::Week)
    }

    pub fn this_month() -> Self {
        Self::new(DatePreset::Month)
    }

    /// Custom range; both days are included in full
    pub fn custom(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self {
            preset: DatePreset::Custom,
            start,
            end,
        }
    }

    /// Check whether this selection filters nothing
    pub fn is_noop(&self) -> bool {
        match self.preset {
            DatePreset::All => true,
            DatePreset::Custom => self.start.is_none() || self.end.is_none(),
            _ => false,
        }
    }
}

impl fmt::Display for DateFilterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.preset, self.start, self.end) {
            (DatePreset::Custom, start, end) => {
                let day = |d: Option<NaiveDate>| d.map(|d| d.to_string()).unwrap_or_default();
                write!(f, "custom:{}..{}", day(start), day(end))
            }
            (preset, _, _) => f.write_str(preset.as_str()),
        }
    }
}

impl FromStr for DateFilterSpec {
    type Err = LvError;

    /// Accepts a preset name, or `custom:START..END` with ISO dates; either
    /// side of the range may be empty.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(range) = s.strip_prefix("custom:") {
            let (start, end) = range
                .split_once("..")
                .ok_or_else(|| LvError::invalid_spec(format!("expected START..END, got {}", range)))?;
            return Ok(Self::custom(parse_day(start)?, parse_day(end)?));
        }
        DatePreset::parse(s)
            .map(Self::new)
            .ok_or_else(|| LvError::invalid_spec(format!("unknown date filter: {}", s)))
    }
}

fn parse_day(text: &str) -> Result<Option<NaiveDate>, LvError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map(Some)
        .map_err(|e| LvError::invalid_spec(format!("bad date {}: {}", text, e)))
}

/// Inclusive window between two instants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl DateWindow {
    /// From the first instant of `first` to the last instant of `last`
    pub fn for_days(first: NaiveDate, last: NaiveDate, offset: &FixedOffset) -> Option<Self> {
        Some(Self {
            start: start_of_day(first, offset)?,
            end: end_of_day(last, offset)?,
        })
    }

    pub fn contains(&self, instant: &DateTime<FixedOffset>) -> bool {
        *instant >= self.start && *instant <= self.end
    }
}

/// Where to look for a record's date and how weeks are laid out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOptions {
    /// Candidate date fields, first present one wins
    pub date_fields: Vec<String>,
    /// 0 = Sunday ... 6 = Saturday
    pub first_day_of_week: u8,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            date_fields: DEFAULT_DATE_FIELDS.iter().map(|s| s.to_string()).collect(),
            first_day_of_week: 0,
        }
    }
}

impl From<&TablesConfig> for FilterOptions {
    fn from(config: &TablesConfig) -> Self {
        Self {
            date_fields: config.date_fields.clone(),
            first_day_of_week: config.first_day_of_week,
        }
    }
}

/// Record predicate built from a [`DateFilterSpec`]
#[derive(Debug, Clone)]
pub struct DateRangeFilter {
    window: Option<DateWindow>,
    date_fields: Vec<String>,
    offset: FixedOffset,
}

impl DateRangeFilter {
    /// Resolve `spec` against the clock's current day
    pub fn new<C: Clock + ?Sized>(spec: &DateFilterSpec, clock: &C, options: &FilterOptions) -> Self {
        let now = clock.now();
        let offset = *now.offset();
        let today = now.date_naive();

        let days = match spec.preset {
            DatePreset::All => None,
            DatePreset::Today => Some((today, today)),
            DatePreset::Week => Some((
                start_of_week(today, options.first_day_of_week),
                end_of_week(today, options.first_day_of_week),
            )),
            DatePreset::Month => Some((start_of_month(today), end_of_month(today))),
            DatePreset::Custom => spec.start.zip(spec.end),
        };

        let window = days.and_then(|(first, last)| DateWindow::for_days(first, last, &offset));
        if days.is_some() && window.is_none() {
            tracing::warn!(filter = %spec, "Date window out of range, filtering disabled");
        }

        Self {
            window,
            date_fields: options.date_fields.clone(),
            offset,
        }
    }

    pub fn window(&self) -> Option<&DateWindow> {
        self.window.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.window.is_some()
    }

    /// Check whether a record falls inside the window.
    ///
    /// Records without a date, or with an unreadable one, never match an
    /// active window.
    pub fn matches(&self, record: &Record) -> bool {
        let Some(window) = &self.window else {
            return true;
        };
        record
            .first_present(&self.date_fields)
            .and_then(|value| instant_from_value(value, &self.offset))
            .is_some_and(|instant| window.contains(&instant))
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use lv_core::traits::FixedClock;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn clock(ts: &str) -> FixedClock {
        FixedClock::parse(ts).unwrap()
    }

    fn dated(field: &str, value: &str) -> Record {
        Record::new().with(field, value)
    }

    fn january() -> Vec<Record> {
        (1..=31)
            .map(|d| dated("transaction_date", &format!("2024-01-{:02}", d)))
            .collect()
    }

    fn count(filter: &DateRangeFilter, records: &[Record]) -> usize {
        records.iter().filter(|r| filter.matches(r)).count()
    }

    #[test]
    fn test_preset_parsing() {
        assert_eq!(DatePreset::parse("Today"), Some(DatePreset::Today));
        assert_eq!(DatePreset::parse("month"), Some(DatePreset::Month));
        assert_eq!(DatePreset::parse("year"), None);
        assert_eq!(DatePreset::Week.as_str(), "week");
    }

    #[test]
    fn test_spec_from_str() {
        assert_eq!("week".parse::<DateFilterSpec>().unwrap(), DateFilterSpec::this_week());
        assert_eq!(
            "custom:2024-01-05..2024-01-10".parse::<DateFilterSpec>().unwrap(),
            DateFilterSpec::custom(Some(day(2024, 1, 5)), Some(day(2024, 1, 10)))
        );
        assert_eq!(
            "custom:..2024-01-10".parse::<DateFilterSpec>().unwrap(),
            DateFilterSpec::custom(None, Some(day(2024, 1, 10)))
        );
        assert!("custom:2024-01-05".parse::<DateFilterSpec>().is_err());
        assert!("custom:2024-13-05..".parse::<DateFilterSpec>().is_err());
        assert!("yesterday".parse::<DateFilterSpec>().is_err());
    }

    #[test]
    fn test_spec_display() {
        assert_eq!(DateFilterSpec::today().to_string(), "today");
        assert_eq!(
            DateFilterSpec::custom(Some(day(2024, 1, 5)), None).to_string(),
            "custom:2024-01-05.."
        );
    }

    #[test]
    fn test_is_noop() {
        assert!(DateFilterSpec::all().is_noop());
        assert!(DateFilterSpec::custom(Some(day(2024, 1, 1)), None).is_noop());
        assert!(DateFilterSpec::custom(None, None).is_noop());
        assert!(!DateFilterSpec::today().is_noop());
        assert!(!DateFilterSpec::custom(Some(day(2024, 1, 1)), Some(day(2024, 1, 2))).is_noop());
    }

    #[test]
    fn test_all_accepts_everything() {
        let filter = DateRangeFilter::new(
            &DateFilterSpec::all(),
            &clock("2024-01-15T12:00:00Z"),
            &FilterOptions::default(),
        );
        assert!(!filter.is_active());
        assert!(filter.matches(&Record::new()));
        assert!(filter.matches(&dated("transaction_date", "garbage")));
    }

    #[test]
    fn test_month_keeps_whole_month() {
        let filter = DateRangeFilter::new(
            &DateFilterSpec::this_month(),
            &clock("2024-01-20T08:00:00Z"),
            &FilterOptions::default(),
        );
        let mut records = january();
        records.push(dated("transaction_date", "2023-12-31"));
        records.push(dated("transaction_date", "2024-02-01"));
        assert_eq!(count(&filter, &records), 31);
    }

    #[test]
    fn test_today_keeps_one_day() {
        let filter = DateRangeFilter::new(
            &DateFilterSpec::today(),
            &clock("2024-01-15T00:00:00Z"),
            &FilterOptions::default(),
        );
        let kept: Vec<_> = january().into_iter().filter(|r| filter.matches(r)).collect();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].get("transaction_date").to_text(), "2024-01-15");
    }

    #[test]
    fn test_day_boundaries_are_inclusive() {
        let filter = DateRangeFilter::new(
            &DateFilterSpec::today(),
            &clock("2024-01-15T12:00:00Z"),
            &FilterOptions::default(),
        );
        assert!(filter.matches(&dated("date", "2024-01-15T00:00:00Z")));
        assert!(filter.matches(&dated("date", "2024-01-15T23:59:59.999Z")));
        assert!(!filter.matches(&dated("date", "2024-01-14T23:59:59Z")));
        assert!(!filter.matches(&dated("date", "2024-01-16T00:00:00Z")));
    }

    #[test]
    fn test_week_window() {
        // Wednesday 2024-01-17; Sunday-start week is 14..20
        let options = FilterOptions::default();
        let filter = DateRangeFilter::new(
            &DateFilterSpec::this_week(),
            &clock("2024-01-17T09:00:00Z"),
            &options,
        );
        let kept: Vec<String> = january()
            .into_iter()
            .filter(|r| filter.matches(r))
            .map(|r| r.get("transaction_date").to_text())
            .collect();
        assert_eq!(kept.first().map(String::as_str), Some("2024-01-14"));
        assert_eq!(kept.last().map(String::as_str), Some("2024-01-20"));
        assert_eq!(kept.len(), 7);

        let monday = FilterOptions {
            first_day_of_week: 1,
            ..FilterOptions::default()
        };
        let filter = DateRangeFilter::new(
            &DateFilterSpec::this_week(),
            &clock("2024-01-17T09:00:00Z"),
            &monday,
        );
        let window = filter.window().unwrap();
        assert_eq!(window.start.date_naive(), day(2024, 1, 15));
        assert_eq!(window.end.date_naive(), day(2024, 1, 21));
    }

    #[test]
    fn test_custom_range() {
        let filter = DateRangeFilter::new(
            &DateFilterSpec::custom(Some(day(2024, 1, 10)), Some(day(2024, 1, 12))),
            &clock("2024-06-01T00:00:00Z"),
            &FilterOptions::default(),
        );
        assert_eq!(count(&filter, &january()), 3);
        assert!(!filter.matches(&dated("transaction_date", "2024-01-09")));
        assert!(!filter.matches(&dated("transaction_date", "2024-01-13")));
    }

    #[test]
    fn test_custom_missing_bound_is_noop() {
        let filter = DateRangeFilter::new(
            &DateFilterSpec::custom(Some(day(2024, 1, 10)), None),
            &clock("2024-06-01T00:00:00Z"),
            &FilterOptions::default(),
        );
        assert!(!filter.is_active());
        assert_eq!(count(&filter, &january()), 31);
    }

    #[test]
    fn test_inverted_custom_range_matches_nothing() {
        let filter = DateRangeFilter::new(
            &DateFilterSpec::custom(Some(day(2024, 1, 12)), Some(day(2024, 1, 10))),
            &clock("2024-06-01T00:00:00Z"),
            &FilterOptions::default(),
        );
        assert_eq!(count(&filter, &january()), 0);
    }

    #[test]
    fn test_field_fallback_order() {
        let filter = DateRangeFilter::new(
            &DateFilterSpec::today(),
            &clock("2024-01-15T12:00:00Z"),
            &FilterOptions::default(),
        );
        // primary field empty, falls back to `date`
        let record = Record::new()
            .with("transaction_date", "")
            .with("date", "2024-01-15");
        assert!(filter.matches(&record));

        // primary field wins even if a fallback would match
        let record = Record::new()
            .with("transaction_date", "2024-01-01")
            .with("createdAt", "2024-01-15");
        assert!(!filter.matches(&record));
    }

    #[test]
    fn test_missing_or_bad_dates_excluded() {
        let filter = DateRangeFilter::new(
            &DateFilterSpec::this_month(),
            &clock("2024-01-15T12:00:00Z"),
            &FilterOptions::default(),
        );
        assert!(!filter.matches(&Record::new().with("amount", 5)));
        assert!(!filter.matches(&dated("date", "not a date")));
        assert!(!filter.matches(&Record::new().with("date", true)));
    }

    #[test]
    fn test_epoch_millis_dates() {
        let filter = DateRangeFilter::new(
            &DateFilterSpec::today(),
            &clock("2024-01-15T12:00:00Z"),
            &FilterOptions::default(),
        );
        // 2024-01-15T10:00:00Z
        let record = Record::new().with("createdAt", 1_705_312_800_000_i64);
        assert!(filter.matches(&record));
    }

    #[test]
    fn test_window_uses_clock_offset() {
        // 23:30 UTC on the 14th is already the 15th at +02:00
        let filter = DateRangeFilter::new(
            &DateFilterSpec::today(),
            &clock("2024-01-15T10:00:00+02:00"),
            &FilterOptions::default(),
        );
        assert!(filter.matches(&dated("date", "2024-01-14T23:30:00Z")));
        assert!(filter.matches(&dated("date", "2024-01-15")));
        assert!(!filter.matches(&dated("date", "2024-01-14T21:59:00Z")));
    }

    #[test]
    fn test_options_from_config() {
        let config = TablesConfig {
            date_fields: vec!["when".to_string()],
            first_day_of_week: 1,
            utc_offset_minutes: None,
        };
        let options = FilterOptions::from(&config);
        assert_eq!(options.date_fields, vec!["when"]);
        assert_eq!(options.first_day_of_week, 1);
    }
}
