//! Filter, annotate and sort in one pass
//!
//! The pipeline is a pure function of its inputs: the source collection is
//! only borrowed and every output record is a fresh copy.

use std::cmp::Ordering;

use lv_core::traits::Clock;
use lv_core::types::Record;

use crate::annotate::Annotator;
use crate::compare::ValueComparator;
use crate::filters::{DateFilterSpec, DateRangeFilter, FilterOptions};
use crate::sorts::SortSpec;

/// Composes [`DateRangeFilter`], an optional [`Annotator`] and a stable sort
#[derive(Debug, Clone, Default)]
pub struct SortFilterPipeline {
    options: FilterOptions,
    comparator: ValueComparator,
}

impl SortFilterPipeline {
    pub fn new(options: FilterOptions, comparator: ValueComparator) -> Self {
        Self {
            options,
            comparator,
        }
    }

    pub fn options(&self) -> &FilterOptions {
        &self.options
    }

    pub fn comparator(&self) -> &ValueComparator {
        &self.comparator
    }

    /// Build the date predicate for `spec` at the clock's current time
    pub fn date_filter<C: Clock + ?Sized>(&self, spec: &DateFilterSpec, clock: &C) -> DateRangeFilter {
        DateRangeFilter::new(spec, clock, &self.options)
    }

    /// Filter by `filter`, annotate, then sort by `sort`
    pub fn run<C: Clock + ?Sized>(
        &self,
        records: &[Record],
        filter: &DateFilterSpec,
        clock: &C,
        sort: &SortSpec,
        annotator: Option<&dyn Annotator>,
    ) -> Vec<Record> {
        let predicate = self.date_filter(filter, clock);
        self.run_with(records, &predicate, sort, annotator)
    }

    /// Same as [`SortFilterPipeline::run`] with a prebuilt predicate
    pub fn run_with(
        &self,
        records: &[Record],
        filter: &DateRangeFilter,
        sort: &SortSpec,
        annotator: Option<&dyn Annotator>,
    ) -> Vec<Record> {
        let kept: Vec<Record> = records
            .iter()
            .filter(|record| filter.matches(record))
            .map(|record| match annotator {
                Some(annotator) => annotator.annotate(record),
                None => record.clone(),
            })
            .collect();
        let kept_len = kept.len();

        let sorted = self.sort(kept, sort);

        tracing::debug!(
            input = records.len(),
            kept = kept_len,
            column = sort.column().unwrap_or("-"),
            direction = sort.direction.as_str(),
            annotated = annotator.is_some(),
            "Pipeline run"
        );
        sorted
    }

    /// Run over a raw JSON payload; anything but an array yields no rows and
    /// non-object items are skipped
    pub fn run_value<C: Clock + ?Sized>(
        &self,
        value: &serde_json::Value,
        filter: &DateFilterSpec,
        clock: &C,
        sort: &SortSpec,
        annotator: Option<&dyn Annotator>,
    ) -> Vec<Record> {
        let Some(items) = value.as_array() else {
            tracing::debug!("Pipeline input is not a collection");
            return Vec::new();
        };
        let records: Vec<Record> = items.iter().filter_map(Record::from_json).collect();
        self.run(&records, filter, clock, sort, annotator)
    }

    /// Stable sort by the spec's column; no column keeps the input order
    pub fn sort(&self, records: Vec<Record>, sort: &SortSpec) -> Vec<Record> {
        let Some(column) = sort.column() else {
            return records;
        };
        let direction = sort.direction;
        stable_sort_by(records, &mut |a: &Record, b: &Record| {
            self.comparator.compare_records(a, b, column, direction)
        })
    }
}

/// Merge sort; equal elements keep their relative order.
///
/// Terminates and keeps every element even when `compare` is not a total
/// order, which mixed-type columns can produce.
pub fn stable_sort_by<T, F>(items: Vec<T>, compare: &mut F) -> Vec<T>
where
    F: FnMut(&T, &T) -> Ordering,
{
    if items.len() <= 1 {
        return items;
    }

    let mut left = items;
    let right = left.split_off(left.len() / 2);
    let left = stable_sort_by(left, compare);
    let right = stable_sort_by(right, compare);

    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();
    loop {
        let take_right = match (left.peek(), right.peek()) {
            (Some(l), Some(r)) => compare(l, r) == Ordering::Greater,
            (Some(_), None) => false,
            (None, Some(_)) => true,
            (None, None) => break,
        };
        let next = if take_right { right.next() } else { left.next() };
        merged.extend(next);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::ActionAnnotator;
    use crate::sorts::SortDirection;
    use lv_core::traits::FixedClock;
    use lv_core::types::FieldValue;

    fn clock() -> FixedClock {
        FixedClock::parse("2024-01-15T12:00:00Z").unwrap()
    }

    fn column(records: &[Record], field: &str) -> Vec<String> {
        records.iter().map(|r| r.get(field).to_text()).collect()
    }

    fn amounts(values: &[&str]) -> Vec<Record> {
        values.iter().map(|v| Record::new().with("amount", *v)).collect()
    }

    fn january() -> Vec<Record> {
        (1..=31)
            .map(|d| Record::new().with("transaction_date", format!("2024-01-{:02}", d)))
            .collect()
    }

    fn run(records: &[Record], filter: DateFilterSpec, sort: SortSpec) -> Vec<Record> {
        SortFilterPipeline::default().run(records, &filter, &clock(), &sort, None)
    }

    #[test]
    fn test_currency_amounts_sort_numerically() {
        let records = amounts(&["₪100", "50", "₪20.5"]);
        let sorted = run(&records, DateFilterSpec::all(), SortSpec::asc("amount"));
        assert_eq!(column(&sorted, "amount"), vec!["₪20.5", "50", "₪100"]);

        let sorted = run(&records, DateFilterSpec::all(), SortSpec::desc("amount"));
        assert_eq!(column(&sorted, "amount"), vec!["₪100", "50", "₪20.5"]);
    }

    #[test]
    fn test_text_sorts_numeric_aware() {
        let records: Vec<Record> = ["item10", "item2", "item1"]
            .iter()
            .map(|v| Record::new().with("description", *v))
            .collect();
        let sorted = run(&records, DateFilterSpec::all(), SortSpec::asc("description"));
        assert_eq!(column(&sorted, "description"), vec!["item1", "item2", "item10"]);
    }

    #[test]
    fn test_month_and_today_filters() {
        let records = january();
        let month = run(&records, DateFilterSpec::this_month(), SortSpec::unsorted());
        assert_eq!(month.len(), 31);

        let today = run(&records, DateFilterSpec::today(), SortSpec::unsorted());
        assert_eq!(column(&today, "transaction_date"), vec!["2024-01-15"]);
    }

    #[test]
    fn test_unsorted_keeps_filtered_order() {
        let records = amounts(&["3", "1", "2"]);
        let out = run(&records, DateFilterSpec::all(), SortSpec::unsorted());
        assert_eq!(out, records);
    }

    #[test]
    fn test_dates_sort_chronologically() {
        let records: Vec<Record> = ["2024-01-15T10:00:00Z", "2023-12-31", "2024-01-02"]
            .iter()
            .map(|v| Record::new().with("transaction_date", *v))
            .collect();
        let sorted = run(&records, DateFilterSpec::all(), SortSpec::desc("transaction_date"));
        assert_eq!(
            column(&sorted, "transaction_date"),
            vec!["2024-01-15T10:00:00Z", "2024-01-02", "2023-12-31"]
        );
    }

    #[test]
    fn test_stable_for_equal_keys() {
        let records: Vec<Record> = [("a", "10"), ("b", "5"), ("c", "10"), ("d", "5"), ("e", "10")]
            .iter()
            .map(|(id, amount)| Record::new().with("id", *id).with("amount", *amount))
            .collect();

        let asc = run(&records, DateFilterSpec::all(), SortSpec::asc("amount"));
        assert_eq!(column(&asc, "id"), vec!["b", "d", "a", "c", "e"]);

        let desc = run(&records, DateFilterSpec::all(), SortSpec::desc("amount"));
        assert_eq!(column(&desc, "id"), vec!["a", "c", "e", "b", "d"]);
    }

    #[test]
    fn test_idempotent() {
        let records = amounts(&["7", "₪3", "12", "x", "", "3"]);
        let sort = SortSpec::asc("amount");
        let once = run(&records, DateFilterSpec::all(), sort.clone());
        let twice = run(&once, DateFilterSpec::all(), sort);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_direction_symmetry_for_distinct_keys() {
        let columns: [&[&str]; 3] = [
            &["4", "₪1", "9", "2.5", "7"],
            &["2024-01-15T10:00:00Z", "2023-12-31", "2024-03-01", "2024-01-02"],
            &["banana", "Apple", "item10", "cherry", "item2"],
        ];
        for values in columns {
            let records = amounts(values);
            let asc = run(&records, DateFilterSpec::all(), SortSpec::asc("amount"));
            let mut desc = run(&records, DateFilterSpec::all(), SortSpec::desc("amount"));
            desc.reverse();
            assert_eq!(asc, desc, "{:?}", values);
        }
    }

    #[test]
    fn test_missing_values_sort_first_ascending() {
        let records = vec![
            Record::new().with("id", "a").with("amount", "abc"),
            Record::new().with("id", "b"),
            Record::new().with("id", "c").with("amount", "zzz"),
        ];
        let sorted = run(&records, DateFilterSpec::all(), SortSpec::asc("amount"));
        assert_eq!(column(&sorted, "id"), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_mixed_column_keeps_every_record() {
        let records = amounts(&["50", "2024-01-01", "abc", "₪3", "", "2023-05-05", "item2"]);
        let sorted = run(&records, DateFilterSpec::all(), SortSpec::asc("amount"));
        assert_eq!(sorted.len(), records.len());
        for record in &records {
            assert!(sorted.contains(record));
        }
    }

    #[test]
    fn test_input_untouched_and_annotated_copies() {
        let records = vec![
            Record::new().with("action_type", "deposit").with("amount", "5"),
            Record::new().with("amount", "1"),
        ];
        let before = records.clone();
        let annotator = ActionAnnotator::default();
        let out = SortFilterPipeline::default().run(
            &records,
            &DateFilterSpec::all(),
            &clock(),
            &SortSpec::asc("amount"),
            Some(&annotator),
        );

        assert_eq!(records, before);
        assert!(!out[0].contains("actionMeta"));
        assert!(out[1].contains("actionMeta"));
        assert_eq!(out[1].get("amount"), &FieldValue::text("5"));
    }

    #[test]
    fn test_filter_before_sort() {
        let mut records = january();
        records.push(Record::new().with("transaction_date", "2023-06-01"));
        let out = run(&records, DateFilterSpec::today(), SortSpec::desc("transaction_date"));
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_run_value() {
        let pipeline = SortFilterPipeline::default();
        let payload = serde_json::json!([{"amount": 2}, 5, {"amount": 1}, null]);
        let out = pipeline.run_value(
            &payload,
            &DateFilterSpec::all(),
            &clock(),
            &SortSpec::asc("amount"),
            None,
        );
        assert_eq!(column(&out, "amount"), vec!["1", "2"]);

        let not_a_list = serde_json::json!({"amount": 2});
        assert!(pipeline
            .run_value(&not_a_list, &DateFilterSpec::all(), &clock(), &SortSpec::unsorted(), None)
            .is_empty());
    }

    #[test]
    fn test_stable_sort_by_tolerates_inconsistent_comparator() {
        let items: Vec<u32> = (0..50).collect();
        let mut calls = 0u32;
        let out = stable_sort_by(items, &mut |a: &u32, b: &u32| {
            calls += 1;
            if (a + b + calls) % 3 == 0 {
                Ordering::Less
            } else {
                Ordering::Greater
            }
        });
        let mut seen = out.clone();
        seen.sort();
        assert_eq!(seen, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_direction_enum_roundtrip_in_sort() {
        let records = amounts(&["1", "2"]);
        let spec = SortSpec::new("amount", SortDirection::Desc);
        assert_eq!(column(&run(&records, DateFilterSpec::all(), spec), "amount"), vec!["2", "1"]);
    }
}
