//! Transaction history session
//!
//! Holds one user's fetched history together with the date filter and sort
//! state the view has selected, and recomputes the visible rows on demand.

use chrono::NaiveDate;

use lv_core::error::LvError;
use lv_core::traits::{Clock, RecordSource};
use lv_core::types::Record;

use crate::annotate::{ActionAnnotator, ActionMeta};
use crate::controller::TableSortController;
use crate::filters::DateFilterSpec;
use crate::pipeline::SortFilterPipeline;
use crate::sorts::{attributes, SortDirection, SortSpec};
use crate::source::prepare_history;

const LOAD_FAILED: &str = "Failed to load transaction history";

pub struct TransactionHistory<S, C> {
    source: S,
    clock: C,
    pipeline: SortFilterPipeline,
    annotator: ActionAnnotator,
    history: Vec<Record>,
    error: Option<String>,
    loaded: bool,
    filter: DateFilterSpec,
    sort: TableSortController,
}

impl<S: RecordSource, C: Clock> TransactionHistory<S, C> {
    pub fn new(source: S, clock: C, pipeline: SortFilterPipeline) -> Self {
        Self {
            source,
            clock,
            pipeline,
            annotator: ActionAnnotator::default(),
            history: Vec::new(),
            error: None,
            loaded: false,
            filter: DateFilterSpec::all(),
            sort: TableSortController::uncontrolled(Some(SortSpec::desc(
                attributes::TRANSACTION_DATE,
            ))),
        }
    }

    /// Fetch the history, replacing whatever was loaded before.
    ///
    /// Failures leave an empty history and an error message for the view.
    pub fn load(&mut self) -> Result<usize, &str> {
        self.error = None;
        match self.source.fetch() {
            Ok(records) => {
                self.history = prepare_history(records, self.pipeline.comparator());
                tracing::debug!(
                    source = %self.source.name(),
                    records = self.history.len(),
                    "History loaded"
                );
            }
            Err(err) => {
                tracing::warn!(source = %self.source.name(), error = %err, "Failed to load history");
                self.history.clear();
                self.error = Some(match err {
                    LvError::Source { message, .. } => message,
                    _ => LOAD_FAILED.to_string(),
                });
            }
        }
        self.loaded = true;
        match &self.error {
            Some(message) => Err(message.as_str()),
            None => Ok(self.history.len()),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Loaded history, newest first
    pub fn history(&self) -> &[Record] {
        &self.history
    }

    pub fn filter(&self) -> &DateFilterSpec {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: DateFilterSpec) {
        self.filter = filter;
    }

    /// Select a custom range; either day may still be unset
    pub fn set_custom_range(&mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) {
        self.filter = DateFilterSpec::custom(start, end);
    }

    pub fn sort(&self) -> &SortSpec {
        self.sort.current()
    }

    pub fn request_sort(&mut self, column: &str, explicit: Option<SortDirection>) -> SortSpec {
        self.sort.request_sort(column, explicit)
    }

    pub fn click_header(&mut self, column: &str) -> SortSpec {
        self.sort.click_header(column)
    }

    /// Label and color for an action type
    pub fn action_meta(&self, action: &str) -> &ActionMeta {
        self.annotator.classifier().classify(action)
    }

    /// Visible rows under the current filter and sort
    pub fn rows(&self) -> Vec<Record> {
        self.pipeline.run(
            &self.history,
            &self.filter,
            &self.clock,
            self.sort.current(),
            Some(&self.annotator),
        )
    }
}
