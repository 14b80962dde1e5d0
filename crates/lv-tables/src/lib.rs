//! # lv-tables
//!
//! Sort/filter engine for the ledgerview dashboard tables.
//!
//! Rows flow through a fixed pipeline: a date predicate keeps the rows of
//! the selected period, an optional annotator attaches display metadata,
//! and a stable sort orders the survivors by one column. Header clicks go
//! through a sort controller that feeds the next sort back into the
//! pipeline.
//!
//! ## Structure
//!
//! - `compare` - Ordering of heterogeneous cell values
//! - `collation` - Numeric-aware, case and accent insensitive text order
//! - `temporal` - Date parsing and calendar boundaries
//! - `filters` - Date presets and the date range predicate
//! - `status` - Payment request status filter
//! - `annotate` - Derived action metadata
//! - `pipeline` - Filter, annotate, sort
//! - `controller` - Sort state machine for table headers
//! - `sorts` - Sort directions and sort state
//! - `columns` - Column definitions and cell text
//! - `query` / `builder` - Table configurations and presets
//! - `source` - Loading records from upstream payloads
//! - `session` - Transaction history view state
//!
//! ## Example
//!
//! ```
//! use lv_core::traits::FixedClock;
//! use lv_core::types::Record;
//! use lv_tables::{DateFilterSpec, SortFilterPipeline, SortSpec};
//!
//! let records = vec![
//!     Record::new().with("amount", "₪100"),
//!     Record::new().with("amount", "50"),
//!     Record::new().with("amount", "₪20.5"),
//! ];
//! let clock = FixedClock::parse("2024-01-15T12:00:00Z").unwrap();
//!
//! let rows = SortFilterPipeline::default().run(
//!     &records,
//!     &DateFilterSpec::all(),
//!     &clock,
//!     &SortSpec::asc("amount"),
//!     None,
//! );
//! let amounts: Vec<String> = rows.iter().map(|r| r.get("amount").to_text()).collect();
//! assert_eq!(amounts, ["₪20.5", "50", "₪100"]);
//! ```

pub mod collation;
pub mod temporal;
pub mod compare;
pub mod sorts;
pub mod filters;
pub mod status;
pub mod annotate;
pub mod pipeline;
pub mod controller;
pub mod columns;
pub mod query;
pub mod builder;
pub mod source;
pub mod session;

// Re-exports for convenience
pub use annotate::{ActionAnnotator, ActionClassifier, ActionColor, ActionMeta, Annotator};
pub use builder::{presets, TableQueryBuilder};
pub use columns::{Column, ColumnSet, ColumnType, RenderContext};
pub use compare::{Comparison, ValueComparator};
pub use controller::{next_sort, HeaderState, TableSortController};
pub use filters::{DateFilterSpec, DatePreset, DateRangeFilter, DateWindow, FilterOptions};
pub use pipeline::SortFilterPipeline;
pub use query::{TableKind, TableQuery};
pub use session::TransactionHistory;
pub use sorts::{SortDirection, SortSpec};
pub use source::JsonFileSource;
pub use status::{StatusCounts, StatusFilter};
