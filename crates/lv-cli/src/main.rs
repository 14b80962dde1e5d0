//! ledgerview
//!
//! Command line front-end for the dashboard tables: loads an exported JSON
//! payload, applies a table preset with date/status filters and a sort, and
//! prints the result.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lv_core::config::{DashboardConfig, LoggingConfig};
use lv_core::traits::{Clock, FixedClock, RecordSource, SystemClock};
use lv_core::types::Record;
use lv_tables::columns::RenderContext;
use lv_tables::source::{normalize_users, prepare_history};
use lv_tables::{
    presets, DateFilterSpec, FilterOptions, JsonFileSource, SortDirection, SortFilterPipeline,
    StatusCounts, StatusFilter, TableKind, ValueComparator,
};

mod render;

#[derive(Parser)]
#[command(name = "ledgerview", version, about = "Filter and sort dashboard table exports")]
struct Cli {
    /// Configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print a table
    Show {
        /// JSON payload: a list of records or an API response envelope
        file: PathBuf,
        /// transactions, users or requests
        #[arg(long, default_value = "transactions")]
        table: TableKind,
        /// all, today, week, month or custom:START..END
        #[arg(long, default_value = "all")]
        filter: DateFilterSpec,
        /// all, pending, approved or rejected
        #[arg(long, default_value = "all")]
        status: StatusFilter,
        /// Column to sort by, as if its header was clicked
        #[arg(long)]
        sort: Option<String>,
        /// Explicit direction for --sort
        #[arg(long, requires = "sort")]
        direction: Option<SortDirection>,
        /// Evaluate relative date filters at this RFC 3339 instant
        #[arg(long)]
        now: Option<String>,
        /// Print rows as JSON
        #[arg(long)]
        json: bool,
    },
    /// Count payment requests per status
    Counts {
        /// JSON payload: a list of requests or an API response envelope
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = DashboardConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    init_tracing(&config.logging);

    match cli.command {
        Command::Show {
            file,
            table,
            filter,
            status,
            sort,
            direction,
            now,
            json,
        } => {
            let clock = make_clock(&config, now.as_deref())?;
            let options = ShowOptions {
                table,
                filter,
                status,
                sort,
                direction,
                json,
            };
            show(&config, &file, clock.as_ref(), &options)
        }
        Command::Counts { file } => {
            let records = load(&file, TableKind::PaymentRequests)?;
            print!("{}", render::status_counts(&StatusCounts::tally(&records)));
            Ok(())
        }
    }
}

/// Initialize tracing/logging
fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| logging.filter.as_str().into());
    let registry = tracing_subscriber::registry().with(filter);

    if logging.json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

fn make_clock(config: &DashboardConfig, now: Option<&str>) -> Result<Box<dyn Clock>> {
    let clock: Box<dyn Clock> = match now {
        Some(ts) => Box::new(FixedClock::parse(ts)?),
        None => Box::new(SystemClock::from_offset_minutes(config.tables.utc_offset_minutes)?),
    };
    Ok(clock)
}

fn load(file: &Path, table: TableKind) -> Result<Vec<Record>> {
    let source = JsonFileSource::new(file, table.collection_key());
    source
        .fetch()
        .with_context(|| format!("failed to load {}", file.display()))
}

struct ShowOptions {
    table: TableKind,
    filter: DateFilterSpec,
    status: StatusFilter,
    sort: Option<String>,
    direction: Option<SortDirection>,
    json: bool,
}

fn show(config: &DashboardConfig, file: &Path, clock: &dyn Clock, options: &ShowOptions) -> Result<()> {
    let offset = *clock.now().offset();
    let pipeline = SortFilterPipeline::new(
        FilterOptions::from(&config.tables),
        ValueComparator::with_offset(offset),
    );

    let records = load(file, options.table)?;
    let records = match options.table {
        TableKind::Transactions => prepare_history(records, pipeline.comparator()),
        TableKind::Users => normalize_users(records),
        TableKind::PaymentRequests => records,
    };

    let mut query = presets::for_kind(options.table);
    query.date_filter = options.filter.clone();
    query.status = options.status;

    let mut controller = query.controller();
    if let Some(column) = &options.sort {
        controller.request_sort(column, options.direction);
    }

    let rows = query.apply(&pipeline, &records, clock, controller.current());
    info!(
        table = %options.table,
        filter = %options.filter,
        status = %options.status,
        total = records.len(),
        shown = rows.len(),
        "Table ready"
    );

    if options.json {
        let value = serde_json::Value::Array(rows.iter().map(Record::to_json).collect());
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        print!(
            "{}",
            render::table(
                &query.columns,
                &controller,
                query.sortable,
                &rows,
                &RenderContext::new(offset),
            )
        );
    }
    Ok(())
}
