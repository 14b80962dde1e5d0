//! Plain text table rendering

use lv_core::types::Record;
use lv_tables::columns::{Align, ColumnSet, Header, RenderContext};
use lv_tables::controller::TableSortController;
use lv_tables::sorts::SortDirection;
use lv_tables::status::{StatusCounts, StatusFilter};

const EMPTY: &str = "(no rows)";

fn header_text(header: &Header) -> String {
    match header.sort {
        Some(state) if state.show_icon => {
            let arrow = match state.direction {
                SortDirection::Asc => '▲',
                SortDirection::Desc => '▼',
            };
            format!("{} {}", header.label, arrow)
        }
        _ => header.label.clone(),
    }
}

fn pad(text: &str, width: usize, align: Align) -> String {
    match align {
        Align::Left => format!("{:<width$}", text),
        Align::Center => format!("{:^width$}", text),
        Align::Right => format!("{:>width$}", text),
    }
}

/// Render rows as an aligned text table with sort indicators
pub fn table(
    columns: &ColumnSet,
    controller: &TableSortController,
    sortable: bool,
    rows: &[Record],
    ctx: &RenderContext,
) -> String {
    let headers = columns.headers(controller, sortable);
    let mut grid: Vec<Vec<String>> = Vec::with_capacity(rows.len() + 1);
    grid.push(headers.iter().map(header_text).collect());
    grid.extend(rows.iter().map(|row| columns.render_row(row, ctx)));

    let widths: Vec<usize> = (0..headers.len())
        .map(|i| {
            grid.iter()
                .map(|cells| cells[i].chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    for (n, cells) in grid.iter().enumerate() {
        let line: Vec<String> = cells
            .iter()
            .zip(&headers)
            .zip(&widths)
            .map(|((cell, header), width)| pad(cell, *width, header.align))
            .collect();
        out.push_str(line.join("  ").trim_end());
        out.push('\n');
        if n == 0 {
            let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
            out.push_str(&rule.join("  "));
            out.push('\n');
        }
    }
    if rows.is_empty() {
        out.push_str(EMPTY);
        out.push('\n');
    }
    out
}

/// One line per status with its request count
pub fn status_counts(counts: &StatusCounts) -> String {
    StatusFilter::ALL
        .iter()
        .map(|status| format!("{:<9}{}\n", status.as_str(), counts.get(*status)))
        .collect()
}
