//! CLI output formatting utilities.
//!
//! This module renders layouts for the terminal:
//! - a table with grid and pixel coordinates
//! - an ASCII picture of the occupancy grid
//! - one line per host callback

use colored::Colorize;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use crate::grid::{COLUMN_COUNT, GridCell, GridMetrics, GridOccupancy, WidgetPosition};
use crate::store::HostEvent;

/// Width of one cell in the ASCII grid, excluding borders.
const CELL_WIDTH: usize = 12;

/// Renders the layout as a table.
#[must_use]
pub fn layout_table(positions: &[WidgetPosition], metrics: &GridMetrics) -> String {
    #[derive(Tabled)]
    struct WidgetRow {
        #[tabled(rename = "Widget")]
        id: String,
        #[tabled(rename = "Size")]
        size: String,
        #[tabled(rename = "Cell")]
        cell: String,
        #[tabled(rename = "Span")]
        span: String,
        #[tabled(rename = "Frame")]
        frame: String,
    }

    let rows: Vec<WidgetRow> = positions
        .iter()
        .map(|pos| {
            let rect = metrics.widget_rect(pos, positions);
            WidgetRow {
                id: pos.id.clone(),
                size: pos.size.to_string(),
                cell: pos.anchor().to_string(),
                span: format!("{}×{}", pos.width, pos.height),
                frame: format!("{:.0}, {:.0} {:.0}×{:.0}", rect.x, rect.y, rect.width, rect.height),
            }
        })
        .collect();

    Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(2..5)).with(Alignment::right()))
        .to_string()
}

/// Renders the occupancy grid, one box per cell.
#[must_use]
pub fn ascii_grid(positions: &[WidgetPosition]) -> String {
    let occupancy = GridOccupancy::from_positions(positions);
    let border = format!("+{}", format!("{}+", "-".repeat(CELL_WIDTH)).repeat(COLUMN_COUNT as usize));

    let mut out = String::new();
    out.push_str(&border);
    out.push('\n');

    for y in 0..occupancy.rows() {
        out.push('|');
        for x in 0..COLUMN_COUNT {
            let label = occupancy.occupant(GridCell::new(x, y)).map_or_else(
                || format!("{:<CELL_WIDTH$}", " ·"),
                |id| format!(" {:<width$}", truncate(id, CELL_WIDTH - 1), width = CELL_WIDTH - 1),
            );
            out.push_str(&label);
            out.push('|');
        }
        out.push('\n');
        out.push_str(&border);
        out.push('\n');
    }

    out
}

/// Formats a host callback for display.
#[must_use]
pub fn format_event(event: &HostEvent) -> String {
    match event {
        HostEvent::PositionChange { id, grid_x, grid_y } => {
            format!("{} {id} → {}", "moved  ".green().bold(), GridCell::new(*grid_x, *grid_y))
        }
        HostEvent::LiveRearrange { id, grid_x, grid_y } => {
            format!("{} {id} → {}", "preview".cyan(), GridCell::new(*grid_x, *grid_y))
        }
        HostEvent::Resize { id, size } => format!("{} {id} → {size}", "resized".yellow().bold()),
    }
}

/// Prints the full human-readable view of a layout.
pub fn print_layout(title: &str, positions: &[WidgetPosition], metrics: &GridMetrics) {
    let count = positions.len();
    println!("{}", format!("{title} ({count} widgets)").bold());
    println!("{}", layout_table(positions, metrics));
    print!("{}", ascii_grid(positions));
    println!("{} {:.0}px", "Content height:".dimmed(), metrics.content_height(positions));
}

/// Prints a JSON value.
pub fn print_json(value: &serde_json::Value) {
    let json = serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string());
    println!("{json}");
}

/// Truncates a string to a maximum number of characters, adding ellipsis if needed.
#[must_use]
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else if max_chars <= 1 {
        "…".to_string()
    } else {
        let truncate_at = s.char_indices().nth(max_chars - 1).map_or(s.len(), |(idx, _)| idx);
        format!("{}…", &s[..truncate_at])
    }
}
