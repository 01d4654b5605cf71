//! Grid commands: inspect the layout and simulate host interactions.
//!
//! Drag and resize run through the same actor and controller a host screen
//! would use. Host callbacks are recorded and printed after the layout.

use std::sync::Arc;
use std::time::{Duration, Instant};

use colored::Colorize;

use crate::cli::output;
use crate::config::DashgridConfig;
use crate::drag::DragController;
use crate::error::DashgridError;
use crate::grid::{GridCell, GridMetrics, Point, WidgetPosition, WidgetSize, find_position};
use crate::store::{HostEvent, LayoutActor, LayoutHandle, RecordingHost};

/// Spacing between simulated gesture samples.
const SAMPLE_SPACING: Duration = Duration::from_millis(40);

/// Builds the single-threaded runtime the actor runs on.
fn runtime() -> Result<tokio::runtime::Runtime, DashgridError> {
    Ok(tokio::runtime::Builder::new_current_thread().enable_time().build()?)
}

/// Spawns a layout actor seeded from the configuration.
fn spawn_actor(config: &DashgridConfig) -> (LayoutHandle, Arc<RecordingHost>) {
    let host = Arc::new(RecordingHost::new());
    let handle = LayoutActor::spawn_with_config(config, host.clone());
    (handle, host)
}

/// Prints a layout plus the host callbacks that produced it.
fn report(
    title: &str,
    positions: &[WidgetPosition],
    events: &[HostEvent],
    metrics: &GridMetrics,
    json: bool,
) {
    if json {
        let value = serde_json::json!({
            "layout": positions,
            "events": events,
            "contentHeight": metrics.content_height(positions),
        });
        output::print_json(&value);
        return;
    }

    output::print_layout(title, positions, metrics);
    if !events.is_empty() {
        println!();
        println!("{}", "Host callbacks".bold());
        for event in events {
            println!("  {}", output::format_event(event));
        }
    }
}

/// Execute `layout`.
pub fn execute_layout(config: &DashgridConfig, json: bool) {
    let metrics = GridMetrics::from_config(&config.grid);

    if json {
        let widgets: Vec<serde_json::Value> = config
            .layout
            .iter()
            .map(|pos| {
                serde_json::json!({
                    "position": pos,
                    "frame": metrics.widget_rect(pos, &config.layout),
                })
            })
            .collect();
        output::print_json(&serde_json::json!({
            "widgets": widgets,
            "contentHeight": metrics.content_height(&config.layout),
        }));
        return;
    }

    output::print_layout("Layout", &config.layout, &metrics);
}

/// Execute `drag`: drags `widget_id` toward `target` in `steps` samples and commits.
pub fn execute_drag(
    config: &DashgridConfig,
    widget_id: &str,
    target: GridCell,
    steps: u32,
    json: bool,
) -> Result<(), DashgridError> {
    runtime()?.block_on(run_drag(config, widget_id, target, steps, json))
}

async fn run_drag(
    config: &DashgridConfig,
    widget_id: &str,
    target: GridCell,
    steps: u32,
    json: bool,
) -> Result<(), DashgridError> {
    let metrics = GridMetrics::from_config(&config.grid);
    let (handle, host) = spawn_actor(config);
    handle.set_edit_mode(true)?;

    let snapshot = handle.layout().await?;
    let Some(position) = find_position(&snapshot, widget_id).cloned() else {
        return Err(DashgridError::InvalidArguments(format!("unknown widget '{widget_id}'")));
    };

    let from = metrics.cell_to_pixel(position.anchor(), position.size, &snapshot);
    let to = metrics.cell_to_pixel(target, position.size, &snapshot);
    let delta = Point::new(to.x - from.x, to.y - from.y);

    let mut controller = DragController::new(handle.clone(), metrics, &config.drag);
    let edit = controller.edit_visual().await?;
    tracing::debug!("cli: edit mode on, widgets presented at {:.2}x", edit.scale);

    let start = Instant::now();
    controller.begin(widget_id, snapshot, start)?;

    let steps = steps.max(1);
    let mut at = start;
    for step in 1..steps {
        let t = f64::from(step) / f64::from(steps);
        at += SAMPLE_SPACING;
        controller.update(Point::new(delta.x * t, delta.y * t), at)?;
        // Let the actor answer the preview before the next sample.
        tokio::task::yield_now().await;
    }

    let committed = controller.end(delta, at + SAMPLE_SPACING).await?;
    tracing::debug!("cli: drag of '{widget_id}' committed at {committed}");

    let layout = handle.layout().await?;
    handle.shutdown()?;

    if !json && committed != target {
        println!(
            "{} requested {target}, landed at {committed}",
            "note:".yellow().bold()
        );
    }
    report("Layout after drag", &layout, &host.take(), &metrics, json);
    Ok(())
}

/// Execute `resize`.
pub fn execute_resize(
    config: &DashgridConfig,
    widget_id: &str,
    size: WidgetSize,
    json: bool,
) -> Result<(), DashgridError> {
    runtime()?.block_on(run_resize(config, widget_id, size, json))
}

async fn run_resize(
    config: &DashgridConfig,
    widget_id: &str,
    size: WidgetSize,
    json: bool,
) -> Result<(), DashgridError> {
    let metrics = GridMetrics::from_config(&config.grid);
    let (handle, host) = spawn_actor(config);

    if handle.widget(widget_id).await?.is_none() {
        return Err(DashgridError::InvalidArguments(format!("unknown widget '{widget_id}'")));
    }

    handle.resize(widget_id, size)?;
    let layout = handle.layout().await?;
    handle.shutdown()?;

    let events = host.take();
    if !json && events.is_empty() {
        println!("{} '{widget_id}' was not resized to {size}", "note:".yellow().bold());
    }
    report("Layout after resize", &layout, &events, &metrics, json);
    Ok(())
}
