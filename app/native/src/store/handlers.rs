//! Message handlers for the layout actor.
//!
//! Each handler takes the store and the host, applies one command, and fires
//! the matching host callbacks. Rejected requests are logged and ignored; they
//! never leave the store half-updated.

use std::borrow::Cow;

use super::host::GridHost;
use super::messages::{DragId, LayoutPreview, LiveRearrange};
use super::state::LayoutStore;
use crate::grid::{GridCell, WidgetPosition, WidgetSize, rearrange_with, resize_with, validate_layout};

// ============================================================================
// Edit Mode
// ============================================================================

/// Enter or leave edit mode. Leaving cancels every active drag.
pub fn on_set_edit_mode(store: &mut LayoutStore, enabled: bool) {
    if !enabled && !store.active_drags().is_empty() {
        tracing::debug!("store: leaving edit mode, cancelling active drags");
        store.clear_drags();
    }
    store.set_edit_mode(enabled);
}

// ============================================================================
// Drag Lifecycle
// ============================================================================

/// Register a drag. Returns whether the drag was accepted.
pub fn on_begin_drag(store: &mut LayoutStore, drag_id: DragId, widget_id: &str) -> bool {
    if !store.is_edit_mode() {
        tracing::warn!("store: drag on '{widget_id}' rejected, not in edit mode");
        return false;
    }

    if store.get_widget(widget_id).is_none() {
        tracing::warn!("store: drag on '{widget_id}' rejected, widget not found");
        return false;
    }

    if !store.begin_drag(widget_id, drag_id) {
        tracing::warn!("store: drag on '{widget_id}' rejected, widget is already being dragged");
        return false;
    }

    tracing::debug!("store: drag {drag_id} started on '{widget_id}'");
    true
}

/// Compute a preview for an active drag. Stale previews are dropped.
pub fn on_live_rearrange(store: &mut LayoutStore, host: &dyn GridHost, live: LiveRearrange) {
    let LiveRearrange { drag_id, widget_id, target } = live;

    if store.drag_widget(drag_id) != Some(widget_id.as_str()) {
        tracing::trace!("store: dropping stale preview for '{widget_id}' (drag {drag_id})");
        return;
    }

    let layout = store.snapshot();
    let occupancy = store.occupancy();
    let outcome =
        rearrange_with(&occupancy, &widget_id, i64::from(target.x), i64::from(target.y), &layout);

    let positions = match outcome.positions {
        Cow::Borrowed(_) => std::sync::Arc::clone(&layout),
        Cow::Owned(positions) => positions.into(),
    };

    tracing::trace!("store: preview '{widget_id}' at {}", outcome.target);
    store.set_preview(LayoutPreview {
        drag_id,
        widget_id: widget_id.clone(),
        target: outcome.target,
        positions,
    });
    host.on_live_rearrange(&widget_id, outcome.target.x, outcome.target.y);
}

/// Commit a drag: move the widget and resolve every conflict.
///
/// Returns the widget's final anchor, or `None` if the drag was not active.
pub fn on_commit_drag(
    store: &mut LayoutStore,
    host: &dyn GridHost,
    drag_id: DragId,
    widget_id: &str,
    target: GridCell,
) -> Option<GridCell> {
    let Some(active_widget) = store.end_drag(drag_id) else {
        tracing::warn!("store: commit for '{widget_id}' ignored, drag {drag_id} is not active");
        return None;
    };

    if active_widget != widget_id {
        tracing::warn!(
            "store: commit for '{widget_id}' ignored, drag {drag_id} belongs to '{active_widget}'"
        );
        return None;
    }

    let layout = store.snapshot();
    let occupancy = store.occupancy();
    let outcome =
        rearrange_with(&occupancy, widget_id, i64::from(target.x), i64::from(target.y), &layout);

    if let Cow::Owned(positions) = outcome.positions {
        tracing::debug!(
            "store: committed '{widget_id}' at {} ({} displaced)",
            outcome.target,
            outcome.relocations.len()
        );
        store.commit(positions);
    } else {
        tracing::debug!("store: committed '{widget_id}' in place");
    }

    host.on_position_change(widget_id, outcome.target.x, outcome.target.y);
    Some(outcome.target)
}

/// Cancel a drag. The committed layout is untouched.
pub fn on_cancel_drag(store: &mut LayoutStore, drag_id: DragId) {
    match store.end_drag(drag_id) {
        Some(widget_id) => tracing::debug!("store: drag {drag_id} on '{widget_id}' cancelled"),
        None => tracing::trace!("store: cancel for inactive drag {drag_id} ignored"),
    }
}

// ============================================================================
// Layout Commands
// ============================================================================

/// Resize a widget into free space.
///
/// Sizes outside the widget's allowed set and widgets mid-drag are rejected.
pub fn on_resize(store: &mut LayoutStore, host: &dyn GridHost, widget_id: &str, size: WidgetSize) {
    let Some(current) = store.get_widget(widget_id) else {
        tracing::warn!("store: resize of '{widget_id}' ignored, widget not found");
        return;
    };

    if !store.registry().allows(widget_id, size) {
        tracing::warn!("store: resize of '{widget_id}' to {size} rejected, size not allowed");
        return;
    }

    if store.active_drag(widget_id).is_some() {
        tracing::warn!("store: resize of '{widget_id}' rejected, widget is being dragged");
        return;
    }

    let layout = store.snapshot();
    let occupancy = store.occupancy();
    let Cow::Owned(positions) = resize_with(&occupancy, widget_id, size, &layout) else {
        tracing::trace!("store: resize of '{widget_id}' to {size} is a no-op");
        return;
    };

    let anchor = positions
        .iter()
        .find(|p| p.id == widget_id)
        .map_or(current.anchor(), WidgetPosition::anchor);
    store.commit(positions);

    host.on_resize(widget_id, size);
    if anchor != current.anchor() {
        host.on_position_change(widget_id, anchor.x, anchor.y);
    }
}

/// Replace the whole layout if it is valid.
pub fn on_reset_layout(store: &mut LayoutStore, positions: Vec<WidgetPosition>) {
    if let Err(err) = validate_layout(&positions) {
        tracing::warn!("store: layout reset rejected: {err}");
        return;
    }

    store.clear_drags();
    store.commit(positions);
    tracing::debug!("store: layout reset");
}
