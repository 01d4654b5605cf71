//! Drag state machine types.
//!
//! ```text
//! Idle ──begin──▶ Dragging ──release──▶ Committing ──commit──▶ Idle
//!                    │
//!                    └──cancel──▶ Cancelled ──settle/begin──▶ Idle
//! ```
//!
//! Each state carries its own payload, so a transition cannot read data that
//! belongs to another state.

use std::time::Instant;

use crate::grid::{GridCell, LayoutSnapshot, Point, WidgetId, WidgetSize};
use crate::store::DragId;

/// A drag in progress.
#[derive(Debug, Clone)]
pub struct DragSession {
    /// Identifier shared with the layout store.
    pub drag_id: DragId,
    /// The widget being dragged.
    pub widget_id: WidgetId,
    /// Size of the dragged widget.
    pub size: WidgetSize,
    /// Anchor at gesture start; the reference frame for translations.
    pub origin: GridCell,
    /// Layout at gesture start, used for pixel conversions.
    pub snapshot: LayoutSnapshot,
    /// Latest pixel translation reported by the gesture runtime.
    pub translation: Point,
    /// Latest candidate cell.
    pub candidate: GridCell,
    /// When the gesture started.
    pub started_at: Instant,
}

/// The authoritative end of a drag, waiting to be delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRequest {
    pub drag_id: DragId,
    pub widget_id: WidgetId,
    pub origin: GridCell,
    pub target: GridCell,
}

/// Phase of the drag state machine.
#[derive(Debug, Clone, Default)]
pub enum DragPhase {
    /// No gesture.
    #[default]
    Idle,
    /// Gesture active; live previews may be dispatched.
    Dragging(DragSession),
    /// Gesture released; the commit has not been delivered yet.
    Committing(CommitRequest),
    /// Gesture interrupted; the widget returns to its pre-drag position.
    Cancelled(DragSession),
}

impl DragPhase {
    /// Returns a short name for logging.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Dragging(_) => "Dragging",
            Self::Committing(_) => "Committing",
            Self::Cancelled(_) => "Cancelled",
        }
    }

    #[must_use]
    pub const fn is_idle(&self) -> bool { matches!(self, Self::Idle) }

    /// The widget involved in the current gesture, if any.
    #[must_use]
    pub fn widget_id(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::Dragging(session) | Self::Cancelled(session) => Some(&session.widget_id),
            Self::Committing(request) => Some(&request.widget_id),
        }
    }
}

/// Presentation state of the dragged widget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragVisual {
    /// Pixel offset from the widget's laid-out position.
    pub offset: Point,
    /// Scale factor.
    pub scale: f64,
}

impl DragVisual {
    /// No offset, natural size.
    pub const REST: Self = Self { offset: Point::new(0.0, 0.0), scale: 1.0 };
}

impl Default for DragVisual {
    fn default() -> Self { Self::REST }
}

/// Presentation scale applied to every widget while in edit mode.
///
/// Orthogonal to the drag state machine; never changes positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditVisual {
    pub scale: f64,
}

impl EditVisual {
    /// Scale for the given edit mode.
    #[must_use]
    pub const fn for_mode(editing: bool, edit_scale: f64) -> Self {
        Self { scale: if editing { edit_scale } else { 1.0 } }
    }
}
