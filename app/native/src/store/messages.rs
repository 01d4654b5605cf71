//! Message types for the layout actor.
//!
//! All communication with the layout actor happens through messages:
//! - `LayoutMessage` - commands sent on the command channel
//! - `LiveRearrange` - throttled previews sent on the live channel
//! - `LayoutQuery` - requests for state data (with response channel)
//! - `QueryResult` - responses from queries

use std::fmt;
use std::sync::Arc;

use eyeball::Subscriber;
use tokio::sync::oneshot;
use uuid::Uuid;

use crate::grid::{
    GridCell, GridOccupancy, LayoutSnapshot, WidgetDefinition, WidgetId, WidgetPosition, WidgetSize,
};

/// Identifier of one drag gesture (UUID v7, so ids sort by start time).
pub type DragId = Uuid;

// ============================================================================
// Commands
// ============================================================================

/// Commands sent to the layout actor.
#[derive(Debug)]
pub enum LayoutMessage {
    // ════════════════════════════════════════════════════════════════════════
    // Edit Mode
    // ════════════════════════════════════════════════════════════════════════
    /// Enter or leave edit mode. Leaving cancels every active drag.
    SetEditMode { enabled: bool },

    // ════════════════════════════════════════════════════════════════════════
    // Drag Lifecycle
    // ════════════════════════════════════════════════════════════════════════
    /// A drag gesture started on a widget.
    ///
    /// `respond_to`, when present, receives whether the drag was accepted.
    BeginDrag {
        drag_id: DragId,
        widget_id: WidgetId,
        respond_to: Option<oneshot::Sender<bool>>,
    },

    /// Authoritative end of a drag: move the widget and resolve conflicts.
    ///
    /// `respond_to` receives the widget's final anchor, or `None` if the drag
    /// was not active.
    CommitDrag {
        drag_id: DragId,
        widget_id: WidgetId,
        target: GridCell,
        respond_to: oneshot::Sender<Option<GridCell>>,
    },

    /// The gesture was interrupted; no layout change.
    CancelDrag { drag_id: DragId },

    // ════════════════════════════════════════════════════════════════════════
    // Layout Commands
    // ════════════════════════════════════════════════════════════════════════
    /// Resize a widget and move it into free space.
    Resize { widget_id: WidgetId, size: WidgetSize },

    /// Replace the whole layout (after validation).
    ResetLayout { positions: Vec<WidgetPosition> },

    // ════════════════════════════════════════════════════════════════════════
    // Queries
    // ════════════════════════════════════════════════════════════════════════
    /// Execute a query and send the result back.
    Query {
        query: LayoutQuery,
        respond_to: oneshot::Sender<QueryResult>,
    },

    /// Shutdown the actor gracefully.
    Shutdown,
}

impl LayoutMessage {
    /// Returns a human-readable name for this message type.
    ///
    /// Used for logging and debugging, especially in panic recovery.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SetEditMode { .. } => "SetEditMode",
            Self::BeginDrag { .. } => "BeginDrag",
            Self::CommitDrag { .. } => "CommitDrag",
            Self::CancelDrag { .. } => "CancelDrag",
            Self::Resize { .. } => "Resize",
            Self::ResetLayout { .. } => "ResetLayout",
            Self::Query { .. } => "Query",
            Self::Shutdown => "Shutdown",
        }
    }
}

/// A live preview request sent during an active drag.
///
/// Previews never change the committed layout. A preview whose drag is no
/// longer active is dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveRearrange {
    pub drag_id: DragId,
    pub widget_id: WidgetId,
    pub target: GridCell,
}

/// Preview of how the layout would flow if the drag ended now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutPreview {
    pub drag_id: DragId,
    pub widget_id: WidgetId,
    pub target: GridCell,
    pub positions: LayoutSnapshot,
}

// ============================================================================
// Queries
// ============================================================================

/// Queries that can be executed against the layout store.
#[derive(Debug, Clone)]
pub enum LayoutQuery {
    /// The committed layout.
    GetLayout,
    /// The current live preview, if any.
    GetPreview,
    /// Whether edit mode is on.
    GetEditMode,
    /// The occupancy matrix of the committed layout.
    GetOccupancy,
    /// One widget's position.
    GetWidget { id: WidgetId },
    /// The widget catalog.
    GetCatalog,
    /// Widgets currently being dragged.
    GetActiveDrags,
    /// Subscribe to layout, preview, and edit mode changes.
    Subscribe,
}

/// Results from queries.
#[derive(Debug)]
pub enum QueryResult {
    Layout(LayoutSnapshot),
    Preview(Option<LayoutPreview>),
    EditMode(bool),
    Occupancy(Arc<GridOccupancy>),
    Widget(Option<WidgetPosition>),
    Catalog(Vec<WidgetDefinition>),
    ActiveDrags(Vec<(WidgetId, DragId)>),
    Subscription(LayoutSubscription),
}

impl QueryResult {
    /// Try to get the committed layout from the result.
    #[must_use]
    pub fn into_layout(self) -> Option<LayoutSnapshot> {
        match self {
            Self::Layout(layout) => Some(layout),
            _ => None,
        }
    }

    /// Try to get the live preview from the result.
    #[must_use]
    pub fn into_preview(self) -> Option<Option<LayoutPreview>> {
        match self {
            Self::Preview(preview) => Some(preview),
            _ => None,
        }
    }

    /// Try to get the edit mode flag from the result.
    #[must_use]
    pub fn into_edit_mode(self) -> Option<bool> {
        match self {
            Self::EditMode(enabled) => Some(enabled),
            _ => None,
        }
    }

    /// Try to get the occupancy matrix from the result.
    #[must_use]
    pub fn into_occupancy(self) -> Option<Arc<GridOccupancy>> {
        match self {
            Self::Occupancy(occupancy) => Some(occupancy),
            _ => None,
        }
    }

    /// Try to get a widget position from the result.
    #[must_use]
    pub fn into_widget(self) -> Option<Option<WidgetPosition>> {
        match self {
            Self::Widget(widget) => Some(widget),
            _ => None,
        }
    }

    /// Try to get the catalog from the result.
    #[must_use]
    pub fn into_catalog(self) -> Option<Vec<WidgetDefinition>> {
        match self {
            Self::Catalog(catalog) => Some(catalog),
            _ => None,
        }
    }

    /// Try to get the active drags from the result.
    #[must_use]
    pub fn into_active_drags(self) -> Option<Vec<(WidgetId, DragId)>> {
        match self {
            Self::ActiveDrags(drags) => Some(drags),
            _ => None,
        }
    }

    /// Try to get the subscription from the result.
    #[must_use]
    pub fn into_subscription(self) -> Option<LayoutSubscription> {
        match self {
            Self::Subscription(subscription) => Some(subscription),
            _ => None,
        }
    }
}

// ============================================================================
// Subscriptions
// ============================================================================

/// Subscribers to the observable parts of the layout store.
///
/// Each subscriber is a `Stream` yielding the latest value after every change.
pub struct LayoutSubscription {
    pub layout: Subscriber<LayoutSnapshot>,
    pub preview: Subscriber<Option<LayoutPreview>>,
    pub edit_mode: Subscriber<bool>,
}

impl fmt::Debug for LayoutSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutSubscription").finish_non_exhaustive()
    }
}
