//! Callbacks into the screen hosting the grid.
//!
//! The layout actor calls these after the layout changes. Implementations run
//! on the actor task and should return quickly.

use parking_lot::Mutex;
use serde::Serialize;

use crate::grid::{WidgetId, WidgetSize};

/// Host-side callbacks fired by the layout actor.
pub trait GridHost: Send + Sync + 'static {
    /// A drag was committed or a resize moved a widget.
    ///
    /// Fired once per completed drag or resize with the widget's final anchor.
    /// The host is expected to persist and re-render the full layout.
    fn on_position_change(&self, _id: &str, _grid_x: u32, _grid_y: u32) {}

    /// A live preview was computed during an active drag.
    ///
    /// The host re-renders a preview layout without committing.
    fn on_live_rearrange(&self, _id: &str, _grid_x: u32, _grid_y: u32) {}

    /// A widget was resized.
    fn on_resize(&self, _id: &str, _size: WidgetSize) {}
}

/// Host that ignores every callback.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHost;

impl GridHost for NoopHost {}

/// A callback observed by [`RecordingHost`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum HostEvent {
    PositionChange { id: WidgetId, grid_x: u32, grid_y: u32 },
    LiveRearrange { id: WidgetId, grid_x: u32, grid_y: u32 },
    Resize { id: WidgetId, size: WidgetSize },
}

/// Host that records every callback in order.
#[derive(Debug, Default)]
pub struct RecordingHost {
    events: Mutex<Vec<HostEvent>>,
}

impl RecordingHost {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Returns a copy of the recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<HostEvent> { self.events.lock().clone() }

    /// Removes and returns the recorded events.
    pub fn take(&self) -> Vec<HostEvent> { std::mem::take(&mut *self.events.lock()) }
}

impl GridHost for RecordingHost {
    fn on_position_change(&self, id: &str, grid_x: u32, grid_y: u32) {
        self.events.lock().push(HostEvent::PositionChange { id: id.to_string(), grid_x, grid_y });
    }

    fn on_live_rearrange(&self, id: &str, grid_x: u32, grid_y: u32) {
        self.events.lock().push(HostEvent::LiveRearrange { id: id.to_string(), grid_x, grid_y });
    }

    fn on_resize(&self, id: &str, size: WidgetSize) {
        self.events.lock().push(HostEvent::Resize { id: id.to_string(), size });
    }
}
