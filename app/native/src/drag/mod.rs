//! Drag controller.
//!
//! Converts continuous gesture translation into grid cells, throttles live
//! previews, and delivers one authoritative commit per completed drag.
//!
//! # Module Structure
//!
//! - `state` - Drag phases and their payloads
//! - `throttle` - Live preview gate
//! - `controller` - The state machine driving the layout actor

mod controller;
mod state;
mod throttle;

pub use controller::{DragController, DragError};
pub use state::{CommitRequest, DragPhase, DragSession, DragVisual, EditVisual};
pub use throttle::LiveThrottle;
