//! Dashgrid - a widget grid engine for dashboards.
//!
//! Widgets of three sizes live on a two-column grid. The engine places new
//! widgets, rearranges the grid while a widget is dragged, resizes widgets,
//! and converts between grid cells and pixels.
//!
//! - `grid` - Pure layout algorithms and geometry
//! - `store` - The single-writer layout actor and its host callbacks
//! - `drag` - The drag gesture state machine
//! - `config` - JSONC configuration loading
//! - `cli` - The host simulator behind the `dashgrid` binary

pub mod cli;
pub mod config;
pub mod drag;
pub mod error;
pub mod grid;
pub mod schema;
pub mod store;
