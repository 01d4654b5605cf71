//! Integration tests for the grid engine.
//!
//! ## Running these tests
//! ```bash
//! cargo test -p dashgrid --test integration
//! ```
//!
//! - `grid_properties` - Randomized checks of the layout invariants
//! - `drag_scenarios` - End-to-end drags and resizes through the layout actor

mod common;
mod drag_scenarios;
mod grid_properties;
