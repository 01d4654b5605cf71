//! Widget grid engine.
//!
//! A fixed 2-column grid with dynamic rows. Widgets come in three sizes
//! (small 1×1, medium 2×1, large 2×2) and never overlap.
//!
//! # Module Structure
//!
//! - `types` - Widget sizes, positions, definitions, and layout validation
//! - `occupancy` - Cell → widget matrix and its hash-keyed cache
//! - `geometry` - Grid cell ↔ pixel conversions
//! - `placement` - Nearest free rectangle search
//! - `rearrange` - Move a widget and displace whatever it lands on
//! - `resize` - Change a widget's size and relocate it into free space
//! - `registry` - Widget catalog and the default layout
//!
//! Every function in this module is pure: it takes a position list and returns
//! a new one (or the same one, borrowed, when nothing changed).

pub mod geometry;
pub mod occupancy;
pub mod placement;
pub mod rearrange;
pub mod registry;
pub mod resize;
pub mod types;

pub use geometry::{GridMetrics, Point, Rect, size_to_span};
pub use occupancy::{GridOccupancy, OccupancyCache, compute_layout_hash};
pub use placement::{find_free_position, find_free_position_in};
pub use rearrange::{
    Displacement, RearrangeOutcome, Relocation, rearrange, rearrange_detailed, rearrange_with,
};
pub use registry::{WidgetRegistry, default_catalog, default_layout, layout_for_catalog};
pub use resize::{resize, resize_with};
pub use types::{
    COLUMN_COUNT, GridCell, LayoutError, LayoutSnapshot, MAX_ROWS, Span, WidgetDefinition, WidgetId,
    WidgetPosition, WidgetSize, find_position, layout_bottom, validate_layout,
};
