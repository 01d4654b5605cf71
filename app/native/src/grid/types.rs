//! Core types for the widget grid.
//!
//! These types form the data model shared by every grid component:
//! - `WidgetDefinition` is the static catalog entry (id, native size, allowed sizes)
//! - `WidgetPosition` is the mutable placement owned by the layout store
//! - `LayoutSnapshot` is the immutable view readers operate on
//!
//! Cell spans are always derived from the widget size:
//!
//! | size   | span (w × h) |
//! |--------|--------------|
//! | small  | 1 × 1        |
//! | medium | 2 × 1        |
//! | large  | 2 × 2        |

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Number of columns in the dashboard grid.
pub const COLUMN_COUNT: u32 = 2;

/// Rows a layout may extend to. Anchors loaded from configuration past this
/// are rejected, and rearrangement never moves a widget beyond it.
pub const MAX_ROWS: u32 = 4096;

/// Identifier of a widget. Stable for the lifetime of the widget.
pub type WidgetId = String;

/// Immutable snapshot of a layout, cheap to clone and share across tasks.
pub type LayoutSnapshot = Arc<[WidgetPosition]>;

// ============================================================================
// Sizes and Spans
// ============================================================================

/// Size class of a widget.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum WidgetSize {
    /// One cell.
    #[default]
    Small,
    /// Two cells side by side.
    Medium,
    /// Two by two cells.
    Large,
}

impl WidgetSize {
    /// All sizes, smallest first.
    pub const ALL: [Self; 3] = [Self::Small, Self::Medium, Self::Large];

    /// Returns the cell span for this size.
    #[must_use]
    pub const fn span(self) -> Span {
        match self {
            Self::Small => Span::new(1, 1),
            Self::Medium => Span::new(2, 1),
            Self::Large => Span::new(2, 2),
        }
    }

    /// Returns the lowercase name used in configuration and on the CLI.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }
}

impl fmt::Display for WidgetSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for WidgetSize {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "small" => Ok(Self::Small),
            "medium" => Ok(Self::Medium),
            "large" => Ok(Self::Large),
            _ => Err(LayoutError::UnknownSize(s.to_string())),
        }
    }
}

/// Width and height of a widget in grid cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub width: u32,
    pub height: u32,
}

impl Span {
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self { Self { width, height } }
}

/// A single grid cell coordinate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridCell {
    pub x: u32,
    pub y: u32,
}

impl GridCell {
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self { Self { x, y } }
}

impl fmt::Display for GridCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "({}, {})", self.x, self.y) }
}

// ============================================================================
// Widget Definition
// ============================================================================

/// Static catalog entry describing a widget kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WidgetDefinition {
    /// Unique widget identifier.
    pub id: WidgetId,

    /// Size the widget is created with.
    pub native_size: WidgetSize,

    /// Sizes the widget may be resized to.
    pub available_sizes: Vec<WidgetSize>,
}

impl WidgetDefinition {
    /// Creates a definition that allows the given sizes.
    #[must_use]
    pub fn new(id: &str, native_size: WidgetSize, available_sizes: &[WidgetSize]) -> Self {
        Self {
            id: id.to_string(),
            native_size,
            available_sizes: available_sizes.to_vec(),
        }
    }

    /// Returns whether the widget may take the given size.
    #[must_use]
    pub fn allows(&self, size: WidgetSize) -> bool { self.available_sizes.contains(&size) }
}

// ============================================================================
// Widget Position
// ============================================================================

/// Placement of one widget on the grid.
///
/// `width` and `height` are always derived from `size`; use [`Self::set_size`]
/// to change the size so both stay consistent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
#[serde(try_from = "RawWidgetPosition")]
pub struct WidgetPosition {
    /// Widget identifier.
    pub id: WidgetId,

    /// Column of the top-left cell.
    pub grid_x: u32,

    /// Row of the top-left cell.
    pub grid_y: u32,

    /// Current size class.
    pub size: WidgetSize,

    /// Span width in cells (derived from `size`).
    pub width: u32,

    /// Span height in cells (derived from `size`).
    pub height: u32,
}

/// Deserialization shape; the span is recomputed from the size.
#[derive(Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
struct RawWidgetPosition {
    id: WidgetId,
    grid_x: u32,
    grid_y: u32,
    size: WidgetSize,
}

impl TryFrom<RawWidgetPosition> for WidgetPosition {
    type Error = LayoutError;

    fn try_from(raw: RawWidgetPosition) -> Result<Self, Self::Error> {
        if raw.id.is_empty() {
            return Err(LayoutError::EmptyId);
        }
        Ok(Self::new(&raw.id, raw.grid_x, raw.grid_y, raw.size))
    }
}

impl WidgetPosition {
    /// Creates a position with the span derived from `size`.
    #[must_use]
    pub fn new(id: &str, grid_x: u32, grid_y: u32, size: WidgetSize) -> Self {
        let span = size.span();
        Self {
            id: id.to_string(),
            grid_x,
            grid_y,
            size,
            width: span.width,
            height: span.height,
        }
    }

    /// Changes the size and recomputes the span.
    pub const fn set_size(&mut self, size: WidgetSize) {
        let span = size.span();
        self.size = size;
        self.width = span.width;
        self.height = span.height;
    }

    /// Moves the anchor cell.
    pub const fn move_to(&mut self, cell: GridCell) {
        self.grid_x = cell.x;
        self.grid_y = cell.y;
    }

    /// Returns the anchor (top-left) cell.
    #[must_use]
    pub const fn anchor(&self) -> GridCell { GridCell::new(self.grid_x, self.grid_y) }

    /// Returns the span of this widget.
    #[must_use]
    pub const fn span(&self) -> Span { Span::new(self.width, self.height) }

    /// Column just past the right edge.
    #[must_use]
    pub const fn right(&self) -> u32 { self.grid_x.saturating_add(self.width) }

    /// Row just past the bottom edge.
    #[must_use]
    pub const fn bottom(&self) -> u32 { self.grid_y.saturating_add(self.height) }

    /// Returns whether the widget covers the given cell.
    #[must_use]
    pub const fn covers(&self, cell: GridCell) -> bool {
        cell.x >= self.grid_x && cell.x < self.right() && cell.y >= self.grid_y && cell.y < self.bottom()
    }

    /// Returns whether the cell rectangles of two widgets share any cell.
    #[must_use]
    pub const fn intersects(&self, other: &Self) -> bool {
        rects_intersect(
            (self.grid_x, self.grid_y, self.width, self.height),
            (other.grid_x, other.grid_y, other.width, other.height),
        )
    }

    /// Returns whether the widget lies within the column and row bounds.
    #[must_use]
    pub const fn in_bounds(&self) -> bool {
        match (self.grid_x.checked_add(self.width), self.grid_y.checked_add(self.height)) {
            (Some(right), Some(bottom)) => right <= COLUMN_COUNT && bottom <= MAX_ROWS,
            _ => false,
        }
    }

    /// Returns every cell the widget occupies, row-major.
    #[must_use]
    pub fn cells(&self) -> SmallVec<[GridCell; 4]> {
        let mut cells = SmallVec::new();
        for y in self.grid_y..self.bottom() {
            for x in self.grid_x..self.right() {
                cells.push(GridCell::new(x, y));
            }
        }
        cells
    }
}

/// Returns whether two `(x, y, width, height)` cell rectangles overlap.
#[must_use]
pub const fn rects_intersect(a: (u32, u32, u32, u32), b: (u32, u32, u32, u32)) -> bool {
    a.0 < b.0.saturating_add(b.2)
        && a.0.saturating_add(a.2) > b.0
        && a.1 < b.1.saturating_add(b.3)
        && a.1.saturating_add(a.3) > b.1
}

/// Finds a widget by id.
#[must_use]
pub fn find_position<'a>(positions: &'a [WidgetPosition], id: &str) -> Option<&'a WidgetPosition> {
    positions.iter().find(|p| p.id == id)
}

/// Returns the first row below every widget (0 for an empty layout).
#[must_use]
pub fn layout_bottom<'a>(positions: impl IntoIterator<Item = &'a WidgetPosition>) -> u32 {
    positions.into_iter().map(WidgetPosition::bottom).max().unwrap_or(0)
}

// ============================================================================
// Validation
// ============================================================================

/// Errors describing an invalid layout.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    /// A widget id is empty.
    #[error("widget id must not be empty")]
    EmptyId,

    /// Two widgets share an id.
    #[error("duplicate widget id '{0}'")]
    DuplicateId(WidgetId),

    /// A widget extends past the last column.
    #[error("widget '{id}' at column {grid_x} with width {width} exceeds {COLUMN_COUNT} columns")]
    OutOfBounds { id: WidgetId, grid_x: u32, width: u32 },

    /// A widget extends past the last allowed row.
    #[error("widget '{id}' at row {grid_y} with height {height} exceeds {MAX_ROWS} rows")]
    RowOutOfRange { id: WidgetId, grid_y: u32, height: u32 },

    /// A widget's span does not match its size.
    #[error("widget '{0}' span does not match its size")]
    SpanMismatch(WidgetId),

    /// Two widgets overlap.
    #[error("widgets '{0}' and '{1}' overlap")]
    Overlap(WidgetId, WidgetId),

    /// A size name could not be parsed.
    #[error("unknown widget size '{0}' (expected small, medium or large)")]
    UnknownSize(String),
}

/// Checks every layout invariant: unique ids, consistent spans, bounds, no overlap.
///
/// # Errors
///
/// Returns the first violated invariant.
pub fn validate_layout(positions: &[WidgetPosition]) -> Result<(), LayoutError> {
    let mut seen = HashSet::with_capacity(positions.len());

    for (idx, position) in positions.iter().enumerate() {
        if position.id.is_empty() {
            return Err(LayoutError::EmptyId);
        }
        if !seen.insert(position.id.as_str()) {
            return Err(LayoutError::DuplicateId(position.id.clone()));
        }
        if position.span() != position.size.span() {
            return Err(LayoutError::SpanMismatch(position.id.clone()));
        }
        if position.grid_x.checked_add(position.width).is_none_or(|right| right > COLUMN_COUNT) {
            return Err(LayoutError::OutOfBounds {
                id: position.id.clone(),
                grid_x: position.grid_x,
                width: position.width,
            });
        }
        if position.grid_y.checked_add(position.height).is_none_or(|bottom| bottom > MAX_ROWS) {
            return Err(LayoutError::RowOutOfRange {
                id: position.id.clone(),
                grid_y: position.grid_y,
                height: position.height,
            });
        }
        if let Some(other) = positions[idx + 1..].iter().find(|other| position.intersects(other)) {
            return Err(LayoutError::Overlap(position.id.clone(), other.id.clone()));
        }
    }

    Ok(())
}
