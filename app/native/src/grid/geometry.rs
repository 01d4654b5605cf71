//! Grid geometry: conversions between grid cells and pixel space.
//!
//! All functions are pure. Column positions use a fixed pitch of
//! `cell_size + gap`. Row positions accumulate, row by row, the tallest share
//! of any widget occupying that row plus the gap, so rows may have mixed heights.
//!
//! Medium and large pixel sizes are derived from the small cell size so the
//! three sizes always line up:
//!
//! ```text
//! small  = s × s
//! medium = (2s + gap) × s
//! large  = (2s + gap) × (2s + gap)
//! ```

use serde::{Deserialize, Serialize};

use super::types::{COLUMN_COUNT, GridCell, Span, WidgetPosition, WidgetSize, layout_bottom};
use crate::config::GridConfig;

// ============================================================================
// Geometry Types
// ============================================================================

/// A point in pixel space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self { Self { x, y } }
}

/// A rectangle with position and size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Get the center point of this rectangle.
    #[must_use]
    pub fn center(&self) -> Point { Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0) }
}

// ============================================================================
// Metrics
// ============================================================================

/// Pixel metrics of the grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridMetrics {
    /// Outer padding around the grid.
    pub padding: f64,
    /// Gap between cells, horizontally and vertically.
    pub gap: f64,
    /// Side length of a small (1×1) widget.
    pub cell_size: f64,
    /// Horizontal nudge applied to center widgets within their span.
    pub centering_offset: f64,
}

impl Default for GridMetrics {
    fn default() -> Self { Self::from_config(&GridConfig::default()) }
}

impl GridMetrics {
    /// Builds metrics from the grid configuration.
    #[must_use]
    pub const fn from_config(config: &GridConfig) -> Self {
        Self {
            padding: config.padding,
            gap: config.gap,
            cell_size: config.cell_size,
            centering_offset: config.centering_offset,
        }
    }

    /// Distance between the left edges of adjacent columns.
    #[must_use]
    pub fn column_pitch(&self) -> f64 { self.cell_size + self.gap }

    /// Distance between the top edges of adjacent uniform rows.
    #[must_use]
    pub fn row_pitch(&self) -> f64 { self.cell_size + self.gap }

    /// Horizontal centering nudge for a size.
    ///
    /// Spanning widgets move right, small widgets move left.
    #[must_use]
    pub fn centering_offset(&self, size: WidgetSize) -> f64 {
        match size {
            WidgetSize::Small => -self.centering_offset,
            WidgetSize::Medium | WidgetSize::Large => self.centering_offset,
        }
    }

    /// Pixel dimensions of a widget of the given size.
    #[must_use]
    pub fn size_to_pixel_dimensions(&self, size: WidgetSize) -> (f64, f64) {
        let span = size.span();
        (self.span_extent(span.width), self.span_extent(span.height))
    }

    /// Pixel length covered by `cells` adjacent cells, including inner gaps.
    #[must_use]
    pub fn span_extent(&self, cells: u32) -> f64 {
        let cells = f64::from(cells.max(1));
        cells.mul_add(self.cell_size, (cells - 1.0) * self.gap)
    }

    /// Height one row contributes for a widget of the given size.
    fn row_share(&self, size: WidgetSize) -> f64 {
        let span = size.span();
        let (_, height) = self.size_to_pixel_dimensions(size);
        let rows = f64::from(span.height);
        (rows - 1.0).mul_add(-self.gap, height) / rows
    }

    /// Height of a row: the tallest share of any widget occupying it.
    ///
    /// Empty rows take the height of a small cell.
    #[must_use]
    pub fn row_height(&self, row: u32, positions: &[WidgetPosition]) -> f64 {
        positions
            .iter()
            .filter(|p| row >= p.grid_y && row < p.bottom())
            .map(|p| self.row_share(p.size))
            .fold(None, |max: Option<f64>, h| Some(max.map_or(h, |m| m.max(h))))
            .unwrap_or(self.cell_size)
    }

    /// Top edge of a row.
    #[must_use]
    pub fn row_top(&self, row: u32, positions: &[WidgetPosition]) -> f64 {
        (0..row).fold(self.padding, |y, r| y + self.row_height(r, positions) + self.gap)
    }

    /// Converts a grid anchor to the top-left pixel of a widget of `size`.
    #[must_use]
    pub fn cell_to_pixel(&self, cell: GridCell, size: WidgetSize, positions: &[WidgetPosition]) -> Point {
        let x = f64::from(cell.x).mul_add(self.column_pitch(), self.padding) + self.centering_offset(size);
        let y = self.row_top(cell.y, positions);
        Point::new(x, y)
    }

    /// Inverse of [`Self::cell_to_pixel`].
    ///
    /// Walks the accumulated row heights to find the row containing `point.y`.
    /// A non-finite `y` maps to row 0.
    #[must_use]
    pub fn pixel_to_cell(&self, point: Point, size: WidgetSize, positions: &[WidgetPosition]) -> GridCell {
        let column = ((point.x - self.padding - self.centering_offset(size)) / self.column_pitch()).round();
        let max_x = f64::from(COLUMN_COUNT.saturating_sub(size.span().width));
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let x = column.clamp(0.0, max_x) as u32;

        if !point.y.is_finite() {
            return GridCell::new(x, 0);
        }

        let mut row = 0;
        let mut top = self.padding;
        loop {
            let bottom = top + self.row_height(row, positions) + self.gap;
            if point.y < bottom {
                break;
            }
            top = bottom;
            row += 1;
        }

        GridCell::new(x, row)
    }

    /// Pixel rectangle of a placed widget.
    #[must_use]
    pub fn widget_rect(&self, position: &WidgetPosition, positions: &[WidgetPosition]) -> Rect {
        let origin = self.cell_to_pixel(position.anchor(), position.size, positions);
        let (width, height) = self.size_to_pixel_dimensions(position.size);
        Rect::new(origin.x, origin.y, width, height)
    }

    /// Total pixel height of the grid content, padding included.
    #[must_use]
    pub fn content_height(&self, positions: &[WidgetPosition]) -> f64 {
        let rows = layout_bottom(positions);
        if rows == 0 {
            return self.padding * 2.0;
        }
        self.row_top(rows, positions) - self.gap + self.padding
    }

    /// Maps a dragged widget's translation to the nearest grid anchor.
    ///
    /// The widget's center point is taken in pixel space, the padding removed,
    /// and the result divided by the column and row pitch. The span's own half
    /// extent is subtracted first so that an untranslated widget maps back to
    /// its own anchor. Columns are clamped to the valid range; rows are
    /// clamped at 0 only (the rearrangement engine bounds them further).
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn drag_target_cell(
        &self,
        origin: GridCell,
        size: WidgetSize,
        translation: Point,
        positions: &[WidgetPosition],
    ) -> GridCell {
        let start = self.cell_to_pixel(origin, size, positions);
        let (width, height) = self.size_to_pixel_dimensions(size);
        let center = Rect::new(start.x + translation.x, start.y + translation.y, width, height).center();

        let Span { width: span_w, height: span_h } = size.span();
        let half_w = (f64::from(span_w) * self.column_pitch() - self.gap) / 2.0;
        let half_h = (f64::from(span_h) * self.row_pitch() - self.gap) / 2.0;

        let column = ((center.x - self.padding - half_w) / self.column_pitch()).round();
        let row = ((center.y - self.padding - half_h) / self.row_pitch()).round();

        let max_x = f64::from(COLUMN_COUNT.saturating_sub(span_w));
        GridCell::new(column.clamp(0.0, max_x) as u32, row.max(0.0) as u32)
    }
}

/// Returns the cell span for a size.
#[must_use]
pub const fn size_to_span(size: WidgetSize) -> Span { size.span() }
