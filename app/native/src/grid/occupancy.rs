//! Derived occupancy matrix and its memoization.
//!
//! The occupancy matrix maps every cell of the 2-column grid to the widget
//! occupying it. It is always recomputable from the position list and is never
//! edited by hand outside of the rearrangement working copy.
//!
//! `OccupancyCache` is owned by the layout store and keyed by a structural hash
//! of the position list. A key change always triggers a recomputation, so the
//! worst failure mode is a redundant rebuild, never a stale matrix.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use super::types::{COLUMN_COUNT, GridCell, WidgetId, WidgetPosition, layout_bottom};

const COLUMNS: usize = COLUMN_COUNT as usize;

// ============================================================================
// Occupancy Matrix
// ============================================================================

/// Cell → widget id matrix, `COLUMN_COUNT` wide and as tall as the layout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridOccupancy {
    rows: Vec<[Option<WidgetId>; COLUMNS]>,
}

impl GridOccupancy {
    /// Creates an empty matrix.
    #[must_use]
    pub const fn new() -> Self { Self { rows: Vec::new() } }

    /// Builds the matrix for a position list.
    ///
    /// Cells outside the column range are ignored. When two widgets claim the
    /// same cell, the one listed later wins.
    #[must_use]
    pub fn from_positions(positions: &[WidgetPosition]) -> Self {
        let mut occupancy = Self::new();
        occupancy.ensure_rows(layout_bottom(positions));
        for position in positions {
            occupancy.place(position);
        }
        occupancy
    }

    /// Number of rows currently tracked.
    #[must_use]
    pub fn rows(&self) -> u32 { u32::try_from(self.rows.len()).unwrap_or(u32::MAX) }

    /// Returns the widget occupying a cell, if any.
    #[must_use]
    pub fn occupant(&self, cell: GridCell) -> Option<&str> {
        self.rows
            .get(cell.y as usize)
            .and_then(|row| row.get(cell.x as usize))
            .and_then(|slot| slot.as_deref())
    }

    /// Returns whether a cell is empty, treating `exclude` as empty.
    ///
    /// Cells below the tracked rows are free; cells past the last column are not.
    #[must_use]
    pub fn is_free(&self, cell: GridCell, exclude: Option<&str>) -> bool {
        if cell.x >= COLUMN_COUNT {
            return false;
        }
        match self.occupant(cell) {
            None => true,
            Some(id) => exclude.is_some_and(|excluded| excluded == id),
        }
    }

    /// Returns whether every cell of the rectangle is free.
    #[must_use]
    pub fn is_rect_free(&self, x: u32, y: u32, width: u32, height: u32, exclude: Option<&str>) -> bool {
        if x.checked_add(width).is_none_or(|right| right > COLUMN_COUNT) {
            return false;
        }
        (y..y.saturating_add(height)).all(|row| (x..x + width).all(|col| self.is_free(GridCell::new(col, row), exclude)))
    }

    /// Returns the distinct widgets intersecting a rectangle, in scan order.
    #[must_use]
    pub fn occupants_in(
        &self,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        exclude: Option<&str>,
    ) -> Vec<WidgetId> {
        let mut found: Vec<WidgetId> = Vec::new();
        for row in y..y.saturating_add(height) {
            for col in x..x.saturating_add(width) {
                if let Some(id) = self.occupant(GridCell::new(col, row))
                    && exclude != Some(id)
                    && !found.iter().any(|f| f == id)
                {
                    found.push(id.to_string());
                }
            }
        }
        found
    }

    /// Marks every cell of a widget as occupied by it.
    pub fn place(&mut self, position: &WidgetPosition) {
        self.ensure_rows(position.bottom());
        for cell in position.cells() {
            if let Some(slot) = self.slot_mut(cell) {
                *slot = Some(position.id.clone());
            }
        }
    }

    /// Clears the cells of a widget that are still attributed to it.
    pub fn clear(&mut self, position: &WidgetPosition) {
        for cell in position.cells() {
            if let Some(slot) = self.slot_mut(cell)
                && slot.as_deref() == Some(position.id.as_str())
            {
                *slot = None;
            }
        }
    }

    fn slot_mut(&mut self, cell: GridCell) -> Option<&mut Option<WidgetId>> {
        self.rows.get_mut(cell.y as usize).and_then(|row| row.get_mut(cell.x as usize))
    }

    fn ensure_rows(&mut self, rows: u32) {
        let rows = rows as usize;
        if self.rows.len() < rows {
            self.rows.resize_with(rows, Default::default);
        }
    }
}

// ============================================================================
// Structural Hash
// ============================================================================

/// Computes a structural hash of a position list.
///
/// The hash includes every input that affects occupancy:
/// - Widget ids (and their order)
/// - Anchor cells
/// - Sizes
#[must_use]
pub fn compute_layout_hash(positions: &[WidgetPosition]) -> u64 {
    let mut hasher = DefaultHasher::new();

    positions.len().hash(&mut hasher);
    for position in positions {
        position.id.hash(&mut hasher);
        position.grid_x.hash(&mut hasher);
        position.grid_y.hash(&mut hasher);
        position.size.hash(&mut hasher);
    }

    hasher.finish()
}

// ============================================================================
// Occupancy Cache
// ============================================================================

/// Memoized occupancy keyed by the structural hash of the layout.
#[derive(Debug, Default)]
pub struct OccupancyCache {
    /// Hash of the layout the cached matrix was built from.
    input_hash: Option<u64>,
    /// Cached matrix.
    occupancy: Arc<GridOccupancy>,
    /// Number of rebuilds, for diagnostics.
    rebuilds: u64,
}

impl OccupancyCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Checks if the cache is valid for the given input hash.
    #[must_use]
    pub fn is_valid(&self, input_hash: u64) -> bool { self.input_hash == Some(input_hash) }

    /// Returns the occupancy for `positions`, rebuilding it if the key changed.
    pub fn get_or_compute(&mut self, positions: &[WidgetPosition]) -> Arc<GridOccupancy> {
        let input_hash = compute_layout_hash(positions);
        if !self.is_valid(input_hash) {
            tracing::trace!(hash = input_hash, "grid: rebuilding occupancy matrix");
            self.occupancy = Arc::new(GridOccupancy::from_positions(positions));
            self.input_hash = Some(input_hash);
            self.rebuilds += 1;
        }
        Arc::clone(&self.occupancy)
    }

    /// Number of times the matrix has been rebuilt.
    #[must_use]
    pub const fn rebuilds(&self) -> u64 { self.rebuilds }

    /// Invalidates the cache.
    pub fn invalidate(&mut self) { self.input_hash = None; }
}
