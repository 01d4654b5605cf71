//! Placement algorithm: nearest free rectangle for a requested span.
//!
//! # Search Order
//!
//! The search starts at a preferred row (the excluded widget's current row, or
//! row 0) and expands in rings. Ring `r` visits the row at offset `-r`, then
//! the row at offset `+r`; each row is scanned left to right. Offsets that
//! would land on a negative row are skipped. The first rectangle whose cells
//! are all free wins.
//!
//! The search region always includes the first empty row below the layout, so a
//! result is guaranteed; the explicit bottom-row fallback only exists to keep
//! the function total.

use super::occupancy::GridOccupancy;
use super::types::{COLUMN_COUNT, GridCell, WidgetPosition, find_position};

/// Finds the closest free rectangle of `width` × `height` cells.
///
/// `exclude` names a widget whose cells count as free (the widget being
/// relocated); its current row is also the preferred row.
///
/// This function is total: it always returns an in-bounds, non-overlapping anchor.
#[must_use]
pub fn find_free_position(
    width: u32,
    height: u32,
    positions: &[WidgetPosition],
    exclude: Option<&str>,
) -> GridCell {
    let occupancy = GridOccupancy::from_positions(positions);
    let preferred_row = exclude
        .and_then(|id| find_position(positions, id))
        .map_or(0, |position| position.grid_y);

    find_free_position_in(&occupancy, width, height, preferred_row, exclude)
}

/// Same as [`find_free_position`], over a precomputed occupancy matrix.
#[must_use]
pub fn find_free_position_in(
    occupancy: &GridOccupancy,
    width: u32,
    height: u32,
    preferred_row: u32,
    exclude: Option<&str>,
) -> GridCell {
    let width = width.clamp(1, COLUMN_COUNT);
    let height = height.max(1);
    let max_x = COLUMN_COUNT - width;

    // Everything at or below `limit` is empty, so a ring reaching it always succeeds.
    let limit = occupancy.rows();
    let max_radius = limit.max(preferred_row).saturating_add(1);

    for radius in 0..=max_radius {
        // Ring `r` adds the rows at offsets -r and +r; inner rows were scanned already.
        let above = preferred_row.checked_sub(radius);
        let below = if radius > 0 { preferred_row.checked_add(radius) } else { None };

        for row in above.into_iter().chain(below) {
            for x in 0..=max_x {
                if occupancy.is_rect_free(x, row, width, height, exclude) {
                    return GridCell::new(x, row);
                }
            }
        }
    }

    tracing::warn!(width, height, "grid: no free rectangle found, appending a bottom row");
    GridCell::new(0, limit)
}
