//! Rearrangement engine: move one widget and relocate everything it lands on.
//!
//! # Algorithm
//!
//! 1. Clamp the requested anchor into the dragged widget's valid range.
//! 2. If the clamped anchor equals the current one, return the input unchanged
//!    (borrowed), so render loops can detect "nothing happened" by pointer.
//! 3. Move the dragged widget and collect every widget whose rectangle shares a
//!    cell with its new footprint.
//! 4. For each conflicting widget, in the order found, try the preferred slots
//!    beside the new footprint: right, left, below, above. The first slot that
//!    is in bounds and free in the working occupancy wins.
//! 5. Otherwise fall back to the placement algorithm.
//! 6. Each resolution updates the working occupancy before the next conflict is
//!    evaluated, so no cell is ever double-booked.

use std::borrow::Cow;

use smallvec::SmallVec;

use super::occupancy::GridOccupancy;
use super::placement::find_free_position_in;
use super::types::{COLUMN_COUNT, GridCell, MAX_ROWS, WidgetId, WidgetPosition, layout_bottom};

/// Which side of the dragged footprint a displaced widget was moved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Displacement {
    Right,
    Left,
    Below,
    Above,
    /// No adjacent slot was free; the placement algorithm chose the slot.
    Nearest,
}

/// A widget relocated as a side effect of a move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relocation {
    pub id: WidgetId,
    pub from: GridCell,
    pub to: GridCell,
    pub via: Displacement,
}

/// Result of a rearrangement with its side effects spelled out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RearrangeOutcome<'a> {
    /// The new layout (borrowed when nothing changed).
    pub positions: Cow<'a, [WidgetPosition]>,
    /// Where the dragged widget ended up.
    pub target: GridCell,
    /// Widgets moved out of the way, in resolution order.
    pub relocations: Vec<Relocation>,
}

/// Clamps a requested anchor into the valid range for a widget.
///
/// Columns are limited so the span fits in `COLUMN_COUNT`. Rows are limited to
/// the first row below every other widget, so a drag can extend the grid by at
/// most one placement, and never past [`MAX_ROWS`].
#[must_use]
pub fn clamp_target(
    dragged: &WidgetPosition,
    requested_x: i64,
    requested_y: i64,
    positions: &[WidgetPosition],
) -> GridCell {
    let max_x = COLUMN_COUNT.saturating_sub(dragged.width);
    let max_y = layout_bottom(positions.iter().filter(|p| p.id != dragged.id))
        .min(MAX_ROWS.saturating_sub(dragged.height));

    let x = u32::try_from(requested_x.clamp(0, i64::from(max_x))).unwrap_or(0);
    let y = u32::try_from(requested_y.clamp(0, i64::from(max_y))).unwrap_or(0);
    GridCell::new(x, y)
}

/// Moves `dragged_id` to the requested cell and resolves every overlap.
///
/// Unknown ids and moves to the current anchor return the input unchanged.
#[must_use]
pub fn rearrange<'a>(
    dragged_id: &str,
    requested_x: i64,
    requested_y: i64,
    positions: &'a [WidgetPosition],
) -> Cow<'a, [WidgetPosition]> {
    rearrange_detailed(dragged_id, requested_x, requested_y, positions).positions
}

/// Like [`rearrange`], also reporting the final target and every relocation.
#[must_use]
pub fn rearrange_detailed<'a>(
    dragged_id: &str,
    requested_x: i64,
    requested_y: i64,
    positions: &'a [WidgetPosition],
) -> RearrangeOutcome<'a> {
    let occupancy = GridOccupancy::from_positions(positions);
    rearrange_with(&occupancy, dragged_id, requested_x, requested_y, positions)
}

/// Same as [`rearrange_detailed`], starting from a precomputed occupancy for
/// `positions`. The matrix is copied, never modified.
#[must_use]
pub fn rearrange_with<'a>(
    occupancy: &GridOccupancy,
    dragged_id: &str,
    requested_x: i64,
    requested_y: i64,
    positions: &'a [WidgetPosition],
) -> RearrangeOutcome<'a> {
    let Some(dragged_idx) = positions.iter().position(|p| p.id == dragged_id) else {
        tracing::debug!("grid: rearrange ignored, widget '{dragged_id}' not found");
        return RearrangeOutcome {
            positions: Cow::Borrowed(positions),
            target: GridCell::default(),
            relocations: Vec::new(),
        };
    };

    let dragged = &positions[dragged_idx];
    let target = clamp_target(dragged, requested_x, requested_y, positions);
    if target == dragged.anchor() {
        return RearrangeOutcome {
            positions: Cow::Borrowed(positions),
            target,
            relocations: Vec::new(),
        };
    }

    let mut working = positions.to_vec();
    let mut occupancy = occupancy.clone();
    occupancy.clear(&working[dragged_idx]);
    working[dragged_idx].move_to(target);
    let footprint = working[dragged_idx].clone();

    let conflicts: SmallVec<[usize; 4]> = working
        .iter()
        .enumerate()
        .filter(|(idx, p)| *idx != dragged_idx && p.intersects(&footprint))
        .map(|(idx, _)| idx)
        .collect();

    // The footprint overwrites the cells of every conflict it covers.
    occupancy.place(&footprint);

    let mut relocations = Vec::with_capacity(conflicts.len());
    for idx in conflicts {
        let conflict = working[idx].clone();
        let (to, via) = resolve_conflict(&conflict, &footprint, &occupancy);

        occupancy.clear(&conflict);
        working[idx].move_to(to);
        occupancy.place(&working[idx]);

        tracing::trace!(
            "grid: displaced '{}' from {} to {to} ({via:?})",
            conflict.id,
            conflict.anchor()
        );
        relocations.push(Relocation {
            from: conflict.anchor(),
            id: conflict.id,
            to,
            via,
        });
    }

    RearrangeOutcome {
        positions: Cow::Owned(working),
        target,
        relocations,
    }
}

/// Picks a new anchor for a widget covered by the dragged footprint.
fn resolve_conflict(
    conflict: &WidgetPosition,
    footprint: &WidgetPosition,
    occupancy: &GridOccupancy,
) -> (GridCell, Displacement) {
    let exclude = Some(conflict.id.as_str());

    for (candidate, via) in preferred_candidates(conflict, footprint) {
        if occupancy.is_rect_free(candidate.x, candidate.y, conflict.width, conflict.height, exclude)
        {
            return (candidate, via);
        }
    }

    let cell = find_free_position_in(
        occupancy,
        conflict.width,
        conflict.height,
        conflict.grid_y,
        exclude,
    );
    (cell, Displacement::Nearest)
}

/// Candidate anchors beside the dragged footprint, in preference order.
///
/// Horizontal candidates share the footprint's top row; vertical candidates
/// keep the conflicting widget's own column (clamped into range). Candidates
/// that would start left of column 0 or above row 0 are skipped.
fn preferred_candidates(
    conflict: &WidgetPosition,
    footprint: &WidgetPosition,
) -> SmallVec<[(GridCell, Displacement); 4]> {
    let mut candidates = SmallVec::new();
    let column = conflict.grid_x.min(COLUMN_COUNT.saturating_sub(conflict.width));

    if footprint.right() + conflict.width <= COLUMN_COUNT {
        candidates.push((GridCell::new(footprint.right(), footprint.grid_y), Displacement::Right));
    }
    if let Some(x) = footprint.grid_x.checked_sub(conflict.width) {
        candidates.push((GridCell::new(x, footprint.grid_y), Displacement::Left));
    }
    candidates.push((GridCell::new(column, footprint.bottom()), Displacement::Below));
    if let Some(y) = footprint.grid_y.checked_sub(conflict.height) {
        candidates.push((GridCell::new(column, y), Displacement::Above));
    }

    candidates
}
