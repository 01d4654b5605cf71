//! Resize handler: change a widget's size and move it into free space.
//!
//! Resizing never displaces other widgets. The widget is excluded from the
//! occupancy and the placement algorithm picks the nearest rectangle that is
//! already free for the new span, preferring the widget's current row. When
//! the widget still fits at its own anchor on that row, it generally stays put
//! (the row is scanned left to right, so a free column 0 wins over column 1).

use std::borrow::Cow;

use super::occupancy::GridOccupancy;
use super::placement::find_free_position_in;
use super::types::{WidgetPosition, WidgetSize};

/// Resizes `id` to `new_size` and relocates it into a free rectangle.
///
/// Unknown ids and resizes to the current size return the input unchanged.
#[must_use]
pub fn resize<'a>(id: &str, new_size: WidgetSize, positions: &'a [WidgetPosition]) -> Cow<'a, [WidgetPosition]> {
    let occupancy = GridOccupancy::from_positions(positions);
    resize_with(&occupancy, id, new_size, positions)
}

/// Same as [`resize`], using a precomputed occupancy for `positions`.
#[must_use]
pub fn resize_with<'a>(
    occupancy: &GridOccupancy,
    id: &str,
    new_size: WidgetSize,
    positions: &'a [WidgetPosition],
) -> Cow<'a, [WidgetPosition]> {
    let Some(idx) = positions.iter().position(|p| p.id == id) else {
        tracing::debug!("grid: resize ignored, widget '{id}' not found");
        return Cow::Borrowed(positions);
    };

    let current = &positions[idx];
    if current.size == new_size {
        return Cow::Borrowed(positions);
    }

    let span = new_size.span();
    let anchor = find_free_position_in(occupancy, span.width, span.height, current.grid_y, Some(id));

    tracing::debug!(
        "grid: resized '{id}' {} -> {new_size}, anchor {} -> {anchor}",
        current.size,
        current.anchor()
    );

    let mut resized = positions.to_vec();
    resized[idx].set_size(new_size);
    resized[idx].move_to(anchor);
    Cow::Owned(resized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::types::{GridCell, find_position, validate_layout};

    fn default_layout() -> Vec<WidgetPosition> {
        vec![
            WidgetPosition::new("weather", 0, 0, WidgetSize::Medium),
            WidgetPosition::new("steps", 0, 1, WidgetSize::Small),
            WidgetPosition::new("water", 1, 1, WidgetSize::Small),
            WidgetPosition::new("sleep", 0, 2, WidgetSize::Small),
            WidgetPosition::new("mood", 1, 2, WidgetSize::Small),
            WidgetPosition::new("focus", 0, 3, WidgetSize::Small),
            WidgetPosition::new("tasks", 1, 3, WidgetSize::Small),
        ]
    }

    #[test]
    fn test_resize_small_to_large_relocates_without_moving_others() {
        let positions = default_layout();
        let result = resize("tasks", WidgetSize::Large, &positions);

        let tasks = find_position(&result, "tasks").unwrap();
        assert_eq!(tasks.anchor(), GridCell::new(0, 4));
        assert_eq!((tasks.width, tasks.height), (2, 2));

        for original in positions.iter().filter(|p| p.id != "tasks") {
            assert_eq!(find_position(&result, &original.id), Some(original));
        }
        validate_layout(&result).unwrap();
    }

    #[test]
    fn test_resize_shrink_stays_on_row() {
        let positions = default_layout();
        let result = resize("weather", WidgetSize::Small, &positions);
        let weather = find_position(&result, "weather").unwrap();
        assert_eq!(weather.anchor(), GridCell::new(0, 0));
        assert_eq!(weather.size, WidgetSize::Small);
    }

    #[test]
    fn test_resize_same_size_is_borrowed() {
        let positions = default_layout();
        assert!(matches!(resize("steps", WidgetSize::Small, &positions), Cow::Borrowed(_)));
    }

    #[test]
    fn test_resize_unknown_is_noop() {
        let positions = default_layout();
        assert!(matches!(resize("ghost", WidgetSize::Large, &positions), Cow::Borrowed(_)));
    }

    #[test]
    fn test_resize_into_own_row_when_neighbour_free() {
        let mut positions = default_layout();
        positions.retain(|p| p.id != "water");
        let result = resize("steps", WidgetSize::Medium, &positions);
        assert_eq!(find_position(&result, "steps").unwrap().anchor(), GridCell::new(0, 1));
        validate_layout(&result).unwrap();
    }
}
