//! Randomized checks of the layout invariants.
//!
//! Every test walks a fixed set of seeds, so a failure names the seed that
//! reproduces it.

use std::borrow::Cow;

use dashgrid_lib::grid::{
    COLUMN_COUNT, GridCell, GridMetrics, GridOccupancy, OccupancyCache, WidgetSize,
    compute_layout_hash, find_free_position, find_position, rearrange, rearrange_with, resize,
};
use rand::Rng;

use crate::common::{SEEDS, assert_valid, ids, random_layout, random_size, rng};

const SIZES: [WidgetSize; 3] = [WidgetSize::Small, WidgetSize::Medium, WidgetSize::Large];

// ============================================================================
// No-overlap and count preservation
// ============================================================================

#[test]
fn test_random_operation_sequences_keep_layout_valid() {
    for seed in SEEDS {
        let mut rng = rng(seed);
        let count = rng.random_range(1..14);
        let mut positions = random_layout(&mut rng, count);
        let original_ids = ids(&positions);

        for step in 0..60 {
            let target = &positions[rng.random_range(0..positions.len())];
            let id = target.id.clone();

            let next = if rng.random_bool(0.7) {
                let bottom = i64::from(positions.iter().map(|p| p.bottom()).max().unwrap_or(0));
                let x = rng.random_range(-1..=i64::from(COLUMN_COUNT));
                let y = rng.random_range(-2..=bottom + 2);
                rearrange(&id, x, y, &positions).into_owned()
            } else {
                resize(&id, SIZES[rng.random_range(0..SIZES.len())], &positions).into_owned()
            };

            assert_valid(&next);
            assert_eq!(next.len(), positions.len(), "seed {seed} step {step}: count changed");
            assert_eq!(ids(&next), original_ids, "seed {seed} step {step}: ids changed");
            positions = next;
        }
    }
}

#[test]
fn test_cached_occupancy_matches_fresh_rearrangement() {
    for seed in SEEDS {
        let mut rng = rng(seed);
        let positions = random_layout(&mut rng, 10);
        let occupancy = GridOccupancy::from_positions(&positions);

        for _ in 0..20 {
            let id = &positions[rng.random_range(0..positions.len())].id;
            let x = rng.random_range(0..i64::from(COLUMN_COUNT));
            let y = rng.random_range(0..8);

            let fresh = rearrange(id, x, y, &positions);
            let cached = rearrange_with(&occupancy, id, x, y, &positions);
            assert_eq!(fresh, cached.positions, "seed {seed}: cached occupancy diverged");
        }
    }
}

// ============================================================================
// Idempotence
// ============================================================================

#[test]
fn test_rearrange_to_current_anchor_is_identity() {
    for seed in SEEDS {
        let mut rng = rng(seed);
        let positions = random_layout(&mut rng, 9);

        for pos in &positions {
            let result = rearrange(&pos.id, i64::from(pos.grid_x), i64::from(pos.grid_y), &positions);
            assert!(matches!(result, Cow::Borrowed(_)), "seed {seed}: {} moved", pos.id);
            assert_eq!(result.as_ref(), positions.as_slice());
        }
    }
}

#[test]
fn test_resize_to_same_size_is_identity() {
    for seed in SEEDS {
        let mut rng = rng(seed);
        let positions = random_layout(&mut rng, 9);
        for pos in &positions {
            assert!(matches!(resize(&pos.id, pos.size, &positions), Cow::Borrowed(_)));
        }
    }
}

// ============================================================================
// Placement totality
// ============================================================================

#[test]
fn test_find_free_position_is_total() {
    for seed in SEEDS {
        let mut rng = rng(seed);
        let count = rng.random_range(0..16);
        let positions = random_layout(&mut rng, count);
        let occupancy = GridOccupancy::from_positions(&positions);

        for size in SIZES {
            let span = size.span();
            let cell = find_free_position(span.width, span.height, &positions, None);
            assert!(cell.x + span.width <= COLUMN_COUNT, "seed {seed}: {size} out of bounds");
            assert!(
                occupancy.is_rect_free(cell.x, cell.y, span.width, span.height, None),
                "seed {seed}: {size} placed on an occupied cell {cell}"
            );
        }
    }
}

#[test]
fn test_placement_is_deterministic() {
    for seed in SEEDS {
        let mut rng = rng(seed);
        let positions = random_layout(&mut rng, 11);
        let size = random_size(&mut rng).span();
        assert_eq!(
            find_free_position(size.width, size.height, &positions, None),
            find_free_position(size.width, size.height, &positions, None)
        );
    }
}

// ============================================================================
// Resize policy
// ============================================================================

#[test]
fn test_resize_never_moves_other_widgets() {
    for seed in SEEDS {
        let mut rng = rng(seed);
        let positions = random_layout(&mut rng, 10);

        for _ in 0..10 {
            let id = positions[rng.random_range(0..positions.len())].id.clone();
            let size = SIZES[rng.random_range(0..SIZES.len())];
            let resized = resize(&id, size, &positions);

            for before in positions.iter().filter(|p| p.id != id) {
                let after = find_position(&resized, &before.id).unwrap();
                assert_eq!(after.anchor(), before.anchor(), "seed {seed}: {} moved", before.id);
            }
            assert_eq!(find_position(&resized, &id).unwrap().size, size);
        }
    }
}

// ============================================================================
// Geometry
// ============================================================================

#[test]
fn test_cell_pixel_round_trip() {
    let metrics = GridMetrics::default();

    for seed in SEEDS {
        let mut rng = rng(seed);
        let positions = random_layout(&mut rng, 12);

        for pos in &positions {
            let pixel = metrics.cell_to_pixel(pos.anchor(), pos.size, &positions);
            assert_eq!(
                metrics.pixel_to_cell(pixel, pos.size, &positions),
                pos.anchor(),
                "seed {seed}: {} did not round trip",
                pos.id
            );
        }
    }
}

#[test]
fn test_widget_rects_do_not_overlap() {
    let metrics = GridMetrics::default();

    for seed in SEEDS {
        let mut rng = rng(seed);
        let positions = random_layout(&mut rng, 10);
        let rects: Vec<_> = positions.iter().map(|p| metrics.widget_rect(p, &positions)).collect();

        for (i, a) in rects.iter().enumerate() {
            for b in &rects[i + 1..] {
                let overlap_x = a.x < b.x + b.width && b.x < a.x + a.width;
                let overlap_y = a.y < b.y + b.height && b.y < a.y + a.height;
                assert!(!(overlap_x && overlap_y), "seed {seed}: pixel frames overlap");
            }
        }
    }
}

// ============================================================================
// Occupancy cache
// ============================================================================

#[test]
fn test_occupancy_cache_tracks_structural_changes() {
    for seed in SEEDS {
        let mut rng = rng(seed);
        let positions = random_layout(&mut rng, 8);
        let mut cache = OccupancyCache::new();

        let first = cache.get_or_compute(&positions);
        let again = cache.get_or_compute(&positions.clone());
        assert!(std::sync::Arc::ptr_eq(&first, &again), "seed {seed}: equal layout rebuilt");
        assert_eq!(cache.rebuilds(), 1);

        let moved = rearrange(&positions[0].id, 1, 0, &positions).into_owned();
        if compute_layout_hash(&moved) != compute_layout_hash(&positions) {
            let rebuilt = cache.get_or_compute(&moved);
            assert_eq!(cache.rebuilds(), 2);
            assert_eq!(*rebuilt, GridOccupancy::from_positions(&moved));
        }
    }
}

#[test]
fn test_drag_target_without_translation_is_origin() {
    let metrics = GridMetrics::default();

    for seed in SEEDS {
        let mut rng = rng(seed);
        let positions = random_layout(&mut rng, 10);
        for pos in &positions {
            let cell = metrics.drag_target_cell(pos.anchor(), pos.size, Default::default(), &positions);
            assert_eq!(cell, pos.anchor(), "seed {seed}: {} snapped away", pos.id);
        }
    }
}

#[test]
fn test_grid_cell_display() {
    assert_eq!(GridCell::new(1, 4).to_string(), "(1, 4)");
}
