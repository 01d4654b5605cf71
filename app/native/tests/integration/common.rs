//! Shared helpers for integration tests.

use std::collections::BTreeSet;
use std::sync::Arc;

use dashgrid_lib::config::DashgridConfig;
use dashgrid_lib::grid::{
    COLUMN_COUNT, GridMetrics, WidgetPosition, WidgetSize, find_free_position, validate_layout,
};
use dashgrid_lib::store::{LayoutActor, LayoutHandle, RecordingHost};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Seeds used by the randomized tests. Fixed so failures reproduce.
pub const SEEDS: [u64; 8] = [1, 7, 42, 1337, 2024, 9001, 31337, 65535];

/// A deterministic random generator for `seed`.
pub fn rng(seed: u64) -> StdRng { StdRng::seed_from_u64(seed) }

/// A random widget size, weighted towards small.
pub fn random_size(rng: &mut StdRng) -> WidgetSize {
    match rng.random_range(0..6) {
        0 => WidgetSize::Medium,
        1 => WidgetSize::Large,
        _ => WidgetSize::Small,
    }
}

/// Builds a valid layout of `count` widgets by placing random sizes one by one.
pub fn random_layout(rng: &mut StdRng, count: usize) -> Vec<WidgetPosition> {
    let mut positions = Vec::with_capacity(count);
    for idx in 0..count {
        let size = random_size(rng);
        let span = size.span();
        let cell = find_free_position(span.width, span.height, &positions, None);
        positions.push(WidgetPosition::new(&format!("w{idx}"), cell.x, cell.y, size));
    }
    assert_valid(&positions);
    positions
}

/// Asserts that every widget is in bounds and no two widgets overlap.
pub fn assert_valid(positions: &[WidgetPosition]) {
    if let Err(err) = validate_layout(positions) {
        panic!("invalid layout: {err}\n{positions:#?}");
    }
    for pos in positions {
        assert!(pos.grid_x + pos.width <= COLUMN_COUNT, "{} out of bounds", pos.id);
    }
}

/// The set of widget ids in a layout.
pub fn ids(positions: &[WidgetPosition]) -> BTreeSet<String> {
    positions.iter().map(|pos| pos.id.clone()).collect()
}

/// Spawns a layout actor with the default configuration and a recording host.
pub fn spawn_default() -> (LayoutHandle, Arc<RecordingHost>, GridMetrics) {
    let config = DashgridConfig::default();
    let host = Arc::new(RecordingHost::new());
    let handle = LayoutActor::spawn_with_config(&config, host.clone());
    (handle, host, GridMetrics::from_config(&config.grid))
}
