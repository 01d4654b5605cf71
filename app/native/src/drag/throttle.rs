//! Throttling for live drag previews.
//!
//! During a drag the gesture runtime samples the pointer far more often than
//! the rearrangement engine can usefully run. A live preview is dispatched only
//! when the candidate cell changed since the last dispatch **and** the minimum
//! interval has passed. The final commit never goes through the throttle.
//!
//! Timestamps are passed in rather than read from the clock, so the gesture
//! runtime's own sample times drive the decision.

use std::time::{Duration, Instant};

use crate::grid::GridCell;

/// Gate for the live preview channel of one drag.
#[derive(Debug, Clone)]
pub struct LiveThrottle {
    /// Minimum time between two dispatches.
    interval: Duration,
    /// Last dispatched candidate and when it was dispatched.
    last: Option<(GridCell, Instant)>,
}

impl LiveThrottle {
    /// Creates a throttle with the given minimum interval.
    #[must_use]
    pub const fn new(interval: Duration) -> Self { Self { interval, last: None } }

    #[must_use]
    pub const fn interval(&self) -> Duration { self.interval }

    /// Forgets the last dispatch. Called at drag start.
    pub const fn reset(&mut self) { self.last = None; }

    /// Checks whether a candidate should be dispatched at `now`.
    ///
    /// Returns `true` and records the dispatch when the candidate differs from
    /// the last dispatched one and at least the interval has elapsed since it.
    /// The first candidate after a reset is dispatched only if it differs from
    /// `origin`, the cell the drag started at.
    pub fn should_dispatch(&mut self, candidate: GridCell, origin: GridCell, now: Instant) -> bool {
        let allowed = match self.last {
            None => candidate != origin,
            Some((last_cell, last_at)) => {
                candidate != last_cell && now.saturating_duration_since(last_at) >= self.interval
            }
        };

        if allowed {
            self.last = Some((candidate, now));
        } else {
            tracing::trace!("drag: throttled live candidate {candidate}");
        }
        allowed
    }

    /// The last dispatched candidate.
    #[must_use]
    pub fn last_dispatched(&self) -> Option<GridCell> { self.last.map(|(cell, _)| cell) }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INTERVAL: Duration = Duration::from_millis(100);

    #[test]
    fn test_origin_is_not_dispatched() {
        let mut throttle = LiveThrottle::new(INTERVAL);
        let now = Instant::now();
        assert!(!throttle.should_dispatch(GridCell::new(0, 1), GridCell::new(0, 1), now));
        assert!(throttle.should_dispatch(GridCell::new(1, 1), GridCell::new(0, 1), now));
    }

    #[test]
    fn test_requires_interval_and_change() {
        let mut throttle = LiveThrottle::new(INTERVAL);
        let origin = GridCell::new(0, 0);
        let start = Instant::now();

        assert!(throttle.should_dispatch(GridCell::new(1, 0), origin, start));
        // Changed, but too soon.
        assert!(!throttle.should_dispatch(GridCell::new(1, 1), origin, start + Duration::from_millis(50)));
        // Late enough, but unchanged.
        assert!(!throttle.should_dispatch(GridCell::new(1, 0), origin, start + Duration::from_millis(150)));
        // Both conditions hold.
        assert!(throttle.should_dispatch(GridCell::new(1, 1), origin, start + Duration::from_millis(150)));
        assert_eq!(throttle.last_dispatched(), Some(GridCell::new(1, 1)));
    }

    #[test]
    fn test_reset_forgets_last_dispatch() {
        let mut throttle = LiveThrottle::new(INTERVAL);
        let now = Instant::now();
        assert!(throttle.should_dispatch(GridCell::new(1, 0), GridCell::new(0, 0), now));
        throttle.reset();
        assert_eq!(throttle.last_dispatched(), None);
        assert!(throttle.should_dispatch(GridCell::new(1, 1), GridCell::new(0, 0), now));
    }
}
