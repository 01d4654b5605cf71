//! Drag controller: turns gesture samples into live previews and one commit.
//!
//! The controller runs on the gesture side and talks to the layout actor only
//! through its handle:
//! - `update` converts a pixel translation into a candidate cell and offers a
//!   live preview when the throttle allows it (never waits)
//! - `commit` delivers the final request on the command channel, waiting for
//!   capacity if necessary, so every completed drag commits exactly once, and
//!   reports the anchor the store actually applied
//! - `cancel` drops the session without touching the committed layout

use std::time::Instant;

use super::state::{CommitRequest, DragPhase, DragSession, DragVisual, EditVisual};
use super::throttle::LiveThrottle;
use crate::config::DragConfig;
use crate::grid::{GridCell, GridMetrics, LayoutSnapshot, Point, find_position};
use crate::store::{ActorError, DragId, LayoutHandle, LayoutMessage, LiveDispatch, LiveRearrange};

/// Errors from drag state transitions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DragError {
    /// A gesture is already in progress.
    #[error("cannot start a drag while {0}")]
    NotIdle(&'static str),

    /// No drag is active.
    #[error("no active drag (phase is {0})")]
    NotDragging(&'static str),

    /// No released drag is waiting to commit.
    #[error("no pending commit (phase is {0})")]
    NotCommitting(&'static str),

    /// The widget is not in the layout snapshot.
    #[error("widget '{0}' not found")]
    UnknownWidget(String),

    /// The store did not accept the drag (edit mode off, or the widget
    /// already had an active drag).
    #[error("drag on '{0}' was rejected by the layout store")]
    Rejected(String),

    /// The layout actor could not be reached.
    #[error("layout actor unavailable: {0}")]
    ActorUnavailable(#[from] ActorError),
}

/// Stateful adapter between a gesture and the layout actor.
#[derive(Debug)]
pub struct DragController {
    handle: LayoutHandle,
    metrics: GridMetrics,
    throttle: LiveThrottle,
    drag_scale: f64,
    edit_scale: f64,
    phase: DragPhase,
}

impl DragController {
    #[must_use]
    pub fn new(handle: LayoutHandle, metrics: GridMetrics, config: &DragConfig) -> Self {
        Self {
            handle,
            metrics,
            throttle: LiveThrottle::new(config.live_interval()),
            drag_scale: config.drag_scale,
            edit_scale: config.edit_scale,
            phase: DragPhase::Idle,
        }
    }

    /// Current phase of the state machine.
    #[must_use]
    pub const fn phase(&self) -> &DragPhase { &self.phase }

    /// Starts a drag on `widget_id`, using `snapshot` as the reference frame.
    ///
    /// A cancelled gesture is settled implicitly. The store's verdict on the
    /// drag arrives with the commit; see [`Self::commit`].
    ///
    /// # Errors
    ///
    /// Returns [`DragError::NotIdle`] while another gesture is dragging or
    /// committing, [`DragError::UnknownWidget`] if the widget is not in the
    /// snapshot, and [`DragError::ActorUnavailable`] if the actor cannot be reached.
    pub fn begin(
        &mut self,
        widget_id: &str,
        snapshot: LayoutSnapshot,
        now: Instant,
    ) -> Result<DragId, DragError> {
        if matches!(self.phase, DragPhase::Dragging(_) | DragPhase::Committing(_)) {
            return Err(DragError::NotIdle(self.phase.name()));
        }

        let Some(position) = find_position(&snapshot, widget_id) else {
            return Err(DragError::UnknownWidget(widget_id.to_string()));
        };
        let (size, origin) = (position.size, position.anchor());

        let drag_id = DragId::now_v7();
        self.handle.send(LayoutMessage::BeginDrag {
            drag_id,
            widget_id: widget_id.to_string(),
            respond_to: None,
        })?;

        tracing::debug!("drag: {drag_id} started on '{widget_id}' at {origin}");
        self.throttle.reset();
        self.phase = DragPhase::Dragging(DragSession {
            drag_id,
            widget_id: widget_id.to_string(),
            size,
            origin,
            snapshot,
            translation: Point::default(),
            candidate: origin,
            started_at: now,
        });
        Ok(drag_id)
    }

    /// Records a gesture sample. Returns the candidate if a live preview was sent.
    ///
    /// # Errors
    ///
    /// Returns [`DragError::NotDragging`] outside a drag and
    /// [`DragError::ActorUnavailable`] if the actor has stopped.
    pub fn update(&mut self, translation: Point, now: Instant) -> Result<Option<GridCell>, DragError> {
        let session = match &mut self.phase {
            DragPhase::Dragging(session) => session,
            other => return Err(DragError::NotDragging(other.name())),
        };

        let candidate = self.metrics.drag_target_cell(
            session.origin,
            session.size,
            translation,
            &session.snapshot,
        );
        session.translation = translation;
        session.candidate = candidate;

        if !self.throttle.should_dispatch(candidate, session.origin, now) {
            return Ok(None);
        }

        let live = LiveRearrange {
            drag_id: session.drag_id,
            widget_id: session.widget_id.clone(),
            target: candidate,
        };
        match self.handle.send_live(live)? {
            LiveDispatch::Sent => Ok(Some(candidate)),
            LiveDispatch::Dropped => Ok(None),
        }
    }

    /// Ends the gesture and prepares the commit for the final candidate.
    ///
    /// # Errors
    ///
    /// Returns [`DragError::NotDragging`] outside a drag.
    pub fn release(&mut self, translation: Point, now: Instant) -> Result<CommitRequest, DragError> {
        let session = match &self.phase {
            DragPhase::Dragging(session) => session,
            other => return Err(DragError::NotDragging(other.name())),
        };

        let target = self.metrics.drag_target_cell(
            session.origin,
            session.size,
            translation,
            &session.snapshot,
        );
        let request = CommitRequest {
            drag_id: session.drag_id,
            widget_id: session.widget_id.clone(),
            origin: session.origin,
            target,
        };

        tracing::debug!(
            "drag: {} released '{}' at {target} after {:?}",
            request.drag_id,
            request.widget_id,
            now.saturating_duration_since(session.started_at)
        );
        self.phase = DragPhase::Committing(request.clone());
        Ok(request)
    }

    /// Delivers the pending commit to the layout actor.
    ///
    /// The commit bypasses the throttle and waits for channel capacity. Returns
    /// the anchor the store applied, which may differ from the released
    /// candidate when the store clamps it. The controller returns to idle
    /// whatever the outcome.
    ///
    /// # Errors
    ///
    /// Returns [`DragError::NotCommitting`] without a released drag,
    /// [`DragError::Rejected`] if the store never accepted the drag, and
    /// [`DragError::ActorUnavailable`] if the actor has stopped.
    pub async fn commit(&mut self) -> Result<GridCell, DragError> {
        let request = match std::mem::take(&mut self.phase) {
            DragPhase::Committing(request) => request,
            other => {
                let err = DragError::NotCommitting(other.name());
                self.phase = other;
                return Err(err);
            }
        };

        match self.handle.commit_drag(request.drag_id, &request.widget_id, request.target).await? {
            Some(anchor) => {
                if anchor != request.target {
                    tracing::debug!(
                        "drag: '{}' released at {} was placed at {anchor}",
                        request.widget_id,
                        request.target
                    );
                }
                Ok(anchor)
            }
            None => {
                tracing::debug!("drag: commit of '{}' rejected by the store", request.widget_id);
                Err(DragError::Rejected(request.widget_id))
            }
        }
    }

    /// Releases and commits in one step.
    ///
    /// # Errors
    ///
    /// See [`Self::release`] and [`Self::commit`].
    pub async fn end(&mut self, translation: Point, now: Instant) -> Result<GridCell, DragError> {
        self.release(translation, now)?;
        self.commit().await
    }

    /// Interrupts the gesture. The committed layout is never touched.
    ///
    /// # Errors
    ///
    /// Returns [`DragError::NotDragging`] outside a drag. A released drag
    /// cannot be cancelled: its commit is already owed.
    pub fn cancel(&mut self) -> Result<(), DragError> {
        let session = match std::mem::take(&mut self.phase) {
            DragPhase::Dragging(session) => session,
            other => {
                let err = DragError::NotDragging(other.name());
                self.phase = other;
                return Err(err);
            }
        };

        if let Err(err) = self.handle.send(LayoutMessage::CancelDrag { drag_id: session.drag_id }) {
            tracing::warn!("drag: failed to notify cancel of {}: {err}", session.drag_id);
        }

        tracing::debug!("drag: {} on '{}' cancelled", session.drag_id, session.widget_id);
        self.phase = DragPhase::Cancelled(session);
        Ok(())
    }

    /// Returns a cancelled controller to idle.
    pub fn settle(&mut self) {
        if matches!(self.phase, DragPhase::Cancelled(_)) {
            self.phase = DragPhase::Idle;
        }
    }

    /// Presentation state for the dragged widget.
    #[must_use]
    pub fn visual(&self) -> DragVisual {
        match &self.phase {
            DragPhase::Dragging(session) => DragVisual { offset: session.translation, scale: self.drag_scale },
            DragPhase::Idle | DragPhase::Committing(_) | DragPhase::Cancelled(_) => DragVisual::REST,
        }
    }

    /// Presentation scale for every widget, from the store's current edit mode.
    ///
    /// # Errors
    ///
    /// Returns [`DragError::ActorUnavailable`] if the actor cannot be reached.
    pub async fn edit_visual(&self) -> Result<EditVisual, DragError> {
        let editing = self.handle.edit_mode().await?;
        Ok(EditVisual::for_mode(editing, self.edit_scale))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::grid::{WidgetRegistry, default_catalog, default_layout};
    use crate::store::{HostEvent, LayoutActor, LayoutStore, RecordingHost};

    async fn setup() -> (LayoutHandle, Arc<RecordingHost>, DragController) {
        let host = Arc::new(RecordingHost::new());
        let store = LayoutStore::new(WidgetRegistry::new(default_catalog()), default_layout());
        let handle = LayoutActor::spawn(store, host.clone());
        handle.set_edit_mode(true).unwrap();

        let controller = DragController::new(handle.clone(), GridMetrics::default(), &DragConfig::default());
        (handle, host, controller)
    }

    #[tokio::test]
    async fn test_drag_commits_swap() {
        let (handle, host, mut controller) = setup().await;
        let start = Instant::now();
        let snapshot = handle.layout().await.unwrap();

        controller.begin("steps", snapshot, start).unwrap();
        assert!(matches!(controller.phase(), DragPhase::Dragging(_)));

        let target = controller.end(Point::new(172.0, 0.0), start + Duration::from_millis(300)).await.unwrap();
        assert_eq!(target, GridCell::new(1, 1));
        assert!(controller.phase().is_idle());

        let layout = handle.layout().await.unwrap();
        assert_eq!(find_position(&layout, "steps").unwrap().anchor(), GridCell::new(1, 1));
        assert_eq!(find_position(&layout, "water").unwrap().anchor(), GridCell::new(0, 1));
        assert_eq!(host.events(), vec![HostEvent::PositionChange { id: "steps".into(), grid_x: 1, grid_y: 1 }]);
    }

    #[tokio::test]
    async fn test_live_previews_are_throttled_but_commit_is_not() {
        let (handle, host, mut controller) = setup().await;
        let start = Instant::now();
        controller.begin("steps", handle.layout().await.unwrap(), start).unwrap();

        // First change dispatches.
        assert_eq!(
            controller.update(Point::new(172.0, 0.0), start + Duration::from_millis(10)).unwrap(),
            Some(GridCell::new(1, 1))
        );
        // A different cell 40ms later is throttled.
        assert_eq!(controller.update(Point::new(0.0, 172.0), start + Duration::from_millis(50)).unwrap(), None);

        // Release immediately after: the commit still fires.
        controller.end(Point::new(0.0, 172.0), start + Duration::from_millis(60)).await.unwrap();

        let layout = handle.layout().await.unwrap();
        assert_eq!(find_position(&layout, "steps").unwrap().anchor(), GridCell::new(0, 2));

        // Whether or not the early preview was applied, the commit is the last word.
        let events = host.events();
        assert_eq!(events.last(), Some(&HostEvent::PositionChange { id: "steps".into(), grid_x: 0, grid_y: 2 }));
        assert_eq!(handle.preview().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_cancel_leaves_layout_untouched() {
        let (handle, host, mut controller) = setup().await;
        let start = Instant::now();
        let before = handle.layout().await.unwrap();

        controller.begin("steps", Arc::clone(&before), start).unwrap();
        controller.update(Point::new(172.0, 0.0), start + Duration::from_millis(10)).unwrap();
        assert!((controller.visual().scale - DragConfig::default().drag_scale).abs() < f64::EPSILON);

        controller.cancel().unwrap();
        assert!(matches!(controller.phase(), DragPhase::Cancelled(_)));
        assert_eq!(controller.visual(), DragVisual::REST);

        assert_eq!(handle.layout().await.unwrap(), before);
        assert!(handle.active_drags().await.unwrap().is_empty());
        assert!(!host.events().iter().any(|e| matches!(e, HostEvent::PositionChange { .. })));

        controller.settle();
        assert!(controller.phase().is_idle());
    }

    #[tokio::test]
    async fn test_transitions_are_checked() {
        let (handle, _host, mut controller) = setup().await;
        let now = Instant::now();

        assert!(matches!(controller.update(Point::default(), now), Err(DragError::NotDragging("Idle"))));
        assert!(matches!(controller.commit().await, Err(DragError::NotCommitting("Idle"))));
        assert!(matches!(
            controller.begin("ghost", handle.layout().await.unwrap(), now),
            Err(DragError::UnknownWidget(_))
        ));

        controller.begin("steps", handle.layout().await.unwrap(), now).unwrap();
        assert!(matches!(
            controller.begin("water", handle.layout().await.unwrap(), now),
            Err(DragError::NotIdle("Dragging"))
        ));

        controller.release(Point::default(), now).unwrap();
        assert!(matches!(controller.cancel(), Err(DragError::NotDragging("Committing"))));
        assert!(matches!(controller.phase(), DragPhase::Committing(_)));
        controller.commit().await.unwrap();
    }

    #[tokio::test]
    async fn test_second_drag_on_same_widget_is_rejected_by_store() {
        let (handle, _host, mut first) = setup().await;
        let mut second = DragController::new(handle.clone(), GridMetrics::default(), &DragConfig::default());
        let now = Instant::now();
        let snapshot = handle.layout().await.unwrap();

        let first_id = first.begin("steps", Arc::clone(&snapshot), now).unwrap();
        second.begin("steps", snapshot, now).unwrap();

        let drags = handle.active_drags().await.unwrap();
        assert_eq!(drags, vec![("steps".to_string(), first_id)]);

        // The rejected drag's commit is refused; the accepted one applies.
        assert_eq!(second.end(Point::new(0.0, 172.0), now).await, Err(DragError::Rejected("steps".into())));
        assert!(second.phase().is_idle());
        assert_eq!(first.end(Point::new(172.0, 0.0), now).await, Ok(GridCell::new(1, 1)));
        let layout = handle.layout().await.unwrap();
        assert_eq!(find_position(&layout, "steps").unwrap().anchor(), GridCell::new(1, 1));
    }

    #[tokio::test]
    async fn test_commit_reports_row_clamped_by_store() {
        let (handle, host, mut controller) = setup().await;
        let now = Instant::now();
        controller.begin("steps", handle.layout().await.unwrap(), now).unwrap();

        // Twenty rows down; the store stops the widget just below the layout.
        let committed = controller.end(Point::new(0.0, 172.0 * 20.0), now).await.unwrap();
        assert_eq!(committed, GridCell::new(0, 4));

        let layout = handle.layout().await.unwrap();
        assert_eq!(find_position(&layout, "steps").unwrap().anchor(), committed);
        assert_eq!(host.events().last(), Some(&HostEvent::PositionChange { id: "steps".into(), grid_x: 0, grid_y: 4 }));
    }

    #[tokio::test]
    async fn test_edit_visual_follows_store_edit_mode() {
        let (handle, _host, controller) = setup().await;
        let edit_scale = DragConfig::default().edit_scale;

        let visual = controller.edit_visual().await.unwrap();
        assert!((visual.scale - edit_scale).abs() < f64::EPSILON);

        handle.set_edit_mode(false).unwrap();
        assert_eq!(controller.edit_visual().await.unwrap(), EditVisual { scale: 1.0 });
    }
}
