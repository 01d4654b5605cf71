//! Handle for communicating with the layout actor.
//!
//! The `LayoutHandle` provides a safe, cloneable interface for sending
//! commands and live previews to the layout actor and querying its state.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};

use super::messages::{
    DragId, LayoutMessage, LayoutPreview, LayoutQuery, LayoutSubscription, LiveRearrange,
    QueryResult,
};
use crate::grid::{GridCell, GridOccupancy, LayoutSnapshot, WidgetPosition, WidgetSize};

/// Error types for actor communication.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActorError {
    /// Failed to send message to actor.
    #[error("Failed to send message to actor: channel closed")]
    SendFailed,

    /// Failed to receive response from actor.
    #[error("Failed to receive response from actor: channel closed")]
    ReceiveFailed,

    /// Query timed out.
    #[error("Query timed out after {0:?}")]
    Timeout(Duration),

    /// The actor answered with a different result kind.
    #[error("Unexpected query result for {0}")]
    UnexpectedResult(&'static str),
}

/// Outcome of offering a live preview to the actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiveDispatch {
    /// Queued on the live channel.
    Sent,
    /// The live channel was full; the preview was dropped.
    Dropped,
}

/// Handle for communicating with the layout actor.
///
/// This handle is cheap to clone and can be shared across threads.
#[derive(Clone, Debug)]
pub struct LayoutHandle {
    sender: mpsc::Sender<LayoutMessage>,
    live: mpsc::Sender<LiveRearrange>,
}

impl LayoutHandle {
    /// Create a new handle with the given senders.
    pub(crate) const fn new(
        sender: mpsc::Sender<LayoutMessage>,
        live: mpsc::Sender<LiveRearrange>,
    ) -> Self {
        Self { sender, live }
    }

    /// Returns whether the actor is still receiving commands.
    #[must_use]
    pub fn is_alive(&self) -> bool { !self.sender.is_closed() }

    // ========================================================================
    // Fire-and-forget sending
    // ========================================================================

    /// Send a command without waiting for delivery.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::SendFailed`] if the channel is closed or full.
    pub fn send(&self, msg: LayoutMessage) -> Result<(), ActorError> {
        self.sender.try_send(msg).map_err(|_| ActorError::SendFailed)
    }

    /// Send a command and wait for delivery.
    ///
    /// This waits if the channel buffer is full, so the message is never dropped
    /// while the actor is alive.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::SendFailed`] if the channel is closed.
    pub async fn send_async(&self, msg: LayoutMessage) -> Result<(), ActorError> {
        self.sender.send(msg).await.map_err(|_| ActorError::SendFailed)
    }

    /// Offer a live preview. Never waits; a full channel drops the preview.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::SendFailed`] if the channel is closed.
    pub fn send_live(&self, preview: LiveRearrange) -> Result<LiveDispatch, ActorError> {
        match self.live.try_send(preview) {
            Ok(()) => Ok(LiveDispatch::Sent),
            Err(mpsc::error::TrySendError::Full(dropped)) => {
                tracing::trace!("store: live channel full, dropping preview for '{}'", dropped.widget_id);
                Ok(LiveDispatch::Dropped)
            }
            Err(mpsc::error::TrySendError::Closed(_)) => Err(ActorError::SendFailed),
        }
    }

    // ========================================================================
    // Query methods
    // ========================================================================

    /// Execute a query and wait for the result.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::SendFailed`] if the channel is closed, or
    /// [`ActorError::ReceiveFailed`] if the response channel is closed.
    pub async fn query(&self, query: LayoutQuery) -> Result<QueryResult, ActorError> {
        let (tx, rx) = oneshot::channel();

        self.sender
            .send(LayoutMessage::Query { query, respond_to: tx })
            .await
            .map_err(|_| ActorError::SendFailed)?;

        rx.await.map_err(|_| ActorError::ReceiveFailed)
    }

    /// Execute a query with a timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::Timeout`] if the query doesn't complete in time,
    /// or any error from [`Self::query`].
    pub async fn query_timeout(
        &self,
        query: LayoutQuery,
        timeout: Duration,
    ) -> Result<QueryResult, ActorError> {
        tokio::time::timeout(timeout, self.query(query))
            .await
            .map_err(|_| ActorError::Timeout(timeout))?
    }

    // ========================================================================
    // Convenience query methods
    // ========================================================================

    /// Get the committed layout.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the actor fails.
    pub async fn layout(&self) -> Result<LayoutSnapshot, ActorError> {
        self.query(LayoutQuery::GetLayout)
            .await?
            .into_layout()
            .ok_or(ActorError::UnexpectedResult("GetLayout"))
    }

    /// Get the live preview, if a drag is previewing.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the actor fails.
    pub async fn preview(&self) -> Result<Option<LayoutPreview>, ActorError> {
        self.query(LayoutQuery::GetPreview)
            .await?
            .into_preview()
            .ok_or(ActorError::UnexpectedResult("GetPreview"))
    }

    /// Get whether edit mode is on.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the actor fails.
    pub async fn edit_mode(&self) -> Result<bool, ActorError> {
        self.query(LayoutQuery::GetEditMode)
            .await?
            .into_edit_mode()
            .ok_or(ActorError::UnexpectedResult("GetEditMode"))
    }

    /// Get the occupancy matrix of the committed layout.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the actor fails.
    pub async fn occupancy(&self) -> Result<std::sync::Arc<GridOccupancy>, ActorError> {
        self.query(LayoutQuery::GetOccupancy)
            .await?
            .into_occupancy()
            .ok_or(ActorError::UnexpectedResult("GetOccupancy"))
    }

    /// Get one widget's position.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the actor fails.
    pub async fn widget(&self, id: &str) -> Result<Option<WidgetPosition>, ActorError> {
        self.query(LayoutQuery::GetWidget { id: id.to_string() })
            .await?
            .into_widget()
            .ok_or(ActorError::UnexpectedResult("GetWidget"))
    }

    /// Get the widgets currently being dragged.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the actor fails.
    pub async fn active_drags(&self) -> Result<Vec<(String, DragId)>, ActorError> {
        self.query(LayoutQuery::GetActiveDrags)
            .await?
            .into_active_drags()
            .ok_or(ActorError::UnexpectedResult("GetActiveDrags"))
    }

    /// Subscribe to layout, preview, and edit mode changes.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the actor fails.
    pub async fn subscribe(&self) -> Result<LayoutSubscription, ActorError> {
        self.query(LayoutQuery::Subscribe)
            .await?
            .into_subscription()
            .ok_or(ActorError::UnexpectedResult("Subscribe"))
    }

    // ========================================================================
    // Convenience command methods
    // ========================================================================

    /// Enter or leave edit mode.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::SendFailed`] if the channel is closed.
    pub fn set_edit_mode(&self, enabled: bool) -> Result<(), ActorError> {
        self.send(LayoutMessage::SetEditMode { enabled })
    }

    /// Resize a widget.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::SendFailed`] if the channel is closed.
    pub fn resize(&self, widget_id: &str, size: WidgetSize) -> Result<(), ActorError> {
        self.send(LayoutMessage::Resize { widget_id: widget_id.to_string(), size })
    }

    /// Register a drag and wait for the store's answer.
    ///
    /// Returns whether the drag was accepted.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::SendFailed`] if the channel is closed, or
    /// [`ActorError::ReceiveFailed`] if the response channel is closed.
    pub async fn begin_drag(&self, drag_id: DragId, widget_id: &str) -> Result<bool, ActorError> {
        let (tx, rx) = oneshot::channel();
        self.send_async(LayoutMessage::BeginDrag {
            drag_id,
            widget_id: widget_id.to_string(),
            respond_to: Some(tx),
        })
        .await?;
        rx.await.map_err(|_| ActorError::ReceiveFailed)
    }

    /// Commit a drag, waiting for channel capacity and then for the result.
    ///
    /// Returns the widget's final anchor as applied by the store, or `None`
    /// if the store did not accept the drag.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::SendFailed`] if the channel is closed, or
    /// [`ActorError::ReceiveFailed`] if the response channel is closed.
    pub async fn commit_drag(
        &self,
        drag_id: DragId,
        widget_id: &str,
        target: GridCell,
    ) -> Result<Option<GridCell>, ActorError> {
        let (tx, rx) = oneshot::channel();
        self.send_async(LayoutMessage::CommitDrag {
            drag_id,
            widget_id: widget_id.to_string(),
            target,
            respond_to: tx,
        })
        .await?;
        rx.await.map_err(|_| ActorError::ReceiveFailed)
    }

    /// Replace the whole layout.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::SendFailed`] if the channel is closed.
    pub fn reset_layout(&self, positions: Vec<WidgetPosition>) -> Result<(), ActorError> {
        self.send(LayoutMessage::ResetLayout { positions })
    }

    /// Shut the actor down.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::SendFailed`] if the channel is closed.
    pub fn shutdown(&self) -> Result<(), ActorError> { self.send(LayoutMessage::Shutdown) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_handle_closed_detection() {
        let (tx, rx) = mpsc::channel(16);
        let (live_tx, _live_rx) = mpsc::channel(16);
        let handle = LayoutHandle::new(tx, live_tx);
        assert!(handle.is_alive());

        drop(rx);
        assert!(!handle.is_alive());
        assert_eq!(handle.send(LayoutMessage::Shutdown), Err(ActorError::SendFailed));
    }

    #[tokio::test]
    async fn test_full_live_channel_drops_preview() {
        let (tx, _rx) = mpsc::channel(16);
        let (live_tx, _live_rx) = mpsc::channel(1);
        let handle = LayoutHandle::new(tx, live_tx);

        let preview = LiveRearrange {
            drag_id: DragId::now_v7(),
            widget_id: "steps".into(),
            target: GridCell::new(1, 1),
        };
        assert_eq!(handle.send_live(preview.clone()), Ok(LiveDispatch::Sent));
        assert_eq!(handle.send_live(preview), Ok(LiveDispatch::Dropped));
    }

    #[tokio::test]
    async fn test_query_on_closed_channel_fails() {
        let (tx, rx) = mpsc::channel(16);
        let (live_tx, _live_rx) = mpsc::channel(16);
        let handle = LayoutHandle::new(tx, live_tx);
        drop(rx);

        assert_eq!(handle.layout().await.unwrap_err(), ActorError::SendFailed);
    }
}
