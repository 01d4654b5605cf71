//! Layout store actor.
//!
//! The layout actor owns the `LayoutStore` and processes messages
//! sequentially, so the committed layout has exactly one writer.
//!
//! # Channels
//!
//! Two bounded channels feed the actor:
//! - the command channel carries drag lifecycle, resize, and query messages;
//!   senders wait for capacity, so a commit is never dropped
//! - the live channel carries throttled drag previews; senders never wait and
//!   a full channel drops the preview
//!
//! The run loop polls the command channel first. A preview that arrives after
//! its drag was committed or cancelled finds no active session and is
//! discarded, so it can never supersede the commit.
//!
//! # Panic Recovery
//!
//! If a message handler panics, the panic is caught and logged and the actor
//! continues with the next message.

mod handle;
pub mod handlers;
mod host;
mod messages;
mod state;

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

pub use handle::{ActorError, LayoutHandle, LiveDispatch};
pub use host::{GridHost, HostEvent, NoopHost, RecordingHost};
pub use messages::{
    DragId, LayoutMessage, LayoutPreview, LayoutQuery, LayoutSubscription, LiveRearrange,
    QueryResult,
};
pub use state::LayoutStore;
use tokio::sync::mpsc;

use crate::config::DashgridConfig;
use crate::grid::WidgetRegistry;

/// Channel buffer size for the command channel.
const CHANNEL_BUFFER_SIZE: usize = 256;

/// Channel buffer size for the live preview channel.
const LIVE_BUFFER_SIZE: usize = 16;

/// The actor that owns the layout store.
pub struct LayoutActor {
    /// The layout state owned by this actor.
    store: LayoutStore,

    /// Callbacks into the host screen.
    host: Arc<dyn GridHost>,

    /// Receiver for commands and queries.
    receiver: mpsc::Receiver<LayoutMessage>,

    /// Receiver for live previews.
    live: mpsc::Receiver<LiveRearrange>,
}

impl LayoutActor {
    /// Spawn the actor on the current tokio runtime and return a handle.
    #[must_use]
    pub fn spawn(store: LayoutStore, host: Arc<dyn GridHost>) -> LayoutHandle {
        tracing::debug!("store: spawning layout actor");
        let (sender, receiver) = mpsc::channel(CHANNEL_BUFFER_SIZE);
        let (live_sender, live) = mpsc::channel(LIVE_BUFFER_SIZE);

        let actor = Self { store, host, receiver, live };
        tokio::spawn(actor.run());

        LayoutHandle::new(sender, live_sender)
    }

    /// Spawn an actor seeded from configuration.
    #[must_use]
    pub fn spawn_with_config(config: &DashgridConfig, host: Arc<dyn GridHost>) -> LayoutHandle {
        let registry = WidgetRegistry::new(config.widgets.iter().cloned());
        Self::spawn(LayoutStore::new(registry, config.layout.clone()), host)
    }

    /// Run the actor's message loop until shutdown or until every handle is gone.
    async fn run(mut self) {
        tracing::trace!("store: actor message loop starting");
        let mut live_open = true;

        loop {
            tokio::select! {
                biased;

                msg = self.receiver.recv() => {
                    let Some(msg) = msg else { break };
                    if matches!(msg, LayoutMessage::Shutdown) {
                        tracing::debug!("store: actor received shutdown message");
                        return;
                    }
                    let name = msg.name();
                    self.guarded(name, |actor| actor.handle_message(msg));
                }

                live = self.live.recv(), if live_open => {
                    match live {
                        Some(live) => self.guarded("LiveRearrange", |actor| {
                            handlers::on_live_rearrange(&mut actor.store, actor.host.as_ref(), live);
                        }),
                        None => live_open = false,
                    }
                }
            }
        }

        tracing::debug!("store: actor channel closed, exiting");
    }

    /// Runs a handler, recovering from panics.
    fn guarded(&mut self, msg_name: &str, handler: impl FnOnce(&mut Self)) {
        let result = catch_unwind(AssertUnwindSafe(|| handler(self)));

        if let Err(panic_info) = result {
            let panic_msg = panic_info
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| panic_info.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());

            tracing::error!("store: PANIC in actor while handling '{msg_name}': {panic_msg}");
        }
    }

    /// Handle a single command.
    fn handle_message(&mut self, msg: LayoutMessage) {
        let host = self.host.as_ref();
        match msg {
            LayoutMessage::SetEditMode { enabled } => {
                handlers::on_set_edit_mode(&mut self.store, enabled);
            }
            LayoutMessage::BeginDrag { drag_id, widget_id, respond_to } => {
                let accepted = handlers::on_begin_drag(&mut self.store, drag_id, &widget_id);
                if let Some(respond_to) = respond_to
                    && respond_to.send(accepted).is_err()
                {
                    tracing::warn!("store: failed to send begin-drag response (channel closed)");
                }
            }
            LayoutMessage::CommitDrag { drag_id, widget_id, target, respond_to } => {
                let committed =
                    handlers::on_commit_drag(&mut self.store, host, drag_id, &widget_id, target);
                if respond_to.send(committed).is_err() {
                    tracing::trace!("store: commit of '{widget_id}' applied, requester went away");
                }
            }
            LayoutMessage::CancelDrag { drag_id } => {
                handlers::on_cancel_drag(&mut self.store, drag_id);
            }
            LayoutMessage::Resize { widget_id, size } => {
                handlers::on_resize(&mut self.store, host, &widget_id, size);
            }
            LayoutMessage::ResetLayout { positions } => {
                handlers::on_reset_layout(&mut self.store, positions);
            }
            LayoutMessage::Query { query, respond_to } => {
                let result = self.execute_query(query);
                if respond_to.send(result).is_err() {
                    tracing::warn!("store: failed to send query response (channel closed)");
                }
            }
            // Shutdown handled in run()
            LayoutMessage::Shutdown => {}
        }
    }

    // ========================================================================
    // Query Execution
    // ========================================================================

    fn execute_query(&mut self, query: LayoutQuery) -> QueryResult {
        match query {
            LayoutQuery::GetLayout => QueryResult::Layout(self.store.snapshot()),
            LayoutQuery::GetPreview => {
                QueryResult::Preview(eyeball::Observable::get(&self.store.preview).clone())
            }
            LayoutQuery::GetEditMode => QueryResult::EditMode(self.store.is_edit_mode()),
            LayoutQuery::GetOccupancy => QueryResult::Occupancy(self.store.occupancy()),
            LayoutQuery::GetWidget { id } => QueryResult::Widget(self.store.get_widget(&id)),
            LayoutQuery::GetCatalog => {
                QueryResult::Catalog(self.store.registry().iter().cloned().collect())
            }
            LayoutQuery::GetActiveDrags => QueryResult::ActiveDrags(self.store.active_drags()),
            LayoutQuery::Subscribe => QueryResult::Subscription(self.store.subscribe()),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
