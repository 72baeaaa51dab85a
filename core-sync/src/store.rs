//! # Sync Modal Store
//!
//! Single-session state container and the controller that feeds it from the
//! event bus.
//!
//! The store only ever replaces its snapshot as a whole: every event goes
//! through [`SyncModalState::reduce`]. Observers read the latest snapshot with
//! [`SyncModalStore::get`] or wait for changes on a `watch` receiver.
//!
//! The controller is the one place where the projection talks back to the
//! bus: after applying `confirmBookSelection` it emits
//! `startSyncingSelectedBooks` so that the orchestrator can resume the batch.

use crate::state::{SyncModalState, SyncStatus};
use core_runtime::events::{EventBus, SubscriptionId, SyncEvent, WeakEventBus};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, warn};

/// Observable container of the current [`SyncModalState`].
///
/// Cloning yields another handle to the same state.
#[derive(Clone)]
pub struct SyncModalStore {
    sender: Arc<watch::Sender<SyncModalState>>,
}

impl SyncModalStore {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(SyncModalState::initial());
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Latest snapshot.
    pub fn get(&self) -> SyncModalState {
        self.sender.borrow().clone()
    }

    /// Receiver notified on every change.
    pub fn subscribe(&self) -> watch::Receiver<SyncModalState> {
        self.sender.subscribe()
    }

    /// Folds `event` into the current snapshot.
    pub fn apply(&self, event: &SyncEvent) {
        self.sender.send_modify(|state| *state = state.reduce(event));
    }

    /// Moves to a host-driven screen (`first-time`, `choose-sync-method`, ...).
    pub fn set_status(&self, status: SyncStatus) {
        self.sender
            .send_modify(|state| *state = state.with_status(status));
    }

    pub fn reset(&self) {
        self.replace(SyncModalState::initial());
    }

    /// Swaps the whole snapshot for `state`.
    pub fn replace(&self, state: SyncModalState) {
        self.sender.send_replace(state);
    }
}

impl Default for SyncModalStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SyncModalStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncModalStore")
            .field("status", &self.sender.borrow().status)
            .field("observers", &self.sender.receiver_count())
            .finish()
    }
}

/// Applies bus events to a [`SyncModalStore`].
#[derive(Clone, Debug)]
pub struct SyncModalController {
    store: SyncModalStore,
    bus: WeakEventBus,
}

impl SyncModalController {
    pub fn new(store: SyncModalStore, bus: &EventBus) -> Self {
        Self {
            store,
            bus: bus.downgrade(),
        }
    }

    pub fn store(&self) -> &SyncModalStore {
        &self.store
    }

    /// Applies `event` and runs the follow-up action, if any.
    pub fn handle(&self, event: &SyncEvent) {
        self.store.apply(event);

        if let SyncEvent::ConfirmBookSelection { selected_book_ids } = event {
            debug!(selected = selected_book_ids.len(), "Book selection confirmed");
            match self.bus.upgrade() {
                Some(bus) => {
                    bus.emit(SyncEvent::StartSyncingSelectedBooks);
                }
                None => warn!("Event bus dropped, cannot resume the sync batch"),
            }
        }
    }

    /// Registers the controller on `bus` for every event.
    pub fn attach(&self, bus: &EventBus) -> SubscriptionId {
        let controller = self.clone();
        bus.on_all(move |event| controller.handle(event))
    }
}
