//! # Sync Runtime
//!
//! Wires the event bus, the modal store, its controller and the orchestrator
//! from a [`CoreConfig`].
//!
//! ```rust,ignore
//! let runtime = SyncRuntime::new(config)?;
//!
//! let mut state = runtime.store().subscribe();
//! tokio::spawn(async move {
//!     while state.changed().await.is_ok() {
//!         render_modal(&state.borrow());
//!     }
//! });
//!
//! runtime.orchestrator().start_sync().await;
//! ```

use crate::orchestrator::SyncOrchestrator;
use crate::state::SyncModalState;
use crate::store::{SyncModalController, SyncModalStore};
use crate::Result;
use core_runtime::config::CoreConfig;
use core_runtime::events::{EventBus, SubscriptionId};
use std::sync::Arc;
use tracing::info;

/// Assembled sync core for one host.
pub struct SyncRuntime {
    config: CoreConfig,
    bus: EventBus,
    store: SyncModalStore,
    controller: SyncModalController,
    orchestrator: Arc<SyncOrchestrator>,
}

impl SyncRuntime {
    /// Builds the runtime. The controller is attached to the bus, so the
    /// store follows every emitted event.
    ///
    /// The event-driven continuation is not enabled; see
    /// [`listen_for_continuation`](Self::listen_for_continuation).
    pub fn new(config: CoreConfig) -> Result<Self> {
        config.validate()?;

        let bus = EventBus::new(config.event_buffer_size);
        let store = SyncModalStore::new();
        let controller = SyncModalController::new(store.clone(), &bus);
        controller.attach(&bus);

        let orchestrator = Arc::new(SyncOrchestrator::from_config(
            &config,
            bus.clone(),
            store.clone(),
        ));

        info!(
            mode = %config.sync_mode,
            region = config.amazon_region.hostname(),
            "Sync runtime ready"
        );

        Ok(Self {
            config,
            bus,
            store,
            controller,
            orchestrator,
        })
    }

    /// Lets `confirmBookSelection` emitted by the UI start the batch.
    pub fn listen_for_continuation(&self) -> SubscriptionId {
        self.orchestrator.listen_for_continuation()
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn store(&self) -> &SyncModalStore {
        &self.store
    }

    pub fn controller(&self) -> &SyncModalController {
        &self.controller
    }

    pub fn orchestrator(&self) -> &Arc<SyncOrchestrator> {
        &self.orchestrator
    }

    /// Latest modal snapshot.
    pub fn state(&self) -> SyncModalState {
        self.store.get()
    }
}

impl std::fmt::Debug for SyncRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncRuntime")
            .field("config", &self.config)
            .field("orchestrator", &self.orchestrator)
            .finish()
    }
}
