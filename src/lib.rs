//! Workspace umbrella crate.
//!
//! Host applications can depend on `highlight-sync-workspace` alone instead of
//! wiring `bridge-traits`, `core-runtime`, `core-sync` and `core-render`
//! individually. The `render` feature (on by default) pulls in the highlight
//! renderer.

pub use bridge_traits;
pub use core_runtime;
pub use core_sync;

#[cfg(feature = "render")]
pub use core_render;

pub use core_runtime::config::CoreConfig;
pub use core_runtime::events::{EventBus, EventKind, SyncEvent};
pub use core_sync::{SyncModalState, SyncOrchestrator, SyncRuntime, SyncStatus};
