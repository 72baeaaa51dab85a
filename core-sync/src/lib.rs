//! # Highlight Sync Module
//!
//! Orchestrates the synchronization of reading highlights into local notes.
//!
//! ## Overview
//!
//! This module covers one user-initiated sync session at a time:
//! - Logging in through the host's `LoginProvider`
//! - Discovering the remote catalog and proposing a selection
//! - Syncing the selected books one after the other, tolerating per-book failures
//! - Resyncing a single existing note
//! - Projecting the lifecycle events into a UI state snapshot
//!
//! ## Components
//!
//! - **Job Model** (`job`): jobs, batches, failure records and reports
//! - **State Projector** (`state`): `SyncModalState` and its pure reducer
//! - **Store** (`store`): observable state container and the bus controller feeding it
//! - **Orchestrator** (`orchestrator`): the bulk and resync workflows
//! - **Runtime** (`runtime`): wiring of all of the above from a `CoreConfig`

pub mod error;
pub mod job;
pub mod orchestrator;
pub mod runtime;
pub mod state;
pub mod store;

pub use error::{Result, SyncError};
pub use job::{BatchReport, CurrentJob, Job, JobBatch, JobError, SyncSessionId};
pub use orchestrator::{ResyncOutcome, SelectionOutcome, SelectionProposal, SyncOrchestrator};
pub use runtime::SyncRuntime;
pub use state::{SyncModalState, SyncStatus};
pub use store::{SyncModalController, SyncModalStore};
