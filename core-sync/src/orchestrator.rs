//! # Sync Orchestrator
//!
//! Drives the end-to-end highlight sync workflow.
//!
//! ## Overview
//!
//! The orchestrator sequences the host collaborators (login, scraper, note
//! manager) and reports every phase on the [`EventBus`]. It never fails
//! towards its caller: collaborator errors are turned into messages, put on
//! failure events and returned in the outcome types.
//!
//! ## Workflow
//!
//! ### Bulk sync
//! 1. `syncSessionStart(mode)`
//! 2. Login sub-protocol: `startLogin`, login, `loginComplete(success)`.
//!    A declined (or failed) login ends the session silently and puts the
//!    state back to what it was before the call.
//! 3. `fetchingBooks`, catalog discovery, selection policy, then
//!    `fetchingBooksSuccess(recommended, all)`. A discovery error emits
//!    `syncSessionFailure(message)` instead.
//! 4. The user confirms a selection (`confirmBookSelection`).
//! 5. Jobs run one after the other: `syncBook(book, i)`, fetch highlights,
//!    write the note, then `syncBookSuccess` or `syncBookFailure`. A failed
//!    book never stops the batch.
//! 6. `syncSessionSuccess`, whatever the number of failed books.
//!
//! ### Resync of one note
//! 1. `resyncBook(file)`
//! 2. Login sub-protocol
//! 3. Discover the catalog and find the remote book by id (optional). The
//!    highlights are fetched with the note's own book metadata; the remote
//!    book is only handed to the note manager for reconciliation
//! 4. `resyncComplete(file, diff_count)` or `resyncFailure(file, message)`
//!
//! ## Driving the selection step
//!
//! Hosts either call the two phases directly:
//!
//! ```rust,ignore
//! if let SelectionOutcome::Proposed(proposal) = orchestrator.begin_selection().await {
//!     let ids = ui.pick_books(&proposal).await;
//!     let batch = orchestrator.confirm_selection(ids)?;
//!     let report = orchestrator.run_batch(&batch).await;
//! }
//! ```
//!
//! or let the UI emit `confirmBookSelection` on the bus and call
//! [`SyncOrchestrator::listen_for_continuation`] once, in which case the
//! batch starts from the `startSyncingSelectedBooks` continuation. The two
//! modes must not be combined, or the batch runs twice.

use crate::job::{BatchReport, JobBatch, JobError, SyncSessionId};
use crate::store::SyncModalStore;
use crate::{Result, SyncError};
use bridge_traits::{
    Book, Diff, Highlight, HighlightScraper, KindleFile, LoginProvider, NoteSyncManager, SyncMode,
};
use core_runtime::config::CoreConfig;
use core_runtime::events::{EventBus, EventKind, SubscriptionId, SyncEvent};
use core_runtime::logging::strip_path;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Result of the first phase of a bulk sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// The user declined to log in
    Cancelled,
    /// Discovery failed; `syncSessionFailure` was emitted with this message
    Failed(String),
    Proposed(SelectionProposal),
}

/// Catalog and recommended subset offered to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionProposal {
    pub session_id: SyncSessionId,
    pub recommended: Vec<Book>,
    pub all_books: Vec<Book>,
}

impl SelectionProposal {
    pub fn recommended_ids(&self) -> Vec<String> {
        self.recommended.iter().map(|book| book.id.clone()).collect()
    }
}

/// Result of a single-note resync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResyncOutcome {
    Cancelled,
    Completed { diff_count: usize },
    Failed(String),
}

/// Sequences login, discovery and per-book sync.
pub struct SyncOrchestrator {
    login_provider: Arc<dyn LoginProvider>,
    scraper: Arc<dyn HighlightScraper>,
    note_sync_manager: Arc<dyn NoteSyncManager>,
    bus: EventBus,
    store: SyncModalStore,
    sync_mode: SyncMode,
}

impl SyncOrchestrator {
    /// Creates an orchestrator.
    ///
    /// `store` must be fed by a
    /// [`SyncModalController`](crate::store::SyncModalController) attached to
    /// `bus`: the batch is resolved from its selection.
    pub fn new(
        login_provider: Arc<dyn LoginProvider>,
        scraper: Arc<dyn HighlightScraper>,
        note_sync_manager: Arc<dyn NoteSyncManager>,
        bus: EventBus,
        store: SyncModalStore,
    ) -> Self {
        Self {
            login_provider,
            scraper,
            note_sync_manager,
            bus,
            store,
            sync_mode: SyncMode::default(),
        }
    }

    pub fn from_config(config: &CoreConfig, bus: EventBus, store: SyncModalStore) -> Self {
        Self::new(
            Arc::clone(&config.login_provider),
            Arc::clone(&config.scraper),
            Arc::clone(&config.note_sync_manager),
            bus,
            store,
        )
        .with_sync_mode(config.sync_mode)
    }

    pub fn with_sync_mode(mut self, mode: SyncMode) -> Self {
        self.sync_mode = mode;
        self
    }

    pub fn sync_mode(&self) -> SyncMode {
        self.sync_mode
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn store(&self) -> &SyncModalStore {
        &self.store
    }

    // ------------------------------------------------------------------------
    // Bulk sync
    // ------------------------------------------------------------------------

    /// Starts a bulk session and runs it up to the selection step.
    #[instrument(skip(self), fields(mode = %self.sync_mode))]
    pub async fn start_sync(&self) -> SelectionOutcome {
        let session_id = SyncSessionId::new();
        let baseline = self.store.get();
        info!(sync_session = %session_id, "Starting sync session");

        self.bus.emit(SyncEvent::SyncSessionStart {
            mode: self.sync_mode,
        });

        if !self.login().await {
            info!(sync_session = %session_id, "Login cancelled, ending session");
            self.store.replace(baseline);
            return SelectionOutcome::Cancelled;
        }

        self.bus.emit(SyncEvent::FetchingBooks);

        match self.discover().await {
            Ok((recommended, all_books)) => {
                info!(
                    sync_session = %session_id,
                    total = all_books.len(),
                    recommended = recommended.len(),
                    "Catalog discovered"
                );
                self.bus.emit(SyncEvent::FetchingBooksSuccess {
                    recommended: recommended.clone(),
                    all: all_books.clone(),
                });
                SelectionOutcome::Proposed(SelectionProposal {
                    session_id,
                    recommended,
                    all_books,
                })
            }
            Err(e) => {
                let message = e.to_string();
                error!(sync_session = %session_id, error = %message, "Catalog discovery failed");
                self.bus.emit(SyncEvent::SyncSessionFailure {
                    message: message.clone(),
                });
                SelectionOutcome::Failed(message)
            }
        }
    }

    /// First phase of the explicit two-phase flow. Same as [`start_sync`](Self::start_sync).
    pub async fn begin_selection(&self) -> SelectionOutcome {
        self.start_sync().await
    }

    /// Second phase: records the user's choice and resolves it into a batch.
    ///
    /// # Errors
    ///
    /// [`SyncError::NoBooksSelected`] when none of `selected_ids` is in the
    /// discovered catalog.
    #[instrument(skip(self, selected_ids), fields(selected = selected_ids.len()))]
    pub fn confirm_selection(&self, selected_ids: Vec<String>) -> Result<JobBatch> {
        self.bus.emit(SyncEvent::ConfirmBookSelection {
            selected_book_ids: selected_ids,
        });

        let batch = self.resolve_selection();
        if batch.is_empty() {
            return Err(SyncError::NoBooksSelected);
        }
        Ok(batch)
    }

    /// Syncs every job of `batch`, in order.
    ///
    /// Always ends with `syncSessionSuccess`; failed books are listed in the
    /// report.
    #[instrument(skip(self, batch), fields(jobs = batch.len()))]
    pub async fn run_batch(&self, batch: &JobBatch) -> BatchReport {
        let mut report = BatchReport {
            total: batch.len(),
            ..BatchReport::default()
        };

        for (index, job) in batch.iter().enumerate() {
            let book = &job.book;
            debug!(index, book_id = %book.id, "Syncing book");
            self.bus.emit(SyncEvent::SyncBook {
                book: book.clone(),
                index,
            });

            match self.sync_book(book).await {
                Ok(highlights) => {
                    debug!(book_id = %book.id, highlights = highlights.len(), "Book synced");
                    report.succeeded += 1;
                    self.bus.emit(SyncEvent::SyncBookSuccess {
                        book: book.clone(),
                        highlights,
                    });
                }
                Err(e) => {
                    let message = e.to_string();
                    warn!(book_id = %book.id, error = %message, "Failed to sync book");
                    self.bus.emit(SyncEvent::SyncBookFailure {
                        book: book.clone(),
                        message: message.clone(),
                    });
                    report.errored.push(JobError::new(book.clone(), message));
                }
            }
        }

        info!(
            total = report.total,
            succeeded = report.succeeded,
            failed = report.failed(),
            "Sync batch completed"
        );
        self.bus.emit(SyncEvent::SyncSessionSuccess);

        report
    }

    /// Continuation of the bulk flow: runs the batch selected in the store.
    ///
    /// Returns `None`, without emitting anything, when the selection resolves
    /// to no book.
    pub async fn sync_selected_books(&self) -> Option<BatchReport> {
        let batch = self.resolve_selection();
        if batch.is_empty() {
            warn!("No selected books to sync");
            return None;
        }
        Some(self.run_batch(&batch).await)
    }

    /// Runs [`sync_selected_books`](Self::sync_selected_books) on the current
    /// tokio runtime whenever `startSyncingSelectedBooks` is emitted.
    ///
    /// The listener only holds a weak reference to the orchestrator.
    pub fn listen_for_continuation(self: &Arc<Self>) -> SubscriptionId {
        let orchestrator = Arc::downgrade(self);
        self.bus
            .on(EventKind::StartSyncingSelectedBooks, move |_| {
                let Some(orchestrator) = orchestrator.upgrade() else {
                    return;
                };
                match tokio::runtime::Handle::try_current() {
                    Ok(handle) => {
                        handle.spawn(async move {
                            orchestrator.sync_selected_books().await;
                        });
                    }
                    Err(e) => error!(error = %e, "No async runtime to run the sync batch on"),
                }
            })
    }

    fn resolve_selection(&self) -> JobBatch {
        let state = self.store.get();
        JobBatch::from_selection(&state.all_books, &state.selected_book_ids)
    }

    async fn discover(&self) -> Result<(Vec<Book>, Vec<Book>)> {
        let all_books = self.scraper.scrape_books().await?;
        let recommended = self.note_sync_manager.filter_books_to_sync(&all_books);
        Ok((recommended, all_books))
    }

    async fn sync_book(&self, book: &Book) -> Result<Vec<Highlight>> {
        let highlights = self.scraper.scrape_highlights_for_book(book).await?;
        self.note_sync_manager.sync_book(book, &highlights).await?;
        Ok(highlights)
    }

    // ------------------------------------------------------------------------
    // Resync
    // ------------------------------------------------------------------------

    /// Re-fetches the highlights of one synced note and reconciles it.
    #[instrument(
        skip(self, file),
        fields(path = %strip_path(&file.path), book_id = %file.book.id)
    )]
    pub async fn resync(&self, file: &KindleFile) -> ResyncOutcome {
        let baseline = self.store.get();
        self.bus.emit(SyncEvent::ResyncBook { file: file.clone() });

        if !self.login().await {
            info!("Login cancelled, skipping resync");
            self.store.replace(baseline);
            return ResyncOutcome::Cancelled;
        }

        match self.reconcile(file).await {
            Ok(diffs) => {
                let diff_count = diffs.len();
                info!(diff_count, "Resync completed");
                self.bus.emit(SyncEvent::ResyncComplete {
                    file: file.clone(),
                    diff_count,
                });
                ResyncOutcome::Completed { diff_count }
            }
            Err(e) => {
                let message = e.to_string();
                error!(error = %message, "Resync failed");
                self.bus.emit(SyncEvent::ResyncFailure {
                    file: file.clone(),
                    message: message.clone(),
                });
                ResyncOutcome::Failed(message)
            }
        }
    }

    async fn reconcile(&self, file: &KindleFile) -> Result<Vec<Diff>> {
        let books = self.scraper.scrape_books().await?;
        let remote_book = books.iter().find(|book| book.id == file.book.id);
        if remote_book.is_none() {
            debug!("Book no longer listed remotely");
        }

        let highlights = self.scraper.scrape_highlights_for_book(&file.book).await?;

        let diffs = self
            .note_sync_manager
            .resync_book(file, remote_book, &highlights)
            .await?;
        Ok(diffs)
    }

    // ------------------------------------------------------------------------
    // Login
    // ------------------------------------------------------------------------

    async fn login(&self) -> bool {
        self.bus.emit(SyncEvent::StartLogin);

        let success = match self.login_provider.login().await {
            Ok(success) => success,
            Err(e) => {
                warn!(error = %e, "Login flow failed, treating as cancelled");
                false
            }
        };

        self.bus.emit(SyncEvent::LoginComplete { success });
        success
    }
}

impl std::fmt::Debug for SyncOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncOrchestrator")
            .field("sync_mode", &self.sync_mode)
            .field("bus", &self.bus)
            .field("store", &self.store)
            .finish()
    }
}
