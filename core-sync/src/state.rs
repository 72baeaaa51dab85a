//! # Sync Modal State
//!
//! Snapshot of the sync session as shown by the presentation layer, and the
//! pure reducer that folds [`SyncEvent`]s into it.
//!
//! ## Status Machine
//!
//! ```text
//!            syncSessionStart          startLogin        fetchingBooks
//!   idle ──────────────────> syncing ───────────> login ─────────────> fetching-books
//!    ▲                                              │                        │
//!    │ loginComplete(false)                         │       fetchingBooksSuccess
//!    ├──────────────────────────────────────────────┘                        ▼
//!    │ syncSessionFailure / syncSessionSuccess                         select-books
//!    ├──────────────────────────────────────────────┐                        │
//!    │                                              │    confirmBookSelection│
//!    │                                           syncing <───────────────────┘
//!    │                                              │  syncBook(i), syncBookFailure
//!    └──────────────────────────────────────────────┘
//! ```
//!
//! `upgrade-warning`, `first-time` and `choose-sync-method` are screens the
//! host switches to directly (see
//! [`SyncModalStore::set_status`](crate::store::SyncModalStore::set_status)).

use crate::error::SyncError;
use crate::job::{CurrentJob, Job, JobError};
use bridge_traits::{Book, SyncMode};
use core_runtime::events::SyncEvent;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Position of the session in its state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SyncStatus {
    #[serde(rename = "upgrade-warning")]
    UpgradeWarning,
    #[serde(rename = "first-time")]
    FirstTime,
    /// Initial and terminal resting state
    #[default]
    #[serde(rename = "idle")]
    Idle,
    #[serde(rename = "choose-sync-method")]
    ChooseSyncMethod,
    #[serde(rename = "sync:login")]
    Login,
    #[serde(rename = "sync:fetching-books")]
    FetchingBooks,
    #[serde(rename = "sync:select-books")]
    SelectBooks,
    #[serde(rename = "sync:syncing")]
    Syncing,
}

impl SyncStatus {
    pub const ALL: [SyncStatus; 8] = [
        SyncStatus::UpgradeWarning,
        SyncStatus::FirstTime,
        SyncStatus::Idle,
        SyncStatus::ChooseSyncMethod,
        SyncStatus::Login,
        SyncStatus::FetchingBooks,
        SyncStatus::SelectBooks,
        SyncStatus::Syncing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SyncStatus::UpgradeWarning => "upgrade-warning",
            SyncStatus::FirstTime => "first-time",
            SyncStatus::Idle => "idle",
            SyncStatus::ChooseSyncMethod => "choose-sync-method",
            SyncStatus::Login => "sync:login",
            SyncStatus::FetchingBooks => "sync:fetching-books",
            SyncStatus::SelectBooks => "sync:select-books",
            SyncStatus::Syncing => "sync:syncing",
        }
    }

    /// Whether a sync workflow is in flight.
    pub fn is_in_progress(&self) -> bool {
        self.as_str().starts_with("sync:")
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SyncStatus {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| SyncError::InvalidStatus(s.to_string()))
    }
}

/// Snapshot of one sync session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncModalState {
    pub status: SyncStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync_mode: Option<SyncMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_job: Option<CurrentJob>,
    /// Message of the last session-fatal failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync_error: Option<String>,
    #[serde(default)]
    pub jobs: Vec<Job>,
    #[serde(default)]
    pub errored_jobs: Vec<JobError>,
    /// Remote catalog as of the last discovery
    #[serde(default)]
    pub all_books: Vec<Book>,
    /// Always a subset of the ids in `all_books`
    #[serde(default)]
    pub selected_book_ids: Vec<String>,
}

impl SyncModalState {
    /// Idle, with no selection and no recorded errors.
    pub fn initial() -> Self {
        Self::default()
    }

    /// Returns the state after `event`.
    ///
    /// Pure: no I/O, no emission. Events that do not affect the snapshot
    /// return an unchanged copy.
    pub fn reduce(&self, event: &SyncEvent) -> SyncModalState {
        match event {
            SyncEvent::SyncSessionStart { mode } => SyncModalState {
                status: SyncStatus::Syncing,
                sync_mode: Some(*mode),
                ..Self::initial()
            },
            SyncEvent::StartLogin => self.with_status(SyncStatus::Login),
            SyncEvent::LoginComplete { success: false } => Self::initial(),
            SyncEvent::FetchingBooks => self.with_status(SyncStatus::FetchingBooks),
            SyncEvent::FetchingBooksSuccess { recommended, all } => {
                let recommended: Vec<&Book> = recommended
                    .iter()
                    .filter(|book| all.iter().any(|known| known.id == book.id))
                    .collect();

                SyncModalState {
                    status: SyncStatus::SelectBooks,
                    all_books: all.clone(),
                    selected_book_ids: unique_ids(recommended.iter().map(|book| book.id.as_str())),
                    jobs: recommended.into_iter().cloned().map(Job::new).collect(),
                    ..self.clone()
                }
            }
            SyncEvent::ConfirmBookSelection { selected_book_ids } => {
                let selected = unique_ids(
                    selected_book_ids
                        .iter()
                        .map(String::as_str)
                        .filter(|id| self.all_books.iter().any(|book| book.id == *id)),
                );
                let jobs = self
                    .all_books
                    .iter()
                    .filter(|book| selected.contains(&book.id))
                    .cloned()
                    .map(Job::new)
                    .collect();

                SyncModalState {
                    status: SyncStatus::Syncing,
                    selected_book_ids: selected,
                    jobs,
                    ..self.clone()
                }
            }
            SyncEvent::SyncBook { book, index } => SyncModalState {
                status: SyncStatus::Syncing,
                current_job: Some(CurrentJob {
                    book: book.clone(),
                    index: *index,
                }),
                ..self.clone()
            },
            SyncEvent::SyncBookFailure { book, message } => {
                let mut next = self.clone();
                next.errored_jobs.push(JobError::new(book.clone(), message.clone()));
                next
            }
            SyncEvent::SyncSessionSuccess => Self::initial(),
            SyncEvent::SyncSessionFailure { message } => SyncModalState {
                status: SyncStatus::Idle,
                sync_error: Some(message.clone()),
                ..self.clone()
            },
            SyncEvent::ResyncBook { file } => SyncModalState {
                status: SyncStatus::Syncing,
                current_job: Some(CurrentJob {
                    book: file.book.clone(),
                    index: 0,
                }),
                ..Self::initial()
            },
            SyncEvent::ResyncComplete { .. } => self.with_status(SyncStatus::Idle),
            SyncEvent::ResyncFailure { file, message } => SyncModalState {
                status: SyncStatus::Idle,
                errored_jobs: vec![JobError::new(file.book.clone(), message.clone())],
                ..self.clone()
            },
            SyncEvent::LoginComplete { success: true }
            | SyncEvent::StartSyncingSelectedBooks
            | SyncEvent::SyncBookSuccess { .. } => self.clone(),
        }
    }

    pub fn with_status(&self, status: SyncStatus) -> SyncModalState {
        SyncModalState {
            status,
            ..self.clone()
        }
    }

    /// Whether `book_id` is part of the current selection.
    pub fn is_selected(&self, book_id: &str) -> bool {
        self.selected_book_ids.iter().any(|id| id == book_id)
    }
}

fn unique_ids<'a>(ids: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::new();
    for id in ids {
        if !unique.iter().any(|seen| seen == id) {
            unique.push(id.to_string());
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::{Highlight, KindleFile};

    fn b1() -> Book {
        Book::new("B1", "Dune", "Frank Herbert")
    }

    fn b2() -> Book {
        Book::new("B2", "Hyperion", "Dan Simmons")
    }

    fn b3() -> Book {
        Book::new("B3", "Solaris", "Stanislaw Lem")
    }

    fn fold(events: &[SyncEvent]) -> SyncModalState {
        events
            .iter()
            .fold(SyncModalState::initial(), |state, event| state.reduce(event))
    }

    fn discovered() -> SyncEvent {
        SyncEvent::FetchingBooksSuccess {
            recommended: vec![b1(), b3()],
            all: vec![b1(), b2(), b3()],
        }
    }

    #[test]
    fn test_status_wire_names() {
        for status in SyncStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
            assert_eq!(status.as_str().parse::<SyncStatus>().unwrap(), status);
        }
        assert!("sync:unknown".parse::<SyncStatus>().is_err());
        assert!(SyncStatus::SelectBooks.is_in_progress());
        assert!(!SyncStatus::ChooseSyncMethod.is_in_progress());
    }

    #[test]
    fn test_initial_state() {
        let state = SyncModalState::initial();
        assert_eq!(state.status, SyncStatus::Idle);
        assert!(state.errored_jobs.is_empty());
        assert!(state.all_books.is_empty());
        assert!(state.selected_book_ids.is_empty());
        assert!(state.sync_error.is_none());
    }

    #[test]
    fn test_session_start_resets_previous_session() {
        let dirty = SyncModalState {
            sync_error: Some("boom".to_string()),
            errored_jobs: vec![JobError::new(b1(), "boom")],
            ..SyncModalState::initial()
        };

        let state = dirty.reduce(&SyncEvent::SyncSessionStart {
            mode: SyncMode::Amazon,
        });

        assert_eq!(state.status, SyncStatus::Syncing);
        assert_eq!(state.sync_mode, Some(SyncMode::Amazon));
        assert!(state.errored_jobs.is_empty());
        assert!(state.sync_error.is_none());
    }

    #[test]
    fn test_login_phases() {
        let state = fold(&[
            SyncEvent::SyncSessionStart {
                mode: SyncMode::Amazon,
            },
            SyncEvent::StartLogin,
        ]);
        assert_eq!(state.status, SyncStatus::Login);

        assert_eq!(
            state.reduce(&SyncEvent::LoginComplete { success: true }).status,
            SyncStatus::Login
        );
        assert_eq!(
            state.reduce(&SyncEvent::LoginComplete { success: false }),
            SyncModalState::initial()
        );
    }

    #[test]
    fn test_fetching_books_success_populates_selection() {
        let state = fold(&[SyncEvent::FetchingBooks, discovered()]);

        assert_eq!(state.status, SyncStatus::SelectBooks);
        assert_eq!(state.all_books, vec![b1(), b2(), b3()]);
        assert_eq!(state.selected_book_ids, vec!["B1", "B3"]);
        assert_eq!(state.jobs.len(), 2);
    }

    #[test]
    fn test_recommended_outside_catalog_is_dropped() {
        let state = SyncModalState::initial().reduce(&SyncEvent::FetchingBooksSuccess {
            recommended: vec![b1(), b2()],
            all: vec![b1()],
        });

        assert_eq!(state.selected_book_ids, vec!["B1"]);
        assert_eq!(state.jobs, vec![Job::new(b1())]);
    }

    #[test]
    fn test_confirm_selection_replaces_jobs() {
        let state = fold(&[
            discovered(),
            SyncEvent::ConfirmBookSelection {
                selected_book_ids: vec!["B2".to_string()],
            },
        ]);

        assert_eq!(state.status, SyncStatus::Syncing);
        assert_eq!(state.selected_book_ids, vec!["B2"]);
        assert_eq!(state.jobs, vec![Job::new(b2())]);
    }

    #[test]
    fn test_confirm_selection_keeps_ids_within_catalog() {
        let state = fold(&[
            discovered(),
            SyncEvent::ConfirmBookSelection {
                selected_book_ids: vec![
                    "B3".to_string(),
                    "B404".to_string(),
                    "B1".to_string(),
                    "B3".to_string(),
                ],
            },
        ]);

        assert_eq!(state.selected_book_ids, vec!["B3", "B1"]);
        assert_eq!(state.jobs, vec![Job::new(b1()), Job::new(b3())]);
        for id in &state.selected_book_ids {
            assert!(state.all_books.iter().any(|book| &book.id == id));
        }
    }

    #[test]
    fn test_sync_book_sets_current_job() {
        let state = fold(&[
            discovered(),
            SyncEvent::SyncBook {
                book: b3(),
                index: 1,
            },
        ]);

        assert_eq!(state.status, SyncStatus::Syncing);
        let current = state.current_job.unwrap();
        assert_eq!(current.book, b3());
        assert_eq!(current.index, 1);
    }

    #[test]
    fn test_book_failures_accumulate_in_order() {
        let state = fold(&[
            SyncEvent::SyncBookFailure {
                book: b2(),
                message: "first".to_string(),
            },
            SyncEvent::SyncBookSuccess {
                book: b1(),
                highlights: vec![Highlight::new("H1", "text")],
            },
            SyncEvent::SyncBookFailure {
                book: b3(),
                message: "second".to_string(),
            },
        ]);

        let reasons: Vec<&str> = state
            .errored_jobs
            .iter()
            .map(|job| job.reason.as_str())
            .collect();
        assert_eq!(reasons, vec!["first", "second"]);
    }

    #[test]
    fn test_session_success_resets_to_initial() {
        let state = fold(&[
            SyncEvent::SyncSessionStart {
                mode: SyncMode::Amazon,
            },
            discovered(),
            SyncEvent::SyncBook {
                book: b1(),
                index: 0,
            },
            SyncEvent::SyncBookFailure {
                book: b1(),
                message: "Network error".to_string(),
            },
            SyncEvent::SyncSessionSuccess,
        ]);

        assert_eq!(state, SyncModalState::initial());
    }

    #[test]
    fn test_session_failure_keeps_message() {
        let state = fold(&[
            SyncEvent::FetchingBooks,
            SyncEvent::SyncSessionFailure {
                message: "Parse error: notebook page changed".to_string(),
            },
        ]);

        assert_eq!(state.status, SyncStatus::Idle);
        assert_eq!(
            state.sync_error.as_deref(),
            Some("Parse error: notebook page changed")
        );
    }

    #[test]
    fn test_resync_lifecycle() {
        let file = KindleFile::new("Kindle/Dune.md", b1());

        let started = fold(&[discovered(), SyncEvent::ResyncBook { file: file.clone() }]);
        assert_eq!(started.status, SyncStatus::Syncing);
        assert!(started.all_books.is_empty());
        assert_eq!(started.current_job.as_ref().unwrap().index, 0);
        assert_eq!(started.current_job.as_ref().unwrap().book, b1());

        let done = started.reduce(&SyncEvent::ResyncComplete {
            file: file.clone(),
            diff_count: 3,
        });
        assert_eq!(done.status, SyncStatus::Idle);
    }

    #[test]
    fn test_resync_failure_replaces_errors() {
        let file = KindleFile::new("Kindle/Dune.md", b1());
        let state = fold(&[
            SyncEvent::SyncBookFailure {
                book: b2(),
                message: "old".to_string(),
            },
            SyncEvent::SyncBookFailure {
                book: b3(),
                message: "older".to_string(),
            },
            SyncEvent::ResyncFailure {
                file: file.clone(),
                message: "Network error".to_string(),
            },
            SyncEvent::ResyncFailure {
                file,
                message: "Network error again".to_string(),
            },
        ]);

        assert_eq!(state.status, SyncStatus::Idle);
        assert_eq!(state.errored_jobs.len(), 1);
        assert_eq!(state.errored_jobs[0].book, b1());
        assert_eq!(state.errored_jobs[0].reason, "Network error again");
    }

    #[test]
    fn test_status_stays_in_closed_set() {
        let file = KindleFile::new("Kindle/Dune.md", b1());
        let events = vec![
            SyncEvent::SyncSessionStart {
                mode: SyncMode::MyClippings,
            },
            SyncEvent::StartLogin,
            SyncEvent::LoginComplete { success: true },
            SyncEvent::FetchingBooks,
            discovered(),
            SyncEvent::ConfirmBookSelection {
                selected_book_ids: vec!["B1".to_string()],
            },
            SyncEvent::StartSyncingSelectedBooks,
            SyncEvent::SyncBook {
                book: b1(),
                index: 0,
            },
            SyncEvent::SyncSessionFailure {
                message: "x".to_string(),
            },
            SyncEvent::ResyncBook { file: file.clone() },
            SyncEvent::ResyncFailure {
                file,
                message: "y".to_string(),
            },
            SyncEvent::LoginComplete { success: false },
        ];

        // Every prefix and every rotation of the sequence.
        for start in 0..events.len() {
            let mut state = SyncModalState::initial();
            for event in events.iter().cycle().skip(start).take(events.len()) {
                state = state.reduce(event);
                assert!(SyncStatus::ALL.contains(&state.status));
                for id in &state.selected_book_ids {
                    assert!(state.all_books.iter().any(|book| &book.id == id));
                }
            }
        }
    }

    #[test]
    fn test_state_serializes_camel_case() {
        let state = fold(&[discovered()]);
        let json = serde_json::to_value(&state).unwrap();

        assert_eq!(json["status"], "sync:select-books");
        assert_eq!(json["selectedBookIds"], serde_json::json!(["B1", "B3"]));
        assert!(json["erroredJobs"].as_array().unwrap().is_empty());
        assert!(json.get("currentJob").is_none());
    }
}
