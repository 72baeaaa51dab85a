//! # Job Model
//!
//! Shapes shared by the orchestrator and the state projector.
//!
//! ## Overview
//!
//! A [`Job`] is one book queued for syncing. Jobs only exist for the duration
//! of one batch and are never persisted. Failures are recorded as [`JobError`]s
//! in the order they happen; a failed job is terminal for the session (no
//! automatic retry).
//!
//! ```text
//! all_books ∩ selected_book_ids ──> JobBatch ──> run (sequential) ──> BatchReport
//!                                     │                                  │
//!                                     └── CurrentJob { book, index }     └── errored: [JobError]
//! ```

use bridge_traits::Book;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// ID Types
// ============================================================================

/// Identifier of one bulk sync session, used to correlate log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SyncSessionId(Uuid);

impl SyncSessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SyncSessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SyncSessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Jobs
// ============================================================================

/// One book to be synced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub book: Book,
}

impl Job {
    pub fn new(book: Book) -> Self {
        Self { book }
    }
}

/// The job currently being processed and its position in the batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentJob {
    pub book: Book,
    /// 0-based index into the running batch
    pub index: usize,
}

/// Failure record of one job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobError {
    pub book: Book,
    pub reason: String,
}

impl JobError {
    pub fn new(book: Book, reason: impl Into<String>) -> Self {
        Self {
            book,
            reason: reason.into(),
        }
    }
}

// ============================================================================
// Batches
// ============================================================================

/// Ordered list of jobs processed by one bulk run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobBatch {
    jobs: Vec<Job>,
}

impl JobBatch {
    /// Resolves a selection against the catalog.
    ///
    /// Jobs follow catalog order. Ids that are not in the catalog are ignored
    /// and each book is queued at most once.
    pub fn from_selection(all_books: &[Book], selected_ids: &[String]) -> Self {
        let jobs = all_books
            .iter()
            .enumerate()
            .filter(|(position, book)| {
                selected_ids.iter().any(|id| *id == book.id)
                    && !all_books[..*position].iter().any(|seen| seen.id == book.id)
            })
            .map(|(_, book)| Job::new(book.clone()))
            .collect();

        Self { jobs }
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn iter(&self) -> impl Iterator<Item = &Job> {
        self.jobs.iter()
    }

    pub fn book_ids(&self) -> Vec<&str> {
        self.jobs.iter().map(|job| job.book.id.as_str()).collect()
    }
}

impl From<Vec<Book>> for JobBatch {
    fn from(books: Vec<Book>) -> Self {
        Self {
            jobs: books.into_iter().map(Job::new).collect(),
        }
    }
}

/// Outcome of a completed batch.
///
/// A batch that ran to completion is a success even when some jobs failed;
/// `errored` lists those in failure order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub total: usize,
    pub succeeded: usize,
    pub errored: Vec<JobError>,
}

impl BatchReport {
    pub fn failed(&self) -> usize {
        self.errored.len()
    }

    pub fn has_failures(&self) -> bool {
        !self.errored.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<Book> {
        vec![
            Book::new("B1", "Dune", "Frank Herbert"),
            Book::new("B2", "Hyperion", "Dan Simmons"),
            Book::new("B3", "Solaris", "Stanislaw Lem"),
        ]
    }

    #[test]
    fn test_batch_follows_catalog_order() {
        let ids = vec!["B3".to_string(), "B1".to_string()];
        let batch = JobBatch::from_selection(&catalog(), &ids);

        assert_eq!(batch.book_ids(), vec!["B1", "B3"]);
    }

    #[test]
    fn test_batch_ignores_unknown_and_duplicate_ids() {
        let ids = vec!["B2".to_string(), "B9".to_string(), "B2".to_string()];
        let batch = JobBatch::from_selection(&catalog(), &ids);

        assert_eq!(batch.len(), 1);
        assert_eq!(batch.jobs()[0].book.title, "Hyperion");
    }

    #[test]
    fn test_batch_with_duplicate_catalog_entries() {
        let mut books = catalog();
        books.push(Book::new("B1", "Dune", "Frank Herbert"));

        let batch = JobBatch::from_selection(&books, &["B1".to_string()]);
        assert_eq!(batch.len(), 1);
    }

    #[test]
    fn test_empty_selection() {
        let batch = JobBatch::from_selection(&catalog(), &[]);
        assert!(batch.is_empty());
        assert!(JobBatch::default().is_empty());
    }

    #[test]
    fn test_report_counts() {
        let report = BatchReport {
            total: 3,
            succeeded: 2,
            errored: vec![JobError::new(catalog().remove(1), "Network error: timeout")],
        };

        assert_eq!(report.failed(), 1);
        assert!(report.has_failures());
        assert!(!BatchReport::default().has_failures());
    }

    #[test]
    fn test_session_ids_are_unique() {
        assert_ne!(SyncSessionId::new(), SyncSessionId::new());
        assert_eq!(SyncSessionId::new().to_string().len(), 36);
    }
}
