//! Note Reconciliation
//!
//! Contract of the note layer: decides which books are worth syncing and
//! writes (or rewrites) the local note of a book from its remote highlights.
//! Persistence and rendering happen behind this trait.

use crate::{
    error::Result,
    models::{Book, Diff, Highlight, KindleFile},
    platform::PlatformSendSync,
};

#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
pub trait NoteSyncManager: PlatformSendSync {
    /// Subset of the remote catalog recommended for syncing (for instance
    /// books whose notes are missing or out of date).
    fn filter_books_to_sync(&self, books: &[Book]) -> Vec<Book>;

    /// Create or replace the note of `book` with `highlights`.
    async fn sync_book(&self, book: &Book, highlights: &[Highlight]) -> Result<()>;

    /// Reconcile an existing note with freshly fetched highlights.
    ///
    /// `remote_book` is the catalog entry matching `file.book.id`, when the
    /// catalog still lists it. Returns the changes applied to the note.
    async fn resync_book(
        &self,
        file: &KindleFile,
        remote_book: Option<&Book>,
        highlights: &[Highlight],
    ) -> Result<Vec<Diff>>;
}
