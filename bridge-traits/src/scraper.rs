//! Remote Catalog Scraping
//!
//! Contract of the collaborator that extracts the user's books and highlights
//! from the reading platform's notebook pages. How it talks to the remote
//! service (HTTP, headless webview, ...) and how long it waits are its own
//! business; the core only sees the results.

use crate::{
    error::Result,
    models::{Book, Highlight},
    platform::PlatformSendSync,
};

#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
pub trait HighlightScraper: PlatformSendSync {
    /// List every book in the remote catalog.
    async fn scrape_books(&self) -> Result<Vec<Book>>;

    /// Fetch all highlights of one book.
    async fn scrape_highlights_for_book(&self, book: &Book) -> Result<Vec<Highlight>>;
}
