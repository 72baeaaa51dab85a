//! Headless sync demonstration
//!
//! Runs a full bulk session and a resync against in-memory collaborators,
//! printing the modal state as it changes.
//!
//! Run with:
//! ```bash
//! cargo run -p core-sync --example headless_sync
//!
//! # Event-driven selection (the UI emits confirmBookSelection on the bus)
//! cargo run -p core-sync --example headless_sync -- events
//!
//! # JSON logs
//! cargo run -p core-sync --example headless_sync -- direct json
//! ```

use anyhow::Context;
use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result as BridgeResult},
    time::{ConsoleLogger, LogLevel},
    Book, Diff, Highlight, HighlightScraper, KindleFile, LoginProvider, NoteSyncManager,
};
use core_runtime::config::CoreConfig;
use core_runtime::events::{EventKind, EventStream, SyncEvent};
use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};
use core_sync::{SelectionOutcome, SyncRuntime};
use std::env;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

struct AlwaysSignedIn;

#[async_trait]
impl LoginProvider for AlwaysSignedIn {
    async fn login(&self) -> BridgeResult<bool> {
        Ok(true)
    }
}

struct InMemoryNotebook {
    books: Vec<Book>,
}

#[async_trait]
impl HighlightScraper for InMemoryNotebook {
    async fn scrape_books(&self) -> BridgeResult<Vec<Book>> {
        tokio::time::sleep(Duration::from_millis(50)).await;
        Ok(self.books.clone())
    }

    async fn scrape_highlights_for_book(&self, book: &Book) -> BridgeResult<Vec<Highlight>> {
        tokio::time::sleep(Duration::from_millis(50)).await;
        if book.id == "B2" {
            return Err(BridgeError::Network("notebook page timed out".to_string()));
        }
        Ok(vec![
            Highlight::new(format!("{}-1", book.id), "A memorable passage").with_location("120"),
            Highlight::new(format!("{}-2", book.id), "Another one").with_page("42"),
        ])
    }
}

struct PrintingVault;

#[async_trait]
impl NoteSyncManager for PrintingVault {
    fn filter_books_to_sync(&self, books: &[Book]) -> Vec<Book> {
        books.iter().take(2).cloned().collect()
    }

    async fn sync_book(&self, book: &Book, highlights: &[Highlight]) -> BridgeResult<()> {
        println!("  wrote {} highlights to {}.md", highlights.len(), book.title);
        Ok(())
    }

    async fn resync_book(
        &self,
        file: &KindleFile,
        _remote_book: Option<&Book>,
        highlights: &[Highlight],
    ) -> BridgeResult<Vec<Diff>> {
        println!("  reconciled {} with {} highlights", file.path, highlights.len());
        Ok(highlights.iter().cloned().map(Diff::added).collect())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    let event_driven = args.get(1).map(String::as_str) == Some("events");
    let format = match args.get(2).map(String::as_str) {
        Some("json") => LogFormat::Json,
        Some("compact") => LogFormat::Compact,
        _ => LogFormat::Pretty,
    };

    init_logging(
        LoggingConfig::default()
            .with_format(format)
            .with_level(LogLevel::Debug)
            .with_logger_sink(Arc::new(ConsoleLogger {
                min_level: LogLevel::Warn,
            })),
    )
    .context("initializing logging")?;

    let books = vec![
        Book::new("B1", "Dune", "Frank Herbert").with_asin("B00B7NPRY8"),
        Book::new("B2", "Hyperion", "Dan Simmons"),
        Book::new("B3", "Solaris", "Stanislaw Lem"),
    ];

    let config = CoreConfig::builder()
        .login_provider(Arc::new(AlwaysSignedIn))
        .scraper(Arc::new(InMemoryNotebook {
            books: books.clone(),
        }))
        .note_sync_manager(Arc::new(PrintingVault))
        .build()
        .context("building configuration")?;
    let runtime = SyncRuntime::new(config)?;

    let mut state = runtime.store().subscribe();
    tokio::spawn(async move {
        while state.changed().await.is_ok() {
            let snapshot = state.borrow().clone();
            println!(
                "[modal] {} (current: {:?}, errors: {})",
                snapshot.status,
                snapshot.current_job.map(|job| job.index),
                snapshot.errored_jobs.len()
            );
        }
    });

    let proposal = match runtime.orchestrator().begin_selection().await {
        SelectionOutcome::Proposed(proposal) => proposal,
        other => anyhow::bail!("sync did not reach the selection step: {:?}", other),
    };
    info!(recommended = ?proposal.recommended_ids(), "Selection proposed");

    let selected = vec!["B1".to_string(), "B2".to_string(), "B3".to_string()];
    if event_driven {
        runtime.listen_for_continuation();
        let mut done = EventStream::new(runtime.bus().subscribe())
            .filter(|event| event.kind() == EventKind::SyncSessionSuccess);

        runtime.bus().emit(SyncEvent::ConfirmBookSelection {
            selected_book_ids: selected,
        });
        done.recv().await.context("waiting for the batch")?;
    } else {
        let batch = runtime.orchestrator().confirm_selection(selected)?;
        let report = runtime.orchestrator().run_batch(&batch).await;
        println!(
            "batch finished: {}/{} synced, {} failed",
            report.succeeded,
            report.total,
            report.failed()
        );
    }

    let file = KindleFile::new("Kindle/Frank Herbert/Dune.md", books[0].clone());
    let outcome = runtime.orchestrator().resync(&file).await;
    println!("resync: {:?}", outcome);

    tokio::time::sleep(Duration::from_millis(50)).await;
    Ok(())
}
