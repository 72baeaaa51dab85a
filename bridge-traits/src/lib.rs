//! # Host Bridge Traits
//!
//! Capability contracts that the highlight sync core consumes but does not
//! implement.
//!
//! ## Overview
//!
//! The core drives the sync workflow; everything that touches the outside
//! world is injected through the traits in this crate:
//!
//! - [`LoginProvider`](login::LoginProvider) - interactive sign-in to the reading platform
//! - [`HighlightScraper`](scraper::HighlightScraper) - catalog discovery and per-book highlight fetch
//! - [`NoteSyncManager`](notes::NoteSyncManager) - selection policy and note reconciliation
//! - [`TemplateEngine`](template::TemplateEngine) - evaluation of highlight templates
//! - [`LoggerSink`](time::LoggerSink) - forward structured logs to host logging
//! - [`Clock`](time::Clock) - time source for deterministic rendering and tests
//!
//! The data shapes crossing those contracts live in [`models`].
//!
//! ## Error Handling
//!
//! All bridge traits use [`BridgeError`](error::BridgeError). The core turns
//! these into user-facing messages with `to_string()`, so implementations
//! should produce messages that make sense on their own ("Network error:
//! notebook page timed out"), not bare codes.
//!
//! ## Thread Safety
//!
//! Every trait requires [`PlatformSendSync`](platform::PlatformSendSync),
//! i.e. `Send + Sync` on native targets.

pub mod error;
pub mod login;
pub mod models;
pub mod notes;
pub mod platform;
pub mod scraper;
pub mod template;
pub mod time;

pub use error::BridgeError;

// Re-export commonly used types
pub use login::LoginProvider;
pub use models::{AmazonRegion, Book, Diff, DiffKind, Highlight, KindleFile, SyncMode};
pub use notes::NoteSyncManager;
pub use scraper::HighlightScraper;
pub use template::TemplateEngine;
pub use time::{Clock, ConsoleLogger, FixedClock, LogEntry, LogLevel, LoggerSink, SystemClock};
