//! # Core Runtime Module
//!
//! Foundational runtime infrastructure for the highlight sync core:
//! - Logging and tracing infrastructure
//! - Configuration management
//! - Typed event bus connecting the orchestrator to its observers
//!
//! ## Overview
//!
//! Everything here is independent of the sync workflow itself. `core-sync`
//! builds the orchestrator and the UI state projector on top of these pieces.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use error::{Error, Result};
