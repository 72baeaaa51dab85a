//! # Highlight Rendering
//!
//! Turns one highlight of one book into the text written to a note.
//!
//! The template language itself belongs to the host
//! ([`TemplateEngine`](bridge_traits::TemplateEngine)); this crate prepares the
//! variables, adjusts timestamps to the account's Amazon region, tidies the
//! output and tags it with a block reference so that later resyncs can find
//! the highlight again.

pub mod error;
pub mod renderer;

pub use error::{RenderError, Result};
pub use renderer::{
    highlight_template_variables, region_aware_date, trim_multiple_lines, HighlightRenderer,
    DEFAULT_DATE_FORMAT, DEFAULT_HIGHLIGHT_TEMPLATE, HIGHLIGHT_BLOCK_REF_PREFIX,
};
