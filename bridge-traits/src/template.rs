//! Template Engine
//!
//! The note text of a highlight is produced by a user-editable template. The
//! engine that evaluates it (syntax, filters, extensions) is provided by the
//! host.

use crate::{error::Result, platform::PlatformSendSync};

pub trait TemplateEngine: PlatformSendSync {
    /// Render `template` against `context` (a JSON object of variables).
    fn render(&self, template: &str, context: &serde_json::Value) -> Result<String>;
}
