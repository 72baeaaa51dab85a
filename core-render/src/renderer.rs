//! # Highlight Renderer
//!
//! ## Rendering pipeline
//!
//! ```text
//! Highlight + Book ──> template variables ──> TemplateEngine ──> trim blank runs ──> "<text> ^ref-<id>"
//! ```
//!
//! ## Dates
//!
//! Amazon reports highlight timestamps without a timezone. They are shifted by
//! the fixed offset of the account's storefront ([`AmazonRegion::utc_offset`])
//! before formatting. Formats use `strftime` syntax and default to
//! [`DEFAULT_DATE_FORMAT`].

use crate::error::{RenderError, Result};
use bridge_traits::{AmazonRegion, Book, Clock, Highlight, SystemClock, TemplateEngine};
use chrono::NaiveDateTime;
use core_runtime::config::CoreConfig;
use serde_json::{json, Value};
use std::fmt::Write;
use std::sync::Arc;
use tracing::debug;

/// Prefix of the block reference appended to every rendered highlight.
pub const HIGHLIGHT_BLOCK_REF_PREFIX: &str = "^ref-";

/// Day-month-year.
pub const DEFAULT_DATE_FORMAT: &str = "%d-%m-%Y";

/// Template used when the user has not configured one.
pub const DEFAULT_HIGHLIGHT_TEMPLATE: &str =
    "{{ text }}{% if location %} - location: [{{ location }}]({{ appLink }}){% endif %}";

/// Renders highlights through a host-provided template engine.
pub struct HighlightRenderer {
    template: String,
    engine: Arc<dyn TemplateEngine>,
    region: AmazonRegion,
    clock: Arc<dyn Clock>,
}

impl HighlightRenderer {
    pub fn new(
        template: impl Into<String>,
        engine: Arc<dyn TemplateEngine>,
        region: AmazonRegion,
    ) -> Self {
        Self {
            template: template.into(),
            engine,
            region,
            clock: Arc::new(SystemClock),
        }
    }

    /// Builds a renderer from the configured template engine, highlight
    /// template and Amazon region.
    ///
    /// # Errors
    ///
    /// [`RenderError::EngineMissing`] when no template engine was configured.
    pub fn from_config(config: &CoreConfig) -> Result<Self> {
        let engine = config
            .template_engine
            .clone()
            .ok_or(RenderError::EngineMissing)?;
        let template = config
            .highlight_template
            .clone()
            .unwrap_or_else(|| DEFAULT_HIGHLIGHT_TEMPLATE.to_string());

        Ok(Self::new(template, engine, config.amazon_region))
    }

    /// Replaces the clock used for highlights without a timestamp.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn region(&self) -> AmazonRegion {
        self.region
    }

    /// Checks that `template` can be rendered at all.
    ///
    /// The template is evaluated against a context holding only an empty
    /// `text`; any engine error makes it invalid.
    pub fn validate(&self, template: &str) -> bool {
        match self.engine.render(template, &json!({ "text": "" })) {
            Ok(_) => true,
            Err(e) => {
                debug!(error = %e, "Highlight template rejected");
                false
            }
        }
    }

    /// Renders `highlight` of `book` with the configured template.
    pub fn render(&self, highlight: &Highlight, book: &Book) -> Result<String> {
        let variables = highlight_template_variables(highlight, book, self.region)?;
        let rendered = self.engine.render(&self.template, &variables)?;
        let content = trim_multiple_lines(&rendered);

        Ok(format!(
            "{} {}{}",
            content, HIGHLIGHT_BLOCK_REF_PREFIX, highlight.id
        ))
    }

    /// Formats `date` for this renderer's region, using the current time when
    /// `date` is absent.
    ///
    /// Hosts use this to back the `date` filter of their template engine.
    pub fn format_date(&self, date: Option<NaiveDateTime>, format: Option<&str>) -> Result<String> {
        let date = date.unwrap_or_else(|| self.clock.now_naive());
        region_aware_date(date, format.unwrap_or(DEFAULT_DATE_FORMAT), self.region)
    }
}

impl std::fmt::Debug for HighlightRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HighlightRenderer")
            .field("template", &self.template)
            .field("region", &self.region)
            .finish()
    }
}

/// Variables available to highlight templates.
///
/// Highlight fields are top-level (`text`, `location`, `page`, `note`,
/// `color`, `createdDate`, `appLink`); book fields are both top-level
/// (`title`, `author`, `asin`, `url`, `imageUrl`) and grouped under `book`.
/// Missing values are `null`.
pub fn highlight_template_variables(
    highlight: &Highlight,
    book: &Book,
    region: AmazonRegion,
) -> Result<Value> {
    let created_date = highlight
        .created_date
        .map(|date| region_aware_date(date, DEFAULT_DATE_FORMAT, region))
        .transpose()?;

    let app_link = match (&book.asin, &highlight.location) {
        (Some(asin), Some(location)) => Some(format!(
            "kindle://book?action=open&asin={}&location={}",
            asin, location
        )),
        _ => None,
    };

    Ok(json!({
        "id": highlight.id,
        "text": highlight.text,
        "location": highlight.location,
        "page": highlight.page,
        "note": highlight.note,
        "color": highlight.color,
        "createdDate": created_date,
        "appLink": app_link,
        "title": book.title,
        "author": book.author,
        "asin": book.asin,
        "url": book.url,
        "imageUrl": book.image_url,
        "book": {
            "id": book.id,
            "title": book.title,
            "author": book.author,
            "asin": book.asin,
            "url": book.url,
            "imageUrl": book.image_url,
        },
    }))
}

/// Shifts `date` by the region's UTC offset and formats it.
pub fn region_aware_date(date: NaiveDateTime, format: &str, region: AmazonRegion) -> Result<String> {
    let adjusted = date + region.utc_offset();

    let mut formatted = String::new();
    write!(formatted, "{}", adjusted.format(format))
        .map_err(|_| RenderError::InvalidDateFormat(format.to_string()))?;
    Ok(formatted)
}

/// Collapses runs of blank lines into a single blank line and trims the
/// result.
pub fn trim_multiple_lines(text: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    let mut previous_blank = false;

    for line in text.lines() {
        let blank = line.trim().is_empty();
        if blank && previous_blank {
            continue;
        }
        lines.push(if blank { "" } else { line });
        previous_blank = blank;
    }

    lines.join("\n").trim().to_string()
}
