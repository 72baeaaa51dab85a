//! # Core Configuration Module
//!
//! Configuration for the highlight sync core.
//!
//! ## Overview
//!
//! A builder assembles a [`CoreConfig`] holding the host collaborators and the
//! sync settings. Validation is fail-fast: a missing collaborator is reported
//! when the config is built, not halfway through a sync session.
//!
//! ## Required Collaborators
//!
//! - `LoginProvider` - interactive sign-in to the reading platform
//! - `HighlightScraper` - catalog and highlight extraction
//! - `NoteSyncManager` - selection policy and note reconciliation
//!
//! ## Optional Collaborators
//!
//! - `TemplateEngine` - only needed by hosts that render notes through
//!   `core-render`
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::CoreConfig;
//! use bridge_traits::{AmazonRegion, SyncMode};
//! use std::sync::Arc;
//!
//! let config = CoreConfig::builder()
//!     .login_provider(Arc::new(MyLoginModal))
//!     .scraper(Arc::new(MyNotebookScraper))
//!     .note_sync_manager(Arc::new(MyVaultWriter))
//!     .sync_mode(SyncMode::Amazon)
//!     .amazon_region(AmazonRegion::Germany)
//!     .build()?;
//! ```

use crate::error::{Error, Result};
use crate::events::DEFAULT_EVENT_BUFFER_SIZE;
use bridge_traits::{
    AmazonRegion, HighlightScraper, LoginProvider, NoteSyncManager, SyncMode, TemplateEngine,
};
use std::sync::Arc;

/// Upper bound for the event bus buffer.
pub const MAX_EVENT_BUFFER_SIZE: usize = 10_000;

/// Core configuration for the highlight sync core.
///
/// Use [`CoreConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct CoreConfig {
    pub login_provider: Arc<dyn LoginProvider>,

    pub scraper: Arc<dyn HighlightScraper>,

    pub note_sync_manager: Arc<dyn NoteSyncManager>,

    pub template_engine: Option<Arc<dyn TemplateEngine>>,

    /// Provider reported in `syncSessionStart`
    pub sync_mode: SyncMode,

    /// Storefront of the account, used for timestamp adjustment when rendering
    pub amazon_region: AmazonRegion,

    /// Buffer size of the event bus broadcast channel
    pub event_buffer_size: usize,

    /// User template for a single highlight
    pub highlight_template: Option<String>,
}

impl std::fmt::Debug for CoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreConfig")
            .field("login_provider", &"LoginProvider { ... }")
            .field("scraper", &"HighlightScraper { ... }")
            .field("note_sync_manager", &"NoteSyncManager { ... }")
            .field(
                "template_engine",
                &self
                    .template_engine
                    .as_ref()
                    .map(|_| "TemplateEngine { ... }"),
            )
            .field("sync_mode", &self.sync_mode)
            .field("amazon_region", &self.amazon_region)
            .field("event_buffer_size", &self.event_buffer_size)
            .field("highlight_template", &self.highlight_template)
            .finish()
    }
}

impl CoreConfig {
    pub fn builder() -> CoreConfigBuilder {
        CoreConfigBuilder::default()
    }

    /// Validates the settings.
    ///
    /// This checks:
    /// - The event buffer size is within `1..=MAX_EVENT_BUFFER_SIZE`
    /// - A highlight template, when given, is not blank
    /// - A highlight template is only given together with a template engine
    pub fn validate(&self) -> Result<()> {
        if self.event_buffer_size == 0 {
            return Err(Error::InvalidSetting {
                setting: "event_buffer_size",
                message: "must be greater than 0".to_string(),
            });
        }

        if self.event_buffer_size > MAX_EVENT_BUFFER_SIZE {
            return Err(Error::InvalidSetting {
                setting: "event_buffer_size",
                message: format!("exceeds maximum of {}", MAX_EVENT_BUFFER_SIZE),
            });
        }

        if let Some(template) = &self.highlight_template {
            if template.trim().is_empty() {
                return Err(Error::InvalidSetting {
                    setting: "highlight_template",
                    message: "cannot be blank".to_string(),
                });
            }

            if self.template_engine.is_none() {
                return Err(Error::CapabilityMissing {
                    capability: "TemplateEngine".to_string(),
                    message: "A highlight template was configured but no template engine \
                              was provided to render it. Use .template_engine() to set one."
                        .to_string(),
                });
            }
        }

        Ok(())
    }
}

/// Builder for [`CoreConfig`].
#[derive(Default)]
pub struct CoreConfigBuilder {
    login_provider: Option<Arc<dyn LoginProvider>>,
    scraper: Option<Arc<dyn HighlightScraper>>,
    note_sync_manager: Option<Arc<dyn NoteSyncManager>>,
    template_engine: Option<Arc<dyn TemplateEngine>>,
    sync_mode: SyncMode,
    amazon_region: AmazonRegion,
    event_buffer_size: Option<usize>,
    highlight_template: Option<String>,
}

impl CoreConfigBuilder {
    pub fn login_provider(mut self, provider: Arc<dyn LoginProvider>) -> Self {
        self.login_provider = Some(provider);
        self
    }

    pub fn scraper(mut self, scraper: Arc<dyn HighlightScraper>) -> Self {
        self.scraper = Some(scraper);
        self
    }

    pub fn note_sync_manager(mut self, manager: Arc<dyn NoteSyncManager>) -> Self {
        self.note_sync_manager = Some(manager);
        self
    }

    pub fn template_engine(mut self, engine: Arc<dyn TemplateEngine>) -> Self {
        self.template_engine = Some(engine);
        self
    }

    /// Default: [`SyncMode::Amazon`]
    pub fn sync_mode(mut self, mode: SyncMode) -> Self {
        self.sync_mode = mode;
        self
    }

    /// Default: [`AmazonRegion::Global`]
    pub fn amazon_region(mut self, region: AmazonRegion) -> Self {
        self.amazon_region = region;
        self
    }

    /// Default: [`DEFAULT_EVENT_BUFFER_SIZE`]
    pub fn event_buffer_size(mut self, size: usize) -> Self {
        self.event_buffer_size = Some(size);
        self
    }

    pub fn highlight_template(mut self, template: impl Into<String>) -> Self {
        self.highlight_template = Some(template.into());
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    ///
    /// - [`Error::CapabilityMissing`] when a required collaborator was not set
    /// - [`Error::InvalidSetting`] when a setting is out of range
    pub fn build(self) -> Result<CoreConfig> {
        let login_provider = self.login_provider.ok_or_else(|| Error::CapabilityMissing {
            capability: "LoginProvider".to_string(),
            message: "No login provider was supplied. The host must inject the interactive \
                      sign-in flow with .login_provider()."
                .to_string(),
        })?;

        let scraper = self.scraper.ok_or_else(|| Error::CapabilityMissing {
            capability: "HighlightScraper".to_string(),
            message: "No scraper was supplied. Use .scraper() to inject the component that \
                      reads the remote notebook."
                .to_string(),
        })?;

        let note_sync_manager = self.note_sync_manager.ok_or_else(|| Error::CapabilityMissing {
            capability: "NoteSyncManager".to_string(),
            message: "No note sync manager was supplied. Use .note_sync_manager() to inject \
                      the component that writes notes."
                .to_string(),
        })?;

        let config = CoreConfig {
            login_provider,
            scraper,
            note_sync_manager,
            template_engine: self.template_engine,
            sync_mode: self.sync_mode,
            amazon_region: self.amazon_region,
            event_buffer_size: self.event_buffer_size.unwrap_or(DEFAULT_EVENT_BUFFER_SIZE),
            highlight_template: self.highlight_template,
        };

        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::error::Result as BridgeResult;
    use bridge_traits::{Book, Diff, Highlight, KindleFile};
    use mockall::mock;

    mock! {
        pub Login {}

        #[async_trait]
        impl LoginProvider for Login {
            async fn login(&self) -> BridgeResult<bool>;
        }
    }

    mock! {
        pub Scraper {}

        #[async_trait]
        impl HighlightScraper for Scraper {
            async fn scrape_books(&self) -> BridgeResult<Vec<Book>>;
            async fn scrape_highlights_for_book(&self, book: &Book) -> BridgeResult<Vec<Highlight>>;
        }
    }

    struct NoopNotes;

    #[async_trait]
    impl NoteSyncManager for NoopNotes {
        fn filter_books_to_sync(&self, books: &[Book]) -> Vec<Book> {
            books.to_vec()
        }

        async fn sync_book(&self, _book: &Book, _highlights: &[Highlight]) -> BridgeResult<()> {
            Ok(())
        }

        async fn resync_book(
            &self,
            _file: &KindleFile,
            _remote_book: Option<&Book>,
            _highlights: &[Highlight],
        ) -> BridgeResult<Vec<Diff>> {
            Ok(Vec::new())
        }
    }

    mock! {
        pub Engine {}

        impl TemplateEngine for Engine {
            fn render(&self, template: &str, context: &serde_json::Value) -> BridgeResult<String>;
        }
    }

    fn complete_builder() -> CoreConfigBuilder {
        CoreConfig::builder()
            .login_provider(Arc::new(MockLogin::new()))
            .scraper(Arc::new(MockScraper::new()))
            .note_sync_manager(Arc::new(NoopNotes))
    }

    #[test]
    fn test_build_with_defaults() {
        let config = complete_builder().build().unwrap();

        assert_eq!(config.sync_mode, SyncMode::Amazon);
        assert_eq!(config.amazon_region, AmazonRegion::Global);
        assert_eq!(config.event_buffer_size, DEFAULT_EVENT_BUFFER_SIZE);
        assert!(config.template_engine.is_none());
        assert!(config.highlight_template.is_none());
    }

    #[test]
    fn test_missing_login_provider() {
        let result = CoreConfig::builder()
            .scraper(Arc::new(MockScraper::new()))
            .note_sync_manager(Arc::new(NoopNotes))
            .build();

        match result {
            Err(Error::CapabilityMissing { capability, .. }) => {
                assert_eq!(capability, "LoginProvider")
            }
            other => panic!("expected CapabilityMissing, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_scraper_and_note_manager() {
        let result = CoreConfig::builder()
            .login_provider(Arc::new(MockLogin::new()))
            .build();
        assert!(matches!(
            result,
            Err(Error::CapabilityMissing { ref capability, .. }) if capability == "HighlightScraper"
        ));

        let result = CoreConfig::builder()
            .login_provider(Arc::new(MockLogin::new()))
            .scraper(Arc::new(MockScraper::new()))
            .build();
        assert!(matches!(
            result,
            Err(Error::CapabilityMissing { ref capability, .. }) if capability == "NoteSyncManager"
        ));
    }

    #[test]
    fn test_event_buffer_bounds() {
        let zero = complete_builder().event_buffer_size(0).build();
        assert!(matches!(
            zero,
            Err(Error::InvalidSetting {
                setting: "event_buffer_size",
                ..
            })
        ));

        let huge = complete_builder()
            .event_buffer_size(MAX_EVENT_BUFFER_SIZE + 1)
            .build();
        assert!(huge.is_err());

        let config = complete_builder().event_buffer_size(512).build().unwrap();
        assert_eq!(config.event_buffer_size, 512);
    }

    #[test]
    fn test_template_requires_engine() {
        let result = complete_builder()
            .highlight_template("> {{ text }}")
            .build();
        assert!(matches!(result, Err(Error::CapabilityMissing { .. })));

        let config = complete_builder()
            .template_engine(Arc::new(MockEngine::new()))
            .highlight_template("> {{ text }}")
            .amazon_region(AmazonRegion::Japan)
            .sync_mode(SyncMode::MyClippings)
            .build()
            .unwrap();
        assert_eq!(config.highlight_template.as_deref(), Some("> {{ text }}"));
        assert_eq!(config.amazon_region, AmazonRegion::Japan);
        assert_eq!(config.sync_mode, SyncMode::MyClippings);
    }

    #[test]
    fn test_blank_template_rejected() {
        let result = complete_builder()
            .template_engine(Arc::new(MockEngine::new()))
            .highlight_template("   ")
            .build();
        assert!(matches!(
            result,
            Err(Error::InvalidSetting {
                setting: "highlight_template",
                ..
            })
        ));
    }

    #[test]
    fn test_debug_hides_collaborators() {
        let config = complete_builder().build().unwrap();
        let debug = format!("{:?}", config);
        assert!(debug.contains("LoginProvider { ... }"));
        assert!(debug.contains("event_buffer_size: 100"));
    }
}
