//! The localized site: owns current language, current content, the
//! preference store and the page, and exposes the resolve / load / render /
//! switch operations over them.
//!
//! Every mutating operation takes `&mut self`, so two loads can never be in
//! flight against the same site.

use crate::binding::BindingTable;
use crate::content::ContentDocument;
use crate::i18n::{resolve, ContentValidator, Language, ResolveInputs};
use crate::loader::{ContentLoader, LoadError};
use crate::metrics::LoadMetrics;
use crate::page::{NodeId, Page};
use crate::preference::PreferenceStore;
use crate::renderer::{render, RenderReport};
use crate::switcher::{language_for_click, mark_active, DEFAULT_SWITCHER_ID};
use serde_json::Value;
use tracing::{debug, error, info, warn};
use url::Url;

/// A successfully loaded bundle. Immutable; a new load replaces it whole.
#[derive(Debug, Clone)]
pub struct LoadedContent {
    language: Language,
    document: ContentDocument,
    tree: Value,
}

impl LoadedContent {
    fn new(language: Language, document: ContentDocument) -> Self {
        let tree = document.to_tree();
        Self {
            language,
            document,
            tree,
        }
    }

    /// The language this bundle was loaded for.
    pub fn language(&self) -> Language {
        self.language
    }

    pub fn document(&self) -> &ContentDocument {
        &self.document
    }

    /// The document as the JSON tree the binding table walks.
    pub fn tree(&self) -> &Value {
        &self.tree
    }
}

pub struct Site<P: Page, S: PreferenceStore> {
    loader: ContentLoader,
    store: S,
    page: P,
    table: &'static BindingTable,
    switcher_id: String,
    current_language: Language,
    content: Option<LoadedContent>,
    metrics: LoadMetrics,
}

impl<P: Page, S: PreferenceStore> Site<P, S> {
    pub fn new(loader: ContentLoader, store: S, page: P) -> Self {
        Self {
            loader,
            store,
            page,
            table: BindingTable::standard(),
            switcher_id: DEFAULT_SWITCHER_ID.to_string(),
            current_language: Language::fallback(),
            content: None,
            metrics: LoadMetrics::new(),
        }
    }

    pub fn with_switcher_id(mut self, id: &str) -> Self {
        self.switcher_id = id.to_string();
        self
    }

    pub fn with_binding_table(mut self, table: &'static BindingTable) -> Self {
        self.table = table;
        self
    }

    // ==================== Accessors ====================

    pub fn current_language(&self) -> Language {
        self.current_language
    }

    /// The current bundle, or `None` if no load has succeeded yet.
    pub fn content(&self) -> Option<&LoadedContent> {
        self.content.as_ref()
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut P {
        &mut self.page
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn metrics(&self) -> &LoadMetrics {
        &self.metrics
    }

    pub fn binding_table(&self) -> &'static BindingTable {
        self.table
    }

    pub fn switcher_id(&self) -> &str {
        &self.switcher_id
    }

    // ==================== Operations ====================

    /// Resolve the language for `url` using the stored preference and the
    /// given browser locale. Read-only.
    pub fn resolve(&self, url: &Url, browser_locale: Option<&str>) -> Language {
        resolve(&ResolveInputs {
            url: url.clone(),
            stored_preference: self.store.load(),
            browser_locale: browser_locale.map(str::to_string),
        })
    }

    /// Page-ready sequence: resolve, load, render, mark the active control.
    ///
    /// If no bundle can be loaded the page is left untouched and the error
    /// is returned.
    pub async fn start(&mut self, url: &Url, browser_locale: Option<&str>) -> Result<Language, LoadError> {
        let language = self.resolve(url, browser_locale);
        info!("Starting site in '{}'", language);

        let loaded = self.load(language).await?;
        self.render_all();
        mark_active(&mut self.page, &self.switcher_id, self.current_language);
        Ok(loaded)
    }

    /// Load `language`'s bundle, falling back once to the default language.
    ///
    /// On success the loaded language is stored as the preference, becomes
    /// the current language and its document replaces the current content.
    /// Returns the language actually loaded. When the default language
    /// fails too, the error is terminal and current content is kept as is.
    pub async fn load(&mut self, language: Language) -> Result<Language, LoadError> {
        let first = self.attempt(language).await;
        let primary = match first {
            Ok(document) => return Ok(self.accept(language, document)),
            Err(e) => e,
        };
        warn!("Failed to load '{}' content: {}", language, primary);

        let fallback = Language::fallback();
        if language == fallback {
            error!("Default language content unavailable, leaving content as is");
            return Err(primary);
        }

        info!("Falling back to '{}' content", fallback);
        self.metrics.record_fallback();
        let second = self.attempt(fallback).await;
        match second {
            Ok(document) => Ok(self.accept(fallback, document)),
            Err(e) => {
                error!("Fallback to '{}' failed: {}", fallback, e);
                Err(e)
            }
        }
    }

    /// Bind the current content into the page. Does nothing at all when no
    /// content has been loaded.
    pub fn render_all(&mut self) -> RenderReport {
        let Some(content) = &self.content else {
            debug!("No content loaded, render skipped");
            return RenderReport::default();
        };

        let report = render(self.table, &content.tree, &mut self.page);
        self.metrics.record_render();
        debug!(
            "Rendered '{}': {} bound, {} skipped, {} passes skipped",
            content.language, report.bound, report.skipped, report.passes_skipped
        );
        report
    }

    /// Switch to `language`: load, render, update the active control.
    ///
    /// Returns `Ok(false)` without fetching when `language` is already
    /// current. A failed load is returned before anything is rendered and
    /// leaves the current language as it was, so the switch can be retried.
    pub async fn switch_language(&mut self, language: Language) -> Result<bool, LoadError> {
        if language == self.current_language {
            debug!("Already showing '{}', switch ignored", language);
            return Ok(false);
        }

        info!("Switching language {} -> {}", self.current_language, language);
        self.load(language).await?;
        self.render_all();
        mark_active(&mut self.page, &self.switcher_id, self.current_language);
        Ok(true)
    }

    /// Delegated click handler for the switcher container. Clicks that do
    /// not land on a supported control are ignored.
    pub async fn handle_click(&mut self, target: NodeId) -> Result<bool, LoadError> {
        match language_for_click(&self.page, &self.switcher_id, target) {
            Some(language) => self.switch_language(language).await,
            None => Ok(false),
        }
    }

    /// Update the active indicator for the current language without
    /// reloading anything.
    pub fn refresh_switcher(&mut self) -> usize {
        mark_active(&mut self.page, &self.switcher_id, self.current_language)
    }

    async fn attempt(&self, language: Language) -> Result<ContentDocument, LoadError> {
        self.metrics.record_fetch();
        self.loader.fetch(language).await.inspect_err(|_| {
            self.metrics.record_failure();
        })
    }

    fn accept(&mut self, language: Language, document: ContentDocument) -> Language {
        let report = ContentValidator::validate(language, &document, self.table);
        for message in &report.errors {
            warn!("Content '{}': {}", language, message);
        }
        for message in &report.warnings {
            debug!("Content '{}': {}", language, message);
        }

        if let Err(e) = self.store.save(language.code()) {
            warn!("Failed to store language preference: {}", e);
        }

        self.current_language = language;
        self.content = Some(LoadedContent::new(language, document));
        info!("Loaded '{}' content", language);
        language
    }
}
