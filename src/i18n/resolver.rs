//! Language resolution from the signals available when a page is opened.
//!
//! Priority order, first match wins:
//! 1. first path segment of the page URL (`/en/...`)
//! 2. `lang` query parameter (`?lang=en`)
//! 3. stored preference
//! 4. first two characters of the browser locale (`en-US` -> `en`)
//! 5. the registry's fallback default

use crate::i18n::Language;
use tracing::debug;
use url::Url;

/// Everything resolution reads. Resolution never writes any of it.
#[derive(Debug, Clone)]
pub struct ResolveInputs {
    pub url: Url,
    pub stored_preference: Option<String>,
    pub browser_locale: Option<String>,
}

/// Which signal produced the resolved language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedFrom {
    PathSegment,
    QueryParameter,
    StoredPreference,
    BrowserLocale,
    Default,
}

/// Resolve the active language. Always succeeds.
pub fn resolve(inputs: &ResolveInputs) -> Language {
    let (language, source) = resolve_with_source(inputs);
    debug!("Resolved language '{}' from {:?}", language, source);
    language
}

/// Like [`resolve`], but also reports which signal won.
pub fn resolve_with_source(inputs: &ResolveInputs) -> (Language, ResolvedFrom) {
    if let Some(language) = from_path(&inputs.url) {
        return (language, ResolvedFrom::PathSegment);
    }

    if let Some(language) = from_query(&inputs.url) {
        return (language, ResolvedFrom::QueryParameter);
    }

    if let Some(language) = inputs
        .stored_preference
        .as_deref()
        .and_then(supported)
    {
        return (language, ResolvedFrom::StoredPreference);
    }

    if let Some(language) = inputs
        .browser_locale
        .as_deref()
        .and_then(|locale| locale.get(..2))
        .and_then(supported)
    {
        return (language, ResolvedFrom::BrowserLocale);
    }

    (Language::fallback(), ResolvedFrom::Default)
}

fn supported(code: &str) -> Option<Language> {
    Language::from_code(code).ok()
}

fn from_path(url: &Url) -> Option<Language> {
    url.path_segments()?.next().and_then(supported)
}

/// Only the first `lang` parameter is considered.
fn from_query(url: &Url) -> Option<Language> {
    url.query_pairs()
        .find(|(key, _)| key == "lang")
        .and_then(|(_, value)| supported(&value))
}
