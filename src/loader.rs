//! Content bundle retrieval over HTTP.
//!
//! Each language's bundle lives at `{base}/{code}.json`. A single `fetch`
//! makes exactly one request; fallback between languages is decided by the
//! caller (see `Site::load`).

use crate::content::ContentDocument;
use crate::i18n::Language;
use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use url::Url;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Invalid content URL for '{language}': {source}")]
    InvalidUrl {
        language: Language,
        #[source]
        source: url::ParseError,
    },

    #[error("Request for '{language}' content failed: {source}")]
    Transport {
        language: Language,
        #[source]
        source: reqwest::Error,
    },

    #[error("Content for '{language}' returned HTTP {status}")]
    Status {
        language: Language,
        status: StatusCode,
    },

    #[error("Content for '{language}' is not a valid document: {source}")]
    Parse {
        language: Language,
        #[source]
        source: serde_json::Error,
    },
}

impl LoadError {
    /// The language whose bundle failed.
    pub fn language(&self) -> Language {
        match self {
            LoadError::InvalidUrl { language, .. }
            | LoadError::Transport { language, .. }
            | LoadError::Status { language, .. }
            | LoadError::Parse { language, .. } => *language,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ContentLoader {
    client: reqwest::Client,
    base_url: Url,
}

impl ContentLoader {
    /// Build a loader with a default client.
    pub fn new(base_url: Url) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Build a loader whose requests give up after `timeout`.
    pub fn with_timeout(base_url: Url, timeout: Duration) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: reqwest::Client, mut base_url: Url) -> Self {
        // Url::join replaces the last segment unless the base ends in '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Address of a language's bundle.
    pub fn content_url(&self, language: Language) -> Result<Url, LoadError> {
        self.base_url
            .join(&format!("{}.json", language.code()))
            .map_err(|source| LoadError::InvalidUrl { language, source })
    }

    /// Fetch and parse one language's bundle. Non-2xx statuses, transport
    /// failures and malformed bodies are all errors.
    pub async fn fetch(&self, language: Language) -> Result<ContentDocument, LoadError> {
        let url = self.content_url(language)?;
        debug!("Fetching '{}' content from {}", language, url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| LoadError::Transport { language, source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status { language, status });
        }

        let body = response
            .text()
            .await
            .map_err(|source| LoadError::Transport { language, source })?;

        ContentDocument::from_json(&body).map_err(|source| LoadError::Parse { language, source })
    }
}
