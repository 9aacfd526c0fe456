use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::switcher::DEFAULT_SWITCHER_ID;

#[derive(Debug, Clone)]
pub struct Config {
    // Content
    pub content_base_url: Url,
    pub request_timeout: Duration,

    // Resolution inputs
    pub page_url: Url,
    pub browser_locale: Option<String>,
    pub preference_file: PathBuf,

    // Page
    pub switcher_id: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let content_base_url = std::env::var("CONTENT_BASE_URL")
            .context("CONTENT_BASE_URL not set")?;
        let page_url =
            std::env::var("PAGE_URL").unwrap_or_else(|_| "http://localhost/".to_string());

        Ok(Self {
            content_base_url: Url::parse(&content_base_url)
                .with_context(|| format!("CONTENT_BASE_URL is not a valid URL: {}", content_base_url))?,
            request_timeout: Duration::from_secs(
                std::env::var("REQUEST_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(10),
            ),

            page_url: Url::parse(&page_url)
                .with_context(|| format!("PAGE_URL is not a valid URL: {}", page_url))?,
            browser_locale: std::env::var("BROWSER_LOCALE")
                .ok()
                .filter(|v| !v.trim().is_empty()),
            preference_file: std::env::var("PREFERENCE_FILE")
                .unwrap_or_else(|_| "data/preference.json".to_string())
                .into(),

            switcher_id: std::env::var("SWITCHER_ID")
                .unwrap_or_else(|_| DEFAULT_SWITCHER_ID.to_string()),
        })
    }
}
