//! Render the localized page for a URL and print it as HTML.
//!
//! Required environment variables:
//! - CONTENT_BASE_URL
//!
//! Optional:
//! - PAGE_URL (defaults to http://localhost/)
//! - BROWSER_LOCALE (defaults to the OS locale)
//! - PREFERENCE_FILE (defaults to data/preference.json)
//! - SWITCHER_ID (defaults to language-switcher)
//! - REQUEST_TIMEOUT_SECS (defaults to 10)

use anyhow::{Context, Result};
use landing_i18n::config::Config;
use landing_i18n::loader::ContentLoader;
use landing_i18n::page::MemoryPage;
use landing_i18n::preference::FilePreferenceStore;
use landing_i18n::Site;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("landing_i18n=info".parse()?),
        )
        .init();

    let config = Config::from_env()?;
    let browser_locale = config.browser_locale.clone().or_else(sys_locale::get_locale);

    let loader = ContentLoader::with_timeout(config.content_base_url.clone(), config.request_timeout)
        .context("Failed to build HTTP client")?;
    let store = FilePreferenceStore::new(&config.preference_file);
    let mut site = Site::new(loader, store, MemoryPage::new()).with_switcher_id(&config.switcher_id);

    let language = site.resolve(&config.page_url, browser_locale.as_deref());
    info!("Resolved '{}' for {}", language, config.page_url);

    let loaded = site
        .load(language)
        .await
        .context("No content bundle could be loaded")?;

    // The page is shaped after the bundle so every field has a location.
    let scaffold = site
        .content()
        .map(|content| MemoryPage::scaffold(site.binding_table(), content.tree(), site.switcher_id()));
    if let Some(page) = scaffold {
        *site.page_mut() = page;
    }

    let report = site.render_all();
    site.refresh_switcher();
    info!(
        "Rendered '{}': {} fields bound, {} skipped ({})",
        loaded,
        report.bound,
        report.skipped,
        site.metrics().report().format()
    );

    println!("{}", site.page().to_html());
    Ok(())
}
