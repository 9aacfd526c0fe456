//! Localization layer for a static marketing page.
//!
//! Resolves the visitor's language, fetches the matching JSON content bundle
//! and binds it into the page through a data-driven binding table.

pub mod binding;
pub mod config;
pub mod content;
pub mod i18n;
pub mod loader;
pub mod metrics;
pub mod page;
pub mod preference;
pub mod renderer;
pub mod site;
pub mod switcher;

pub use i18n::Language;
pub use site::Site;
