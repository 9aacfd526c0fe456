//! Internationalization (i18n): supported languages and how the active one
//! is chosen.
//!
//! # Architecture
//!
//! - `registry`: Single source of truth for supported languages and the default
//! - `language`: Validated `Language` type
//! - `resolver`: Picks the active language from URL, preference and locale
//! - `validator`: Sanity checks for a loaded content bundle
//!
//! # Example
//!
//! ```rust,ignore
//! use landing_i18n::i18n::{resolve, Language, ResolveInputs};
//!
//! let inputs = ResolveInputs {
//!     url: "https://example.com/en/".parse()?,
//!     stored_preference: None,
//!     browser_locale: Some("es-PE".to_string()),
//! };
//! assert_eq!(resolve(&inputs), Language::ENGLISH);
//! ```

mod language;
mod registry;
mod resolver;
mod validator;

pub use language::Language;
pub use registry::{LanguageConfig, LanguageRegistry};
pub use resolver::{resolve, resolve_with_source, ResolveInputs, ResolvedFrom};
pub use validator::{ContentValidator, ValidationReport};
