//! Content bundle validation.
//!
//! Checks a freshly loaded document against the language it was requested
//! for and the binding table it will be rendered with. Nothing here blocks
//! rendering; the report is only logged.

use crate::binding::{lookup, BindKind, BindingTable};
use crate::content::ContentDocument;
use crate::i18n::Language;
use regex::Regex;
use std::sync::OnceLock;

/// Validation report containing errors and warnings about a bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// Problems that make the bundle wrong for the requested language
    pub errors: Vec<String>,

    /// Gaps that will leave template content visible
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn is_clean(&self) -> bool {
        !self.has_errors() && !self.has_warnings()
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

pub struct ContentValidator;

static SCRIPT_REGEX: OnceLock<Regex> = OnceLock::new();
static HANDLER_REGEX: OnceLock<Regex> = OnceLock::new();

impl ContentValidator {
    /// Validate `document` as the bundle for `requested`.
    ///
    /// Errors:
    /// - `lang` differs from the requested code
    ///
    /// Warnings:
    /// - `lang` is missing
    /// - a section the table binds is absent
    /// - a raw-markup field contains `<script>` or inline event handlers
    pub fn validate(
        requested: Language,
        document: &ContentDocument,
        table: &BindingTable,
    ) -> ValidationReport {
        let mut report = ValidationReport::new();

        match document.lang.as_deref() {
            Some(lang) if lang == requested.code() => {}
            Some(lang) => report.errors.push(format!(
                "Bundle declares lang '{}' but was loaded for '{}'",
                lang,
                requested.code()
            )),
            None => report
                .warnings
                .push("Bundle has no 'lang'; root language attribute will not update".to_string()),
        }

        let tree = document.to_tree();
        for pass in table.passes() {
            if let Some(root) = &pass.root {
                if lookup(&tree, root).is_none() {
                    report
                        .warnings
                        .push(format!("Missing '{}' section ({})", pass.name, root));
                }
            }

            for binding in pass.bindings.iter().filter(|b| b.kind == BindKind::Markup) {
                if let Some(markup) = lookup(&tree, &binding.pattern).and_then(|v| v.as_str()) {
                    if Self::has_active_content(markup) {
                        report.warnings.push(format!(
                            "Markup field '{}' contains script or event handlers",
                            binding.pattern
                        ));
                    }
                }
            }
        }

        report
    }

    /// Whether a markup fragment carries executable content.
    fn has_active_content(markup: &str) -> bool {
        let script = SCRIPT_REGEX
            .get_or_init(|| Regex::new(r"(?i)<\s*script\b").expect("valid script regex"));
        let handler = HANDLER_REGEX
            .get_or_init(|| Regex::new(r#"(?i)<[^>]*\son[a-z]+\s*="#).expect("valid handler regex"));

        script.is_match(markup) || handler.is_match(markup)
    }
}
