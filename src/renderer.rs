//! Full-page render: walk the binding table and write every value the
//! document has into the page location addressed by its path.

use crate::binding::{expand, lookup, BindKind, BindingTable};
use crate::page::Page;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// Tag used for entries of a `List` binding.
const LIST_ITEM_TAG: &str = "li";

/// Outcome of a render pass, for logging and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenderReport {
    /// Values written into the page
    pub bound: usize,
    /// Values with no matching page location (or an unusable shape)
    pub skipped: usize,
    /// Passes skipped because their section is absent from the document
    pub passes_skipped: usize,
}

/// Bind `tree` into `page` following `table`, pass by pass, in table order.
pub fn render<P: Page + ?Sized>(table: &BindingTable, tree: &Value, page: &mut P) -> RenderReport {
    let mut report = RenderReport::default();

    for pass in table.passes() {
        if let Some(root) = &pass.root {
            if lookup(tree, root).is_none() {
                debug!("Skipping '{}' pass: section absent", pass.name);
                report.passes_skipped += 1;
                continue;
            }
        }

        for binding in &pass.bindings {
            for (path, value) in expand(&binding.pattern, tree) {
                if apply(binding.kind, &path, value, page) {
                    report.bound += 1;
                } else {
                    report.skipped += 1;
                }
            }
        }
    }

    report
}

/// Write one value. Returns `false` when nothing was written.
fn apply<P: Page + ?Sized>(kind: BindKind, path: &str, value: &Value, page: &mut P) -> bool {
    match kind {
        BindKind::Text | BindKind::Quoted | BindKind::Markup => {
            let (Some(text), Some(node)) = (value.as_str(), page.find(path)) else {
                return false;
            };
            match kind {
                BindKind::Markup => page.set_markup(node, text),
                BindKind::Quoted => page.set_text(node, &format!("\"{}\"", text)),
                _ => page.set_text(node, text),
            }
            true
        }
        BindKind::List => {
            let (Some(items), Some(node)) = (string_list(value), page.find(path)) else {
                return false;
            };
            page.replace_children(node, LIST_ITEM_TAG, &items);
            true
        }
        BindKind::Title => match value.as_str() {
            Some(title) => {
                page.set_title(title);
                true
            }
            None => false,
        },
        BindKind::Meta(name) => value
            .as_str()
            .map(|content| page.set_meta(name, content))
            .unwrap_or(false),
        BindKind::DocumentLang => match value.as_str() {
            Some(lang) => {
                page.set_document_lang(lang);
                true
            }
            None => false,
        },
    }
}

fn string_list(value: &Value) -> Option<Vec<String>> {
    value
        .as_array()?
        .iter()
        .map(|item| item.as_str().map(str::to_string))
        .collect()
}
