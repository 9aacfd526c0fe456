//! Binding table: which document paths land in which page locations, and how.
//!
//! A binding pattern is a dotted path into the content tree. Two wildcard
//! segments are supported:
//! - `{i}` expands over every index of an array
//! - `{key}` expands over every key of an object
//!
//! Each expanded path is also the `data-i18n` address of the page location
//! that receives the value, so `sections.faq.items.{i}.question` binds
//! `items[2].question` into `data-i18n="sections.faq.items.2.question"`.

use serde_json::Value;
use std::sync::OnceLock;

/// How a value is written into its location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindKind {
    /// Plain text content, never interpreted as markup.
    Text,
    /// Plain text wrapped in literal quotation marks.
    Quoted,
    /// Raw markup fragment, trusted as authored.
    Markup,
    /// String list; the location's children are replaced by one `<li>` each.
    List,
    /// The document title.
    Title,
    /// `<meta name="..." content="...">`.
    Meta(&'static str),
    /// The root element's `lang` attribute.
    DocumentLang,
}

impl BindKind {
    /// Whether the binding targets an addressable page element (as opposed
    /// to document metadata).
    pub fn targets_element(&self) -> bool {
        matches!(
            self,
            BindKind::Text | BindKind::Quoted | BindKind::Markup | BindKind::List
        )
    }
}

#[derive(Debug, Clone)]
pub struct Binding {
    pub pattern: String,
    pub kind: BindKind,
}

impl Binding {
    fn new(pattern: impl Into<String>, kind: BindKind) -> Self {
        Self {
            pattern: pattern.into(),
            kind,
        }
    }
}

/// One logical page section. The pass is skipped entirely when its root
/// path is absent from the document.
#[derive(Debug, Clone)]
pub struct BindingPass {
    pub name: &'static str,
    pub root: Option<String>,
    pub bindings: Vec<Binding>,
}

#[derive(Debug, Clone)]
pub struct BindingTable {
    passes: Vec<BindingPass>,
}

static STANDARD: OnceLock<BindingTable> = OnceLock::new();

/// Content sections in render order, with the item fields each one binds.
const SECTIONS: &[(&str, &[(&str, BindKind)])] = &[
    (
        "problem",
        &[("title", BindKind::Text), ("description", BindKind::Text)],
    ),
    (
        "solution",
        &[("title", BindKind::Text), ("description", BindKind::Text)],
    ),
    (
        "features",
        &[
            ("icon", BindKind::Text),
            ("title", BindKind::Text),
            ("description", BindKind::Text),
        ],
    ),
    (
        "metrics",
        &[("value", BindKind::Text), ("label", BindKind::Text)],
    ),
    (
        "process",
        &[
            ("step", BindKind::Text),
            ("title", BindKind::Text),
            ("description", BindKind::Text),
        ],
    ),
    (
        "roadmap",
        &[
            ("phase", BindKind::Text),
            ("title", BindKind::Text),
            ("description", BindKind::Text),
            ("deliverables", BindKind::List),
        ],
    ),
    (
        "testimonials",
        &[
            ("quote", BindKind::Quoted),
            ("author", BindKind::Text),
            ("role", BindKind::Text),
            ("company", BindKind::Text),
        ],
    ),
    (
        "cases",
        &[
            ("client", BindKind::Text),
            ("industry", BindKind::Text),
            ("challenge", BindKind::Text),
            ("results", BindKind::List),
        ],
    ),
    (
        "faq",
        &[("question", BindKind::Text), ("answer", BindKind::Text)],
    ),
    ("cta", &[("text", BindKind::Text)]),
];

/// The one section field bound as raw markup.
pub const STATEMENT_PATH: &str = "sections.solution.statement";

impl BindingTable {
    pub fn new(passes: Vec<BindingPass>) -> Self {
        Self { passes }
    }

    /// The table matching the marketing page's `data-i18n` contract.
    /// Built on first use and shared afterwards.
    pub fn standard() -> &'static BindingTable {
        STANDARD.get_or_init(build_standard)
    }

    pub fn passes(&self) -> &[BindingPass] {
        &self.passes
    }

    pub fn pass(&self, name: &str) -> Option<&BindingPass> {
        self.passes.iter().find(|pass| pass.name == name)
    }
}

fn build_standard() -> BindingTable {
    let mut passes = vec![
        BindingPass {
            name: "metadata",
            root: None,
            bindings: vec![
                Binding::new("lang", BindKind::DocumentLang),
                Binding::new("meta.title", BindKind::Title),
                Binding::new("meta.description", BindKind::Meta("description")),
                Binding::new("meta.keywords", BindKind::Meta("keywords")),
            ],
        },
        BindingPass {
            name: "navigation",
            root: Some("nav".to_string()),
            bindings: vec![Binding::new("nav.{key}", BindKind::Text)],
        },
        BindingPass {
            name: "hero",
            root: Some("hero".to_string()),
            bindings: vec![
                Binding::new("hero.tag", BindKind::Text),
                Binding::new("hero.title", BindKind::Text),
                Binding::new("hero.subtitle", BindKind::Text),
                Binding::new("hero.trustedBy", BindKind::Text),
                Binding::new("hero.buttons.{i}.text", BindKind::Text),
            ],
        },
    ];

    for (name, item_fields) in SECTIONS {
        let root = format!("sections.{}", name);
        let mut bindings = vec![
            Binding::new(format!("{}.tag", root), BindKind::Text),
            Binding::new(format!("{}.title", root), BindKind::Text),
            Binding::new(format!("{}.subtitle", root), BindKind::Text),
        ];
        if *name == "solution" {
            bindings.push(Binding::new(STATEMENT_PATH, BindKind::Markup));
        }
        for (field, kind) in item_fields.iter() {
            bindings.push(Binding::new(format!("{}.items.{{i}}.{}", root, field), *kind));
        }
        passes.push(BindingPass {
            name: *name,
            root: Some(root),
            bindings,
        });
    }

    passes.push(BindingPass {
        name: "footer",
        root: Some("footer".to_string()),
        bindings: vec![
            Binding::new("footer.tagline", BindKind::Text),
            Binding::new("footer.company.description", BindKind::Text),
            Binding::new("footer.contact.location", BindKind::Text),
            Binding::new("footer.copyright", BindKind::Text),
        ],
    });

    BindingTable::new(passes)
}

/// Follow a literal dotted path. Wildcards are not allowed here.
pub fn lookup<'a>(tree: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(tree, |node, segment| match node {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// Expand a binding pattern against the tree into concrete
/// `(address, value)` pairs, in document order.
pub fn expand<'a>(pattern: &str, tree: &'a Value) -> Vec<(String, &'a Value)> {
    let segments: Vec<&str> = pattern.split('.').collect();
    let mut out = Vec::new();
    expand_into(&segments, tree, String::new(), &mut out);
    out
}

fn expand_into<'a>(
    segments: &[&str],
    node: &'a Value,
    prefix: String,
    out: &mut Vec<(String, &'a Value)>,
) {
    let Some((segment, rest)) = segments.split_first() else {
        out.push((prefix, node));
        return;
    };

    let join = |part: &str| {
        if prefix.is_empty() {
            part.to_string()
        } else {
            format!("{}.{}", prefix, part)
        }
    };

    match (*segment, node) {
        ("{i}", Value::Array(items)) => {
            for (index, item) in items.iter().enumerate() {
                expand_into(rest, item, join(&index.to_string()), out);
            }
        }
        ("{key}", Value::Object(map)) => {
            for (key, value) in map {
                expand_into(rest, value, join(key), out);
            }
        }
        ("{i}" | "{key}", _) => {}
        (literal, Value::Object(map)) => {
            if let Some(child) = map.get(literal) {
                expand_into(rest, child, join(literal), out);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // ==================== Expansion Tests ====================

    #[test]
    fn test_expand_literal_path() {
        let tree = json!({ "hero": { "title": "Hi" } });
        let expanded = expand("hero.title", &tree);

        assert_eq!(expanded.len(), 1);
        assert_eq!(expanded[0].0, "hero.title");
        assert_eq!(expanded[0].1, "Hi");
    }

    #[test]
    fn test_expand_index_wildcard_in_order() {
        let tree = json!({ "hero": { "buttons": [{ "text": "A" }, { "text": "B" }] } });
        let expanded = expand("hero.buttons.{i}.text", &tree);

        let addresses: Vec<_> = expanded.iter().map(|(path, _)| path.as_str()).collect();
        assert_eq!(addresses, vec!["hero.buttons.0.text", "hero.buttons.1.text"]);
        assert_eq!(expanded[1].1, "B");
    }

    #[test]
    fn test_expand_key_wildcard() {
        let tree = json!({ "nav": { "faq": "FAQ", "about": "About" } });
        let expanded = expand("nav.{key}", &tree);

        let addresses: Vec<_> = expanded.iter().map(|(path, _)| path.as_str()).collect();
        assert_eq!(addresses, vec!["nav.about", "nav.faq"]);
    }

    #[test]
    fn test_expand_missing_path_yields_nothing() {
        let tree = json!({ "hero": {} });
        assert!(expand("hero.title", &tree).is_empty());
        assert!(expand("sections.faq.items.{i}.question", &tree).is_empty());
    }

    #[test]
    fn test_expand_wildcard_over_wrong_type_yields_nothing() {
        let tree = json!({ "nav": "not a map", "hero": { "buttons": {} } });
        assert!(expand("nav.{key}", &tree).is_empty());
        assert!(expand("hero.buttons.{i}.text", &tree).is_empty());
    }

    #[test]
    fn test_expand_skips_items_without_field() {
        let tree = json!({ "items": [{ "q": "one" }, {}, { "q": "three" }] });
        let addresses: Vec<_> = expand("items.{i}.q", &tree)
            .into_iter()
            .map(|(path, _)| path)
            .collect();
        assert_eq!(addresses, vec!["items.0.q", "items.2.q"]);
    }

    // ==================== Lookup Tests ====================

    #[test]
    fn test_lookup() {
        let tree = json!({ "sections": { "faq": { "items": [{ "q": "x" }] } } });
        assert!(lookup(&tree, "sections.faq").is_some());
        assert_eq!(lookup(&tree, "sections.faq.items.0.q").unwrap(), "x");
        assert!(lookup(&tree, "sections.cases").is_none());
        assert!(lookup(&tree, "sections.faq.items.5").is_none());
    }

    // ==================== Standard Table Tests ====================

    #[test]
    fn test_standard_table_pass_order() {
        let names: Vec<_> = BindingTable::standard()
            .passes()
            .iter()
            .map(|pass| pass.name)
            .collect();

        assert_eq!(names.first(), Some(&"metadata"));
        assert_eq!(names[1], "navigation");
        assert_eq!(names[2], "hero");
        assert_eq!(names.last(), Some(&"footer"));
        assert!(names.contains(&"testimonials"));
    }

    #[test]
    fn test_standard_table_has_single_markup_binding() {
        let markup: Vec<_> = BindingTable::standard()
            .passes()
            .iter()
            .flat_map(|pass| pass.bindings.iter())
            .filter(|binding| binding.kind == BindKind::Markup)
            .collect();

        assert_eq!(markup.len(), 1);
        assert_eq!(markup[0].pattern, STATEMENT_PATH);
    }

    #[test]
    fn test_testimonial_quotes_are_quoted() {
        let pass = BindingTable::standard().pass("testimonials").unwrap();
        let quote = pass
            .bindings
            .iter()
            .find(|binding| binding.pattern.ends_with(".quote"))
            .unwrap();
        assert_eq!(quote.pattern, "sections.testimonials.items.{i}.quote");
        assert_eq!(quote.kind, BindKind::Quoted);
    }

    #[test]
    fn test_metadata_pass_has_no_root() {
        let pass = BindingTable::standard().pass("metadata").unwrap();
        assert!(pass.root.is_none());
        assert!(pass.bindings.iter().all(|b| !b.kind.targets_element()));
    }
}
