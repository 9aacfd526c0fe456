//! Page surface the renderer and switcher write into.
//!
//! `Page` is the seam between the binding logic and whatever owns the real
//! document. `MemoryPage` is an in-process element tree with the same
//! addressing rules (`data-i18n`, `data-lang`, element ids) that can be
//! serialized to HTML.

use crate::binding::{expand, BindKind, BindingTable};
use crate::i18n::Language;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Attribute carrying a location's dotted field path.
pub const FIELD_ATTRIBUTE: &str = "data-i18n";

/// Attribute carrying a switcher control's language code.
pub const LANGUAGE_ATTRIBUTE: &str = "data-lang";

pub const ACTIVE_CLASS: &str = "active";

/// Handle to an element of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

pub trait Page {
    /// Find the element whose `data-i18n` equals `path`.
    fn find(&self, path: &str) -> Option<NodeId>;

    /// Replace the element's content with plain text.
    fn set_text(&mut self, node: NodeId, text: &str);

    /// Replace the element's content with a markup fragment, unescaped.
    fn set_markup(&mut self, node: NodeId, markup: &str);

    /// Drop every child and append one `tag` element per item, each holding
    /// that item as plain text.
    fn replace_children(&mut self, node: NodeId, tag: &str, items: &[String]);

    fn set_title(&mut self, title: &str);

    /// Update `<meta name=...>`. Returns `false` when the page has no such tag.
    fn set_meta(&mut self, name: &str, content: &str) -> bool;

    fn set_document_lang(&mut self, lang: &str);

    fn element_by_id(&self, id: &str) -> Option<NodeId>;

    fn attribute(&self, node: NodeId, name: &str) -> Option<&str>;

    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Descendants of `root` carrying attribute `name`, in document order.
    fn descendants_with_attribute(&self, root: NodeId, name: &str) -> Vec<NodeId>;

    fn set_class(&mut self, node: NodeId, class: &str, enabled: bool);
}

#[derive(Debug, Clone)]
enum Content {
    Text(String),
    Markup(String),
    Children(Vec<NodeId>),
}

#[derive(Debug, Clone)]
struct Element {
    tag: String,
    attributes: BTreeMap<String, String>,
    classes: BTreeSet<String>,
    content: Content,
    parent: Option<NodeId>,
}

impl Element {
    fn new(tag: &str, parent: Option<NodeId>) -> Self {
        Self {
            tag: tag.to_string(),
            attributes: BTreeMap::new(),
            classes: BTreeSet::new(),
            content: Content::Children(Vec::new()),
            parent,
        }
    }
}

/// In-memory page. Elements live in an arena; detached elements stay in the
/// arena but are no longer reachable from the body.
#[derive(Debug, Clone)]
pub struct MemoryPage {
    elements: Vec<Element>,
    title: String,
    metas: BTreeMap<String, String>,
    document_lang: String,
    mutations: usize,
}

impl Default for MemoryPage {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryPage {
    /// An empty page with just a `<body>`.
    pub fn new() -> Self {
        Self {
            elements: vec![Element::new("body", None)],
            title: String::new(),
            metas: BTreeMap::new(),
            document_lang: String::new(),
            mutations: 0,
        }
    }

    pub fn body(&self) -> NodeId {
        NodeId(0)
    }

    // ==================== Building ====================

    /// Append a new, empty element. Building a page does not count as a
    /// mutation.
    pub fn append_element(&mut self, parent: NodeId, tag: &str) -> NodeId {
        let id = NodeId(self.elements.len());
        self.elements.push(Element::new(tag, Some(parent)));
        let parent_element = &mut self.elements[parent.0];
        match &mut parent_element.content {
            Content::Children(children) => children.push(id),
            other => *other = Content::Children(vec![id]),
        }
        id
    }

    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        self.elements[node.0]
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    /// Append an addressable location holding template text.
    pub fn add_field(&mut self, tag: &str, path: &str, template: &str) -> NodeId {
        let body = self.body();
        let node = self.append_element(body, tag);
        self.set_attribute(node, FIELD_ATTRIBUTE, path);
        self.elements[node.0].content = Content::Text(template.to_string());
        node
    }

    /// Append an addressable `<ul>` with `template_items` placeholder `<li>`s.
    pub fn add_list(&mut self, path: &str, template_items: usize) -> NodeId {
        let body = self.body();
        let list = self.append_element(body, "ul");
        self.set_attribute(list, FIELD_ATTRIBUTE, path);
        for index in 0..template_items {
            let item = self.append_element(list, "li");
            self.elements[item.0].content = Content::Text(format!("item {}", index + 1));
        }
        list
    }

    /// Declare a `<meta name=...>` tag so renders can update it.
    pub fn add_meta(&mut self, name: &str) {
        self.metas.entry(name.to_string()).or_default();
    }

    /// Append the language switcher: a container with `id` holding one
    /// `<button data-lang=...>` per language, labelled with its native name.
    pub fn add_switcher(&mut self, id: &str, languages: &[Language]) -> NodeId {
        let body = self.body();
        let container = self.append_element(body, "nav");
        self.set_attribute(container, "id", id);
        for language in languages {
            let button = self.append_element(container, "button");
            self.set_attribute(button, LANGUAGE_ATTRIBUTE, language.code());
            self.elements[button.0].content = Content::Text(language.native_name().to_string());
        }
        container
    }

    /// Build a page with one location for every address `table` expands to
    /// in `tree`, every meta tag it writes, and a switcher for all enabled
    /// languages.
    pub fn scaffold(table: &BindingTable, tree: &Value, switcher_id: &str) -> Self {
        let mut page = Self::new();
        for pass in table.passes() {
            for binding in &pass.bindings {
                match binding.kind {
                    BindKind::Meta(name) => page.add_meta(name),
                    BindKind::List => {
                        for (path, _) in expand(&binding.pattern, tree) {
                            page.add_list(&path, 0);
                        }
                    }
                    BindKind::Markup => {
                        for (path, _) in expand(&binding.pattern, tree) {
                            page.add_field("div", &path, "");
                        }
                    }
                    BindKind::Text | BindKind::Quoted => {
                        for (path, _) in expand(&binding.pattern, tree) {
                            page.add_field("span", &path, "");
                        }
                    }
                    BindKind::Title | BindKind::DocumentLang => {}
                }
            }
        }
        let languages: Vec<Language> = crate::i18n::LanguageRegistry::get()
            .list_enabled()
            .iter()
            .filter_map(|config| Language::from_code(config.code).ok())
            .collect();
        page.add_switcher(switcher_id, &languages);
        page
    }

    // ==================== Inspection ====================

    /// Number of writes made through the `Page` trait.
    pub fn mutations(&self) -> usize {
        self.mutations
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn meta(&self, name: &str) -> Option<&str> {
        self.metas.get(name).map(String::as_str)
    }

    pub fn document_lang(&self) -> &str {
        &self.document_lang
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        match &self.elements[node.0].content {
            Content::Children(children) => children.clone(),
            _ => Vec::new(),
        }
    }

    pub fn tag(&self, node: NodeId) -> &str {
        &self.elements[node.0].tag
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.elements[node.0].classes.contains(class)
    }

    /// Text content as a browser would report it: markup is returned as
    /// authored, children are concatenated.
    pub fn text(&self, node: NodeId) -> String {
        match &self.elements[node.0].content {
            Content::Text(text) | Content::Markup(text) => text.clone(),
            Content::Children(children) => children.iter().map(|child| self.text(*child)).collect(),
        }
    }

    /// Serialized content of the element.
    pub fn inner_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_content(node, &mut out);
        out
    }

    /// Serialize the whole document.
    pub fn to_html(&self) -> String {
        let mut out = String::from("<!DOCTYPE html>\n");
        out.push_str(&format!(
            "<html lang=\"{}\">\n<head>\n<title>{}</title>\n",
            escape_attribute(&self.document_lang),
            escape_text(&self.title)
        ));
        for (name, content) in &self.metas {
            out.push_str(&format!(
                "<meta name=\"{}\" content=\"{}\">\n",
                escape_attribute(name),
                escape_attribute(content)
            ));
        }
        out.push_str("</head>\n");
        self.write_element(self.body(), &mut out);
        out.push_str("\n</html>\n");
        out
    }

    fn write_element(&self, node: NodeId, out: &mut String) {
        let element = &self.elements[node.0];
        out.push('<');
        out.push_str(&element.tag);
        for (name, value) in &element.attributes {
            out.push_str(&format!(" {}=\"{}\"", name, escape_attribute(value)));
        }
        if !element.classes.is_empty() {
            let classes: Vec<&str> = element.classes.iter().map(String::as_str).collect();
            out.push_str(&format!(" class=\"{}\"", escape_attribute(&classes.join(" "))));
        }
        out.push('>');
        self.write_content(node, out);
        out.push_str(&format!("</{}>", element.tag));
    }

    fn write_content(&self, node: NodeId, out: &mut String) {
        match &self.elements[node.0].content {
            Content::Text(text) => out.push_str(&escape_text(text)),
            Content::Markup(markup) => out.push_str(markup),
            Content::Children(children) => {
                for child in children {
                    self.write_element(*child, out);
                }
            }
        }
    }

    fn is_attached(&self, node: NodeId) -> bool {
        let mut current = node;
        loop {
            if current == self.body() {
                return true;
            }
            match self.elements[current.0].parent {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    fn detach_children(&mut self, node: NodeId) {
        if let Content::Children(children) = &self.elements[node.0].content {
            for child in children.clone() {
                self.elements[child.0].parent = None;
            }
        }
    }
}

impl Page for MemoryPage {
    fn find(&self, path: &str) -> Option<NodeId> {
        (0..self.elements.len()).map(NodeId).find(|node| {
            self.elements[node.0].attributes.get(FIELD_ATTRIBUTE).map(String::as_str) == Some(path)
                && self.is_attached(*node)
        })
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        self.detach_children(node);
        self.elements[node.0].content = Content::Text(text.to_string());
        self.mutations += 1;
    }

    fn set_markup(&mut self, node: NodeId, markup: &str) {
        self.detach_children(node);
        self.elements[node.0].content = Content::Markup(markup.to_string());
        self.mutations += 1;
    }

    fn replace_children(&mut self, node: NodeId, tag: &str, items: &[String]) {
        self.detach_children(node);
        self.elements[node.0].content = Content::Children(Vec::new());
        for item in items {
            let child = self.append_element(node, tag);
            self.elements[child.0].content = Content::Text(item.clone());
        }
        self.mutations += 1;
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
        self.mutations += 1;
    }

    fn set_meta(&mut self, name: &str, content: &str) -> bool {
        match self.metas.get_mut(name) {
            Some(existing) => {
                *existing = content.to_string();
                self.mutations += 1;
                true
            }
            None => false,
        }
    }

    fn set_document_lang(&mut self, lang: &str) {
        self.document_lang = lang.to_string();
        self.mutations += 1;
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        (0..self.elements.len()).map(NodeId).find(|node| {
            self.elements[node.0].attributes.get("id").map(String::as_str) == Some(id)
                && self.is_attached(*node)
        })
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.elements[node.0].attributes.get(name).map(String::as_str)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.elements[node.0].parent
    }

    fn descendants_with_attribute(&self, root: NodeId, name: &str) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack: Vec<NodeId> = self.children(root).into_iter().rev().collect();
        while let Some(node) = stack.pop() {
            if self.elements[node.0].attributes.contains_key(name) {
                found.push(node);
            }
            stack.extend(self.children(node).into_iter().rev());
        }
        found
    }

    fn set_class(&mut self, node: NodeId, class: &str, enabled: bool) {
        let classes = &mut self.elements[node.0].classes;
        if enabled {
            classes.insert(class.to_string());
        } else {
            classes.remove(class);
        }
        self.mutations += 1;
    }
}

/// Escape text for an HTML text node.
pub fn escape_text(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }
    result
}

/// Escape text for a double-quoted HTML attribute value.
///
/// Single quotes are left as is, so the result is only safe inside `"..."`.
pub fn escape_attribute(text: &str) -> String {
    escape_text(text).replace('"', "&quot;")
}
