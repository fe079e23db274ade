#![forbid(unsafe_code)]

//! DOM-like fragment model.
//!
//! The external fragment loader hands the navigation core an already-parsed
//! tree of [`Node`] values. The same model is used for the markup the core
//! emits, so authored subtrees (logos, descriptions, tool links) can be
//! passed through verbatim.
//!
//! # Design Notes
//!
//! - Tag names are stored lowercase; attribute order is preserved.
//! - Queries never fail: a missing element is `None`, which callers turn into
//!   a degraded (simpler) result rather than an error.
//! - [`Element::to_html`] escapes text and attribute values; attributes with
//!   an empty value serialize as bare boolean attributes (`hidden`).

use std::fmt::Write as _;

/// Elements that never have children or a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// A node in a fragment tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// An element with a tag, attributes, and children.
    Element(Element),
    /// A run of character data.
    Text(String),
}

impl Node {
    /// Create a text node.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Borrow the element, if this node is one.
    #[must_use]
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(el) => Some(el),
            Self::Text(_) => None,
        }
    }

    /// Concatenated character data of this node and its descendants.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Self::Text(t) => out.push_str(t),
            Self::Element(el) => {
                for child in &el.children {
                    child.collect_text(out);
                }
            }
        }
    }

    fn write_html(&self, out: &mut String) {
        match self {
            Self::Text(t) => escape_into(out, t, false),
            Self::Element(el) => el.write_html(out),
        }
    }
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Self::Element(el)
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Node {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

/// An element node.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    tag: String,
    attrs: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    /// Create an empty element with the given tag.
    #[must_use]
    pub fn new(tag: impl AsRef<str>) -> Self {
        Self {
            tag: tag.as_ref().to_ascii_lowercase(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Set an attribute (builder form).
    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Add a class token (builder form).
    #[must_use]
    pub fn with_class(mut self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    /// Append a child node (builder form).
    #[must_use]
    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Append many child nodes (builder form).
    #[must_use]
    pub fn with_children<I, N>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    /// Append a text child (builder form).
    #[must_use]
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_child(Node::Text(text.into()))
    }

    /// Lowercase tag name.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Whether this element is `h1`..`h6`.
    #[must_use]
    pub fn is_heading(&self) -> bool {
        matches!(self.tag.as_str(), "h1" | "h2" | "h3" | "h4" | "h5" | "h6")
    }

    /// Whether this element is `ul` or `ol`.
    #[must_use]
    pub fn is_list(&self) -> bool {
        matches!(self.tag.as_str(), "ul" | "ol")
    }

    /// Look up an attribute value.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// All attributes in insertion order.
    #[must_use]
    pub fn attrs(&self) -> &[(String, String)] {
        &self.attrs
    }

    /// Set or replace an attribute.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name, value)),
        }
    }

    /// Remove an attribute, returning its previous value.
    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let idx = self.attrs.iter().position(|(k, _)| k == name)?;
        Some(self.attrs.remove(idx).1)
    }

    /// Whether the `class` attribute contains `class` as a token.
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|list| list.split_ascii_whitespace().any(|c| c == class))
    }

    /// Add a class token if not already present.
    pub fn add_class(&mut self, class: &str) {
        if self.has_class(class) {
            return;
        }
        let joined = match self.attr("class") {
            Some(existing) if !existing.trim().is_empty() => format!("{} {class}", existing.trim()),
            _ => class.to_string(),
        };
        self.set_attr("class", joined);
    }

    /// Child nodes.
    #[must_use]
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Append a child node.
    pub fn push(&mut self, child: impl Into<Node>) {
        self.children.push(child.into());
    }

    /// Direct element children.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> + '_ {
        self.children.iter().filter_map(Node::as_element)
    }

    /// First direct child with the given tag.
    #[must_use]
    pub fn first_child(&self, tag: &str) -> Option<&Element> {
        self.child_elements().find(|el| el.tag == tag)
    }

    /// First descendant (document order, excluding `self`) with the given tag.
    #[must_use]
    pub fn find_first(&self, tag: &str) -> Option<&Element> {
        self.find_first_where(&|el| el.tag == tag)
    }

    /// First descendant matching `pred`, excluding `self`.
    pub fn find_first_where(&self, pred: &dyn Fn(&Element) -> bool) -> Option<&Element> {
        for child in self.child_elements() {
            if pred(child) {
                return Some(child);
            }
            if let Some(found) = child.find_first_where(pred) {
                return Some(found);
            }
        }
        None
    }

    /// All descendants with the given tag in document order.
    #[must_use]
    pub fn find_all(&self, tag: &str) -> Vec<&Element> {
        let mut out = Vec::new();
        self.collect_tag(tag, &mut out);
        out
    }

    fn collect_tag<'a>(&'a self, tag: &str, out: &mut Vec<&'a Element>) {
        for child in self.child_elements() {
            if child.tag == tag {
                out.push(child);
            }
            child.collect_tag(tag, out);
        }
    }

    /// This element or a descendant whose attribute `name` equals `value`.
    #[must_use]
    pub fn find_by_attr(&self, name: &str, value: &str) -> Option<&Element> {
        if self.attr(name) == Some(value) {
            return Some(self);
        }
        self.find_first_where(&|el| el.attr(name) == Some(value))
    }

    /// Concatenated character data of all descendants.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.collect_text(&mut out);
        }
        out
    }

    /// Character data of direct text children only, trimmed.
    #[must_use]
    pub fn own_text(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            if let Node::Text(t) = child {
                out.push_str(t);
            }
        }
        out.trim().to_string()
    }

    /// Visit this element and every descendant element, pre-order.
    pub fn visit_mut(&mut self, f: &mut dyn FnMut(&mut Element)) {
        f(self);
        for child in &mut self.children {
            if let Node::Element(el) = child {
                el.visit_mut(f);
            }
        }
    }

    /// Remove every descendant element matching `pred`; returns how many.
    pub fn remove_descendants(&mut self, pred: &dyn Fn(&Element) -> bool) -> usize {
        let before = self.children.len();
        self.children
            .retain(|child| !matches!(child, Node::Element(el) if pred(el)));
        let mut removed = before - self.children.len();
        for child in &mut self.children {
            if let Node::Element(el) = child {
                removed += el.remove_descendants(pred);
            }
        }
        removed
    }

    /// Serialize to HTML.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        for (name, value) in &self.attrs {
            out.push(' ');
            out.push_str(name);
            if !value.is_empty() {
                out.push_str("=\"");
                escape_into(out, value, true);
                out.push('"');
            }
        }
        out.push('>');
        if VOID_ELEMENTS.contains(&self.tag.as_str()) {
            return;
        }
        for child in &self.children {
            child.write_html(out);
        }
        let _ = write!(out, "</{}>", self.tag);
    }
}

fn escape_into(out: &mut String, s: &str, attr: bool) {
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attr => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Element {
        Element::new("UL").with_child(
            Element::new("li")
                .with_child(Element::new("h2").with_text("Business"))
                .with_child(Element::new("p").with_text("For companies"))
                .with_child(
                    Element::new("ul").with_child(
                        Element::new("li").with_child(
                            Element::new("a").with_attr("href", "/x").with_text("X"),
                        ),
                    ),
                ),
        )
    }

    #[test]
    fn tags_are_lowercased() {
        assert_eq!(sample().tag(), "ul");
    }

    #[test]
    fn find_first_is_document_order() {
        let tree = sample();
        let li = tree.first_child("li").unwrap();
        assert_eq!(li.find_first("h2").unwrap().text_content(), "Business");
        assert_eq!(tree.find_first("a").unwrap().attr("href"), Some("/x"));
        assert_eq!(tree.find_all("li").len(), 2);
    }

    #[test]
    fn set_attr_replaces_in_place() {
        let mut el = Element::new("div").with_attr("a", "1").with_attr("b", "2");
        el.set_attr("a", "3");
        assert_eq!(el.attrs()[0], ("a".to_string(), "3".to_string()));
        assert_eq!(el.remove_attr("b"), Some("2".to_string()));
        assert_eq!(el.remove_attr("b"), None);
    }

    #[test]
    fn class_tokens() {
        let mut el = Element::new("div").with_class("nav-drop");
        el.add_class("nav-drop");
        el.add_class("open");
        assert_eq!(el.attr("class"), Some("nav-drop open"));
        assert!(el.has_class("open"));
        assert!(!el.has_class("nav"));
    }

    #[test]
    fn html_escapes_and_handles_void_and_boolean_attrs() {
        let el = Element::new("div")
            .with_attr("hidden", "")
            .with_attr("title", "a \"b\"")
            .with_child(Element::new("img").with_attr("src", "/i.png"))
            .with_text("1 < 2 & 3");
        assert_eq!(
            el.to_html(),
            "<div hidden title=\"a &quot;b&quot;\"><img src=\"/i.png\">1 &lt; 2 &amp; 3</div>"
        );
    }

    #[test]
    fn find_by_attr_includes_self() {
        let el = Element::new("nav")
            .with_attr("data-nav-id", "nav")
            .with_child(Element::new("button").with_attr("data-nav-id", "hamburger"));
        assert_eq!(el.find_by_attr("data-nav-id", "nav").unwrap().tag(), "nav");
        assert_eq!(
            el.find_by_attr("data-nav-id", "hamburger").unwrap().tag(),
            "button"
        );
        assert!(el.find_by_attr("data-nav-id", "other").is_none());
    }

    #[test]
    fn remove_descendants_prunes_matching_subtrees() {
        let mut el = Element::new("div")
            .with_child(Element::new("a").with_text("logo"))
            .with_child(Element::new("div").with_child(Element::new("ul").with_child(Element::new("li"))));
        let removed = el.remove_descendants(&|e| e.is_list());
        assert_eq!(removed, 1);
        assert!(el.find_first("li").is_none());
        assert!(el.find_first("a").is_some());
    }

    #[test]
    fn own_text_ignores_nested_elements() {
        let el = Element::new("li")
            .with_text("  Plain ")
            .with_child(Element::new("ul").with_text("nested"));
        assert_eq!(el.own_text(), "Plain");
        assert_eq!(el.text_content(), "  Plain nested");
    }
}
