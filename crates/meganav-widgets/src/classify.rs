#![forbid(unsafe_code)]

//! Authored menu tree and entry classification.
//!
//! The authored main menu is a nested list with no explicit type flags. Each
//! top-level entry is classified purely from structural signals:
//!
//! | nested list | heading or paragraph | level 3 present | shape |
//! |-------------|----------------------|-----------------|-------|
//! | no          | any                  | -               | `Plain` |
//! | yes         | no                   | no              | `Plain` |
//! | yes         | yes                  | no              | `TwoLevelMega` |
//! | yes         | any                  | yes             | `ThreeLevelMega` |
//!
//! [`classify`] works on the abstract [`MenuItem`] value, not on markup, and
//! never looks further than two nesting levels below the entry.

use meganav_core::fragment::Element;

use crate::diagnostics::Diagnostics;
use crate::image_index::normalize_key;

/// Deepest authored level the navigation renders.
pub const MAX_LEVEL: u8 = 3;

/// One authored menu entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    /// Display label (heading text, else link text, else own text).
    pub label: String,
    /// Link target, when the entry is a link.
    pub href: Option<String>,
    /// Nesting level, 1 for top-level entries.
    pub level: u8,
    /// Authored heading text, when present.
    pub heading: Option<String>,
    /// Authored secondary paragraph, passed through as rich text.
    pub description: Option<Element>,
    /// Nested entries in document order.
    pub children: Vec<MenuItem>,
    /// Normalized label used to join against the image index.
    pub image_key: String,
}

impl MenuItem {
    /// Create a childless entry at `level`.
    #[must_use]
    pub fn new(label: impl Into<String>, level: u8) -> Self {
        let label = label.into();
        Self {
            image_key: normalize_key(&label),
            label,
            href: None,
            level,
            heading: None,
            description: None,
            children: Vec::new(),
        }
    }

    /// Set the link target.
    #[must_use]
    pub fn with_href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }

    /// Mark the label as authored in a heading.
    #[must_use]
    pub fn with_heading(mut self) -> Self {
        self.heading = Some(self.label.clone());
        self
    }

    /// Attach a plain-text description paragraph.
    #[must_use]
    pub fn with_description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(Element::new("p").with_text(text.into()));
        self
    }

    /// Append a child; its subtree is re-leveled below this entry.
    #[must_use]
    pub fn with_child(mut self, mut child: MenuItem) -> Self {
        child.relevel(self.level.saturating_add(1));
        self.children.push(child);
        self
    }

    fn relevel(&mut self, level: u8) {
        self.level = level;
        for child in &mut self.children {
            child.relevel(level.saturating_add(1));
        }
    }

    /// Whether this entry has nested entries.
    #[must_use]
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Parse the `li` children of an authored list at `level`.
    pub fn parse_list(list: &Element, level: u8, diag: &mut Diagnostics) -> Vec<MenuItem> {
        list.child_elements()
            .filter(|el| el.tag() == "li")
            .enumerate()
            .filter_map(|(pos, li)| Self::parse_entry(li, level, pos + 1, diag))
            .collect()
    }

    fn parse_entry(li: &Element, level: u8, pos: usize, diag: &mut Diagnostics) -> Option<Self> {
        let heading = li
            .child_elements()
            .find(|el| el.is_heading())
            .map(|h| h.text_content().trim().to_string())
            .filter(|t| !t.is_empty());
        let nested = li.child_elements().find(|el| el.is_list());
        let link = li.child_elements().filter(|el| !el.is_list()).find_map(|el| {
            if el.tag() == "a" {
                Some(el)
            } else {
                el.find_first("a")
            }
        });
        let link_text = link
            .map(|a| a.text_content().trim().to_string())
            .filter(|t| !t.is_empty());
        let first_para = li
            .child_elements()
            .find(|el| el.tag() == "p")
            .map(|p| p.text_content().trim().to_string())
            .filter(|t| !t.is_empty());

        let Some(label) = heading
            .clone()
            .or(link_text)
            .or_else(|| Some(li.own_text()).filter(|t| !t.is_empty()))
            .or(first_para)
        else {
            diag.structural(format!("level {level} entry {pos}: no label"));
            return None;
        };

        // The first paragraph that is not just the label is the description.
        let description = li
            .child_elements()
            .filter(|el| el.tag() == "p")
            .find(|p| {
                let text = p.text_content();
                let text = text.trim();
                !text.is_empty() && text != label
            })
            .cloned();

        let mut item = Self::new(label, level);
        item.heading = heading;
        item.description = description;
        item.href = link.and_then(|a| a.attr("href")).map(str::to_string);

        if let Some(nested) = nested {
            if level >= MAX_LEVEL {
                diag.structural(format!(
                    "entry {:?}: list nested below level {MAX_LEVEL} dropped",
                    item.label
                ));
            } else {
                item.children = Self::parse_list(nested, level + 1, diag);
                if item.children.is_empty() {
                    diag.structural(format!("entry {:?}: nested list has no entries", item.label));
                }
            }
        } else if level == 1 && (item.heading.is_some() || item.description.is_some()) {
            diag.structural(format!("entry {:?}: mega implied but no nested list", item.label));
        }
        Some(item)
    }
}

/// Structural shape of a top-level entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryShape {
    /// Simple link, or a plain dropdown of links.
    Plain,
    /// Title/description plus a flat list of links.
    TwoLevelMega,
    /// Index of second-level entries driving third-level panels.
    ThreeLevelMega,
}

/// Classify a top-level entry. Total and deterministic.
#[must_use]
pub fn classify(item: &MenuItem) -> EntryShape {
    if !item.has_children() {
        return EntryShape::Plain;
    }
    if item.children.iter().any(MenuItem::has_children) {
        return EntryShape::ThreeLevelMega;
    }
    if item.heading.is_some() || item.description.is_some() {
        EntryShape::TwoLevelMega
    } else {
        EntryShape::Plain
    }
}

/// The parsed main menu.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavTree {
    entries: Vec<MenuItem>,
}

impl NavTree {
    /// Wrap already-built top-level entries.
    #[must_use]
    pub fn new(entries: Vec<MenuItem>) -> Self {
        Self { entries }
    }

    /// Parse the authored main menu list.
    pub fn from_menu_list(list: &Element, diag: &mut Diagnostics) -> Self {
        Self::new(MenuItem::parse_list(list, 1, diag))
    }

    /// Top-level entries.
    #[must_use]
    pub fn entries(&self) -> &[MenuItem] {
        &self.entries
    }

    /// Entries paired with their shapes, in document order.
    pub fn classified(&self) -> impl Iterator<Item = (EntryShape, &MenuItem)> + '_ {
        self.entries.iter().map(|item| (classify(item), item))
    }
}
