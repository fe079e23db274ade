#![forbid(unsafe_code)]

//! Label-keyed illustrative image table.
//!
//! The authored navigation carries a side block pairing images with labels.
//! Each pair is stored under the label's normalized key so menu entries can
//! find "their" image by label alone. Incomplete pairs are skipped; for a
//! duplicate key the last pair wins.

use std::collections::HashMap;

use meganav_core::fragment::Element;

use crate::diagnostics::Diagnostics;

/// Normalize a label into an image key.
///
/// Lowercases, trims, and collapses each whitespace run into a single `-`.
///
/// ```
/// use meganav_widgets::image_index::normalize_key;
///
/// assert_eq!(normalize_key("  Small   Business "), "small-business");
/// ```
#[must_use]
pub fn normalize_key(label: &str) -> String {
    label
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// Normalized-key → image-URL table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageIndex {
    entries: HashMap<String, String>,
}

impl ImageIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `src` under the normalized `label`, returning the overwritten URL.
    pub fn insert(&mut self, label: &str, src: impl Into<String>) -> Option<String> {
        let key = normalize_key(label);
        let previous = self.entries.insert(key.clone(), src.into());
        if previous.is_some() {
            tracing::debug!(key = %key, "duplicate image key, last write wins");
        }
        previous
    }

    /// Build from `(image src, label)` pairs; incomplete pairs are skipped.
    pub fn from_pairs<I, S>(pairs: I, diag: &mut Diagnostics) -> Self
    where
        I: IntoIterator<Item = (Option<S>, Option<S>)>,
        S: AsRef<str>,
    {
        let mut index = Self::new();
        for (pos, (src, label)) in pairs.into_iter().enumerate() {
            let src = src.as_ref().map(|s| s.as_ref().trim()).filter(|s| !s.is_empty());
            let label = label
                .as_ref()
                .map(|s| s.as_ref().trim())
                .filter(|s| !s.is_empty());
            match (src, label) {
                (Some(src), Some(label)) => {
                    index.insert(label, src);
                }
                (None, _) => diag.missing_asset(format!("image pair {}: no image", pos + 1)),
                (_, None) => diag.missing_asset(format!("image pair {}: no label", pos + 1)),
            }
        }
        index
    }

    /// Build from an authored block whose rows each hold one image and one label.
    ///
    /// The label is the row's text; the image is the first `img` in the row,
    /// in whichever order the two were authored.
    pub fn from_block(block: &Element, diag: &mut Diagnostics) -> Self {
        let pairs = block.child_elements().map(|row| {
            let src = row
                .find_first("img")
                .or_else(|| (row.tag() == "img").then_some(row))
                .and_then(|img| img.attr("src"))
                .map(str::to_string);
            let label = Some(row.text_content());
            (src, label)
        });
        let index = Self::from_pairs(pairs, diag);
        tracing::trace!(entries = index.len(), "image index built");
        index
    }

    /// Image URL stored under an already-normalized key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Image URL for a raw label.
    #[must_use]
    pub fn lookup_label(&self, label: &str) -> Option<&str> {
        self.get(&normalize_key(label))
    }

    /// Number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index holds no images.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
