#![forbid(unsafe_code)]

//! Splitting a loaded nav fragment into its authored sections.
//!
//! The fragment root holds, in order: a brand section (logo, an optional
//! image/label index block, and the main menu list), a sections list, and a
//! tools area. Missing sections degrade to empty.

use meganav_core::fragment::Element;

use crate::diagnostics::Diagnostics;

/// Class names that mark the authored image/label index block.
const IMAGE_BLOCK_CLASSES: &[&str] = &["nav-images", "images"];

fn is_image_block(el: &Element) -> bool {
    IMAGE_BLOCK_CLASSES.iter().any(|c| el.has_class(c))
}

/// The authored pieces of a navigation fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavFragment {
    /// Brand content with the menu list and image block removed (the logo).
    pub brand: Element,
    /// The main menu list, classified into sections.
    pub main_menu: Option<Element>,
    /// The image/label pairing block.
    pub image_block: Option<Element>,
    /// Secondary sections list, passed through.
    pub sections: Option<Element>,
    /// Tools area, passed through.
    pub tools: Option<Element>,
}

impl NavFragment {
    /// Split a fragment root into brand, sections, and tools.
    pub fn from_root(root: &Element, diag: &mut Diagnostics) -> Self {
        let mut parts = root.child_elements();
        let brand_src = parts.next();
        let sections = parts.next().cloned();
        let tools = parts.next().cloned();

        let Some(brand_src) = brand_src else {
            diag.structural("fragment: no brand section");
            return Self::default();
        };
        if sections.is_none() {
            diag.structural("fragment: no sections list");
        }
        if tools.is_none() {
            diag.structural("fragment: no tools area");
        }

        let image_block = brand_src.find_first_where(&is_image_block).cloned();
        let main_menu = brand_src
            .find_first_where(&|el| el.is_list() && !is_inside_image_block(brand_src, el))
            .cloned();
        if main_menu.is_none() {
            diag.structural("fragment: brand section has no menu list");
        }

        let mut brand = brand_src.clone();
        brand.remove_descendants(&is_image_block);
        brand.remove_descendants(&Element::is_list);

        Self {
            brand,
            main_menu,
            image_block,
            sections,
            tools,
        }
    }
}

fn is_inside_image_block(root: &Element, target: &Element) -> bool {
    root.find_first_where(&is_image_block)
        .is_some_and(|block| block.find_first_where(&|el| std::ptr::eq(el, target)).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root() -> Element {
        Element::new("div")
            .with_child(
                Element::new("div")
                    .with_child(Element::new("a").with_attr("href", "/").with_text("Logo"))
                    .with_child(
                        Element::new("div").with_class("nav-images").with_child(
                            Element::new("div")
                                .with_child(Element::new("img").with_attr("src", "/b.png"))
                                .with_child(Element::new("ul").with_child(Element::new("li").with_text("decoy"))),
                        ),
                    )
                    .with_child(Element::new("ul").with_child(Element::new("li").with_text("Home"))),
            )
            .with_child(Element::new("div").with_text("sections"))
            .with_child(Element::new("div").with_text("tools"))
    }

    #[test]
    fn splits_sections_in_order() {
        let mut diag = Diagnostics::new();
        let frag = NavFragment::from_root(&root(), &mut diag);
        assert!(diag.is_empty());
        assert_eq!(frag.main_menu.unwrap().text_content(), "Home");
        assert!(frag.image_block.is_some());
        assert_eq!(frag.sections.unwrap().text_content(), "sections");
        assert_eq!(frag.tools.unwrap().text_content(), "tools");
        assert_eq!(frag.brand.text_content(), "Logo");
    }

    #[test]
    fn missing_parts_degrade() {
        let mut diag = Diagnostics::new();
        let frag = NavFragment::from_root(&Element::new("div"), &mut diag);
        assert_eq!(frag, NavFragment::default());
        assert_eq!(diag.len(), 1);

        let mut diag = Diagnostics::new();
        let only_brand = Element::new("div").with_child(Element::new("div").with_text("Logo"));
        let frag = NavFragment::from_root(&only_brand, &mut diag);
        assert!(frag.main_menu.is_none());
        assert_eq!(diag.len(), 3);
    }
}
