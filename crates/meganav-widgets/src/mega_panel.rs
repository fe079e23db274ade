#![forbid(unsafe_code)]

//! Mega panel construction and the navigation model.
//!
//! [`MegaPanelBuilder`] turns classified menu entries into [`NavEntry`]
//! values. For three-level entries it allocates one [`MegaPanel`] per
//! second-level item that carries a third-level list. Panel ids are
//! sequential across the whole render (`thirdMenu-1`, `thirdMenu-2`, ...),
//! panels are owned by the [`PanelTable`], and second-level entries refer to
//! their panel by id only.
//!
//! The finished [`NavModel`] is immutable. It also owns the directory of
//! interactive node ids (`data-nav-id`) the renderer stamps and the router
//! resolves signals against.

use std::collections::HashMap;
use std::fmt;

use meganav_core::config::NavConfig;
use meganav_core::fragment::Element;

use crate::classify::{EntryShape, MenuItem, NavTree};
use crate::diagnostics::Diagnostics;
use crate::image_index::ImageIndex;
use crate::source::NavFragment;

/// Node id of the hamburger button.
pub const HAMBURGER_ID: &str = "nav-hamburger";
/// Node id of the nav root.
pub const NAV_ROOT_ID: &str = "nav";

/// Index of a top-level section (1-based, document order).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SectionId(pub usize);

impl SectionId {
    /// Node id of the section's trigger element.
    #[must_use]
    pub fn node_id(self) -> String {
        format!("nav-section-{}", self.0)
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "section-{}", self.0)
    }
}

/// Generated panel identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PanelId(String);

impl PanelId {
    /// The id string as rendered.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Addressable block of third-level links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MegaPanel {
    /// Unique id within the render.
    pub id: PanelId,
    /// Owning section label (heading line 1).
    pub level1_label: String,
    /// Owning second-level label (heading line 2).
    pub level2_label: String,
    /// Copy of the third-level entries.
    pub items: Vec<MenuItem>,
}

/// Owner of every panel in a render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PanelTable {
    panels: Vec<MegaPanel>,
}

impl PanelTable {
    /// Look up a panel by id.
    #[must_use]
    pub fn get(&self, id: &PanelId) -> Option<&MegaPanel> {
        self.panels.iter().find(|p| p.id == *id)
    }

    /// All panels in allocation order.
    #[must_use]
    pub fn panels(&self) -> &[MegaPanel] {
        &self.panels
    }

    /// Number of panels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.panels.len()
    }

    /// Whether no panels were allocated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }
}

/// A second-level entry in a three-level mega's left index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    /// The authored entry (children omitted; they live in the panel).
    pub item: MenuItem,
    /// Panel shown while this entry is hovered, if it owns one.
    pub target_panel_id: Option<PanelId>,
}

/// A classified top-level entry with its mega content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavEntry {
    /// Simple link, or plain dropdown of links.
    Plain {
        /// The authored entry.
        item: MenuItem,
    },
    /// Title/description column plus a flat link list.
    TwoLevelMega {
        /// The authored entry.
        item: MenuItem,
        /// Heading text, falling back to the label.
        title: String,
        /// Authored description paragraph.
        description: Option<Element>,
        /// Middle column links.
        items: Vec<MenuItem>,
    },
    /// Left index driving third-level panels.
    ThreeLevelMega {
        /// The authored entry.
        item: MenuItem,
        /// Left index entries in document order.
        items: Vec<IndexEntry>,
        /// Ids of the panels this section owns, in order.
        panels: Vec<PanelId>,
    },
}

impl NavEntry {
    /// The authored top-level entry.
    #[must_use]
    pub fn item(&self) -> &MenuItem {
        match self {
            Self::Plain { item }
            | Self::TwoLevelMega { item, .. }
            | Self::ThreeLevelMega { item, .. } => item,
        }
    }

    /// Structural shape of this entry.
    #[must_use]
    pub fn shape(&self) -> EntryShape {
        match self {
            Self::Plain { .. } => EntryShape::Plain,
            Self::TwoLevelMega { .. } => EntryShape::TwoLevelMega,
            Self::ThreeLevelMega { .. } => EntryShape::ThreeLevelMega,
        }
    }

    /// Whether the entry opens a dropdown when activated.
    #[must_use]
    pub fn is_expandable(&self) -> bool {
        self.item().has_children()
    }
}

/// A top-level section of the rendered nav.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Section id.
    pub id: SectionId,
    /// Classified content.
    pub entry: NavEntry,
    /// Image keyed by the section label, the default for its right column.
    pub default_image: Option<String>,
}

/// A hoverable entry inside a mega menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoverTarget {
    /// Owning section.
    pub section: SectionId,
    /// Entry label.
    pub label: String,
    /// Normalized label for the image lookup.
    pub image_key: String,
    /// Panel shown while hovered.
    pub target_panel_id: Option<PanelId>,
}

/// What an interactive node id refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A section trigger (drop trigger or plain link).
    Section(SectionId),
    /// The hamburger button.
    Hamburger,
    /// A mega menu entry that drives panel/image state.
    Hover(HoverTarget),
    /// Any other focusable element inside the nav.
    Link,
}

/// Immutable navigation model for one fragment load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavModel {
    sections: Vec<Section>,
    panels: PanelTable,
    images: ImageIndex,
    targets: HashMap<String, Target>,
    brand: Element,
    links: Option<Element>,
    tools: Option<Element>,
}

impl NavModel {
    /// Build the model from a loaded fragment root.
    pub fn build(root: &Element, config: &NavConfig) -> (Self, Diagnostics) {
        let mut diag = Diagnostics::new();
        let fragment = NavFragment::from_root(root, &mut diag);
        let model = Self::from_fragment(fragment, config, &mut diag);
        if !diag.is_empty() {
            tracing::warn!(
                degradations = diag.len(),
                "navigation built with degraded content"
            );
        }
        (model, diag)
    }

    /// Build the model from already-split fragment parts.
    pub fn from_fragment(fragment: NavFragment, config: &NavConfig, diag: &mut Diagnostics) -> Self {
        let images = match &fragment.image_block {
            Some(block) => ImageIndex::from_block(block, diag),
            None => ImageIndex::new(),
        };
        let tree = match &fragment.main_menu {
            Some(menu) => NavTree::from_menu_list(menu, diag),
            None => NavTree::default(),
        };
        let mut model = MegaPanelBuilder::new(config).build(&tree, images);

        let mut link_seq = 0usize;
        let mut brand = fragment.brand;
        stamp_links(&mut brand, &mut link_seq, &mut model.targets);
        let mut links = fragment.sections;
        if let Some(links) = links.as_mut() {
            stamp_links(links, &mut link_seq, &mut model.targets);
        }
        let mut tools = fragment.tools;
        if let Some(tools) = tools.as_mut() {
            stamp_links(tools, &mut link_seq, &mut model.targets);
        }
        model.brand = brand;
        model.links = links;
        model.tools = tools;
        model
    }

    /// Sections in document order.
    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Look up a section.
    #[must_use]
    pub fn section(&self, id: SectionId) -> Option<&Section> {
        id.0.checked_sub(1).and_then(|idx| self.sections.get(idx))
    }

    /// The panel table.
    #[must_use]
    pub fn panels(&self) -> &PanelTable {
        &self.panels
    }

    /// The image index.
    #[must_use]
    pub fn images(&self) -> &ImageIndex {
        &self.images
    }

    /// Resolve an interactive node id.
    #[must_use]
    pub fn target(&self, node_id: &str) -> Option<&Target> {
        self.targets.get(node_id)
    }

    /// Whether `node_id` is an element inside the nav.
    #[must_use]
    pub fn contains_node(&self, node_id: &str) -> bool {
        node_id == NAV_ROOT_ID || self.targets.contains_key(node_id)
    }

    /// All interactive node ids with their targets.
    pub fn targets(&self) -> impl Iterator<Item = (&str, &Target)> + '_ {
        self.targets.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Brand content (logo), links stamped.
    #[must_use]
    pub fn brand(&self) -> &Element {
        &self.brand
    }

    /// Secondary sections list, links stamped.
    #[must_use]
    pub fn links(&self) -> Option<&Element> {
        self.links.as_ref()
    }

    /// Tools area, links stamped.
    #[must_use]
    pub fn tools(&self) -> Option<&Element> {
        self.tools.as_ref()
    }

    /// Image for a section, preferring the hovered entry's own image.
    ///
    /// Fallback order: hovered entry label, section label, none.
    #[must_use]
    pub fn resolve_image(&self, section: SectionId, hovered: Option<&HoverTarget>) -> Option<String> {
        hovered
            .and_then(|h| self.images.get(&h.image_key))
            .map(str::to_string)
            .or_else(|| self.section(section).and_then(|s| s.default_image.clone()))
    }
}

fn stamp_links(root: &mut Element, seq: &mut usize, targets: &mut HashMap<String, Target>) {
    root.visit_mut(&mut |el| {
        if !matches!(el.tag(), "a" | "button") {
            return;
        }
        // Authored ids are kept but must still resolve as inside the nav.
        let id = match el.attr("data-nav-id") {
            Some(existing) if !targets.contains_key(existing) => existing.to_string(),
            _ => {
                *seq += 1;
                let id = format!("nav-link-{seq}");
                el.set_attr("data-nav-id", id.clone());
                id
            }
        };
        targets.insert(id, Target::Link);
    });
}

/// Builds sections and panels from a classified tree.
#[derive(Debug)]
pub struct MegaPanelBuilder<'a> {
    config: &'a NavConfig,
    next_panel: usize,
}

impl<'a> MegaPanelBuilder<'a> {
    /// Create a builder; panel numbering starts at 1.
    #[must_use]
    pub fn new(config: &'a NavConfig) -> Self {
        Self {
            config,
            next_panel: 0,
        }
    }

    fn alloc_panel_id(&mut self) -> PanelId {
        self.next_panel += 1;
        PanelId(self.config.panel_id(self.next_panel))
    }

    /// Build the model's sections, panels, and hover targets.
    pub fn build(mut self, tree: &NavTree, images: ImageIndex) -> NavModel {
        let mut sections = Vec::new();
        let mut panels = PanelTable::default();
        let mut targets = HashMap::new();
        targets.insert(HAMBURGER_ID.to_string(), Target::Hamburger);

        for (idx, (shape, item)) in tree.classified().enumerate() {
            let id = SectionId(idx + 1);
            targets.insert(id.node_id(), Target::Section(id));
            let entry = match shape {
                EntryShape::Plain => {
                    for (pos, _) in item.children.iter().enumerate() {
                        targets.insert(item_node_id(id, pos + 1), Target::Link);
                    }
                    NavEntry::Plain { item: item.clone() }
                }
                EntryShape::TwoLevelMega => {
                    for (pos, child) in item.children.iter().enumerate() {
                        targets.insert(item_node_id(id, pos + 1), hover_target(id, child, None));
                    }
                    NavEntry::TwoLevelMega {
                        item: item.clone(),
                        title: item.heading.clone().unwrap_or_else(|| item.label.clone()),
                        description: item.description.clone(),
                        items: item.children.clone(),
                    }
                }
                EntryShape::ThreeLevelMega => {
                    self.build_three_level(id, item, &mut panels, &mut targets)
                }
            };
            tracing::trace!(section = %id, shape = ?shape, label = %item.label, "section classified");
            sections.push(Section {
                id,
                default_image: images.get(&item.image_key).map(str::to_string),
                entry,
            });
        }

        NavModel {
            sections,
            panels,
            images,
            targets,
            ..NavModel::default()
        }
    }

    fn build_three_level(
        &mut self,
        section: SectionId,
        item: &MenuItem,
        panels: &mut PanelTable,
        targets: &mut HashMap<String, Target>,
    ) -> NavEntry {
        let mut index = Vec::with_capacity(item.children.len());
        let mut owned = Vec::new();

        for (pos, child) in item.children.iter().enumerate() {
            let target_panel_id = if child.has_children() {
                let panel_id = self.alloc_panel_id();
                for (leaf_pos, leaf) in child.children.iter().enumerate() {
                    targets.insert(
                        panel_item_node_id(&panel_id, leaf_pos + 1),
                        hover_target(section, leaf, Some(panel_id.clone())),
                    );
                }
                panels.panels.push(MegaPanel {
                    id: panel_id.clone(),
                    level1_label: item.label.clone(),
                    level2_label: child.label.clone(),
                    items: child.children.clone(),
                });
                owned.push(panel_id.clone());
                Some(panel_id)
            } else {
                None
            };

            targets.insert(
                item_node_id(section, pos + 1),
                hover_target(section, child, target_panel_id.clone()),
            );
            let mut entry_item = child.clone();
            entry_item.children.clear();
            index.push(IndexEntry {
                item: entry_item,
                target_panel_id,
            });
        }

        NavEntry::ThreeLevelMega {
            item: item.clone(),
            items: index,
            panels: owned,
        }
    }
}

fn hover_target(section: SectionId, item: &MenuItem, panel: Option<PanelId>) -> Target {
    Target::Hover(HoverTarget {
        section,
        label: item.label.clone(),
        image_key: item.image_key.clone(),
        target_panel_id: panel,
    })
}

/// Node id of the `pos`-th (1-based) second-level entry of a section.
#[must_use]
pub fn item_node_id(section: SectionId, pos: usize) -> String {
    format!("{}-item-{pos}", section.node_id())
}

/// Node id of the `pos`-th (1-based) entry inside a panel.
#[must_use]
pub fn panel_item_node_id(panel: &PanelId, pos: usize) -> String {
    format!("{panel}-item-{pos}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn business() -> MenuItem {
        MenuItem::new("Business", 1)
            .with_description("For companies")
            .with_child(
                MenuItem::new("X", 2)
                    .with_child(MenuItem::new("a", 3))
                    .with_child(MenuItem::new("b", 3)),
            )
            .with_child(MenuItem::new("Y", 2))
    }

    fn images() -> ImageIndex {
        let mut index = ImageIndex::new();
        index.insert("Business", "imgB");
        index.insert("X", "imgX");
        index
    }

    #[test]
    fn three_level_allocates_panel_per_level3_group() {
        let config = NavConfig::default();
        let tree = NavTree::new(vec![business()]);
        let model = MegaPanelBuilder::new(&config).build(&tree, images());

        assert_eq!(model.panels().len(), 1);
        let panel = &model.panels().panels()[0];
        assert_eq!(panel.id.as_str(), "thirdMenu-1");
        assert_eq!(panel.level1_label, "Business");
        assert_eq!(panel.level2_label, "X");
        let labels: Vec<_> = panel.items.iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, vec!["a", "b"]);

        let NavEntry::ThreeLevelMega { items, panels, .. } = &model.sections()[0].entry else {
            panic!("expected three-level mega");
        };
        assert_eq!(items[0].target_panel_id.as_ref(), Some(&panel.id));
        assert!(items[1].target_panel_id.is_none());
        assert!(items[0].item.children.is_empty());
        assert_eq!(panels, &vec![panel.id.clone()]);
    }

    #[test]
    fn panel_ids_are_sequential_across_sections() {
        let config = NavConfig::default();
        let other = MenuItem::new("Personal", 1)
            .with_child(MenuItem::new("P", 2).with_child(MenuItem::new("p1", 3)))
            .with_child(MenuItem::new("Q", 2).with_child(MenuItem::new("q1", 3)));
        let tree = NavTree::new(vec![business(), MenuItem::new("Home", 1), other]);
        let model = MegaPanelBuilder::new(&config).build(&tree, ImageIndex::new());
        let ids: Vec<_> = model.panels().panels().iter().map(|p| p.id.to_string()).collect();
        assert_eq!(ids, vec!["thirdMenu-1", "thirdMenu-2", "thirdMenu-3"]);
        assert_eq!(model.panels().panels()[2].level1_label, "Personal");
    }

    #[test]
    fn image_fallback_order() {
        let config = NavConfig::default();
        let model = MegaPanelBuilder::new(&config).build(&NavTree::new(vec![business()]), images());
        let section = SectionId(1);
        let Some(Target::Hover(x)) = model.target(&item_node_id(section, 1)) else {
            panic!("X should be a hover target");
        };
        let Some(Target::Hover(y)) = model.target(&item_node_id(section, 2)) else {
            panic!("Y should be a hover target");
        };
        assert_eq!(model.resolve_image(section, Some(x)).as_deref(), Some("imgX"));
        assert_eq!(model.resolve_image(section, Some(y)).as_deref(), Some("imgB"));
        assert_eq!(model.resolve_image(section, None).as_deref(), Some("imgB"));
        assert_eq!(
            MegaPanelBuilder::new(&config)
                .build(&NavTree::new(vec![business()]), ImageIndex::new())
                .resolve_image(section, Some(x)),
            None
        );
    }

    #[test]
    fn panel_leaves_target_their_panel() {
        let config = NavConfig::default();
        let model = MegaPanelBuilder::new(&config).build(&NavTree::new(vec![business()]), images());
        let panel_id = model.panels().panels()[0].id.clone();
        let Some(Target::Hover(leaf)) = model.target(&panel_item_node_id(&panel_id, 2)) else {
            panic!("panel leaf should be a hover target");
        };
        assert_eq!(leaf.label, "b");
        assert_eq!(leaf.target_panel_id.as_ref(), Some(&panel_id));
    }

    #[test]
    fn two_level_and_plain_sections() {
        let config = NavConfig::default();
        let two = MenuItem::new("Products", 1)
            .with_heading()
            .with_child(MenuItem::new("Cards", 2));
        let plain = MenuItem::new("More", 1).with_child(MenuItem::new("Jobs", 2));
        let model =
            MegaPanelBuilder::new(&config).build(&NavTree::new(vec![two, plain]), ImageIndex::new());
        assert_eq!(model.sections()[0].entry.shape(), EntryShape::TwoLevelMega);
        assert_eq!(model.sections()[1].entry.shape(), EntryShape::Plain);
        assert!(model.sections()[1].entry.is_expandable());
        assert!(model.panels().is_empty());
        assert!(matches!(
            model.target(&item_node_id(SectionId(1), 1)),
            Some(Target::Hover(_))
        ));
        assert_eq!(model.target(&item_node_id(SectionId(2), 1)), Some(&Target::Link));
        assert_eq!(model.target(HAMBURGER_ID), Some(&Target::Hamburger));
    }

    fn fragment_root(tools: Element) -> Element {
        let business = Element::new("li")
            .with_child(Element::new("h2").with_text("Business"))
            .with_child(Element::new("p").with_text("Banking for companies"));
        Element::new("div")
            .with_child(Element::new("div").with_child(Element::new("ul").with_child(business)))
            .with_child(Element::new("div").with_child(
                Element::new("a").with_attr("href", "/jobs").with_attr("data-nav-id", "nav-section-1"),
            ))
            .with_child(Element::new("div").with_child(tools))
    }

    #[test]
    fn authored_link_ids_resolve_inside_nav() {
        let tools = Element::new("button").with_attr("data-nav-id", "search").with_text("Search");
        let (model, _) = NavModel::build(&fragment_root(tools), &NavConfig::default());
        assert!(model.contains_node("search"));
        assert_eq!(model.target("search"), Some(&Target::Link));
        // A clashing authored id is replaced rather than shadowing the section.
        assert!(matches!(model.target("nav-section-1"), Some(Target::Section(_))));
        let links = model.links().unwrap();
        assert_eq!(
            links.find_first("a").and_then(|a| a.attr("data-nav-id")),
            Some("nav-link-1")
        );
        assert_eq!(model.target("nav-link-1"), Some(&Target::Link));
    }

    #[test]
    fn heading_without_list_is_reported() {
        let (model, diag) = NavModel::build(&fragment_root(Element::new("div")), &NavConfig::default());
        assert_eq!(model.sections()[0].entry.shape(), EntryShape::Plain);
        assert_eq!(diag.count(crate::diagnostics::DegradationKind::StructuralMismatch), 1);
    }

    #[test]
    fn section_lookup_is_one_based() {
        let config = NavConfig::default();
        let model = MegaPanelBuilder::new(&config)
            .build(&NavTree::new(vec![MenuItem::new("Home", 1)]), ImageIndex::new());
        assert!(model.section(SectionId(0)).is_none());
        assert_eq!(model.section(SectionId(1)).map(|s| s.id), Some(SectionId(1)));
        assert!(model.section(SectionId(2)).is_none());
    }
}
