#![forbid(unsafe_code)]

//! Declarative render of the navigation.
//!
//! [`render_nav`] is a pure function of `(model, state, config)`. It never
//! mutates either input; the host diffs or replaces the live nav with the
//! returned tree. Every interactive element carries `data-nav-id`, and every
//! toggle carries `aria-expanded` mirroring [`NavigationState`].
//!
//! ```text
//! nav#nav [aria-expanded] [data-nav-epoch] [data-breakpoint]
//! ├─ div.nav-hamburger > button[aria-controls=nav][aria-label]
//! ├─ div.nav-brand      (authored logo)
//! ├─ div.nav-sections > ul
//! │   └─ li[.nav-drop][aria-expanded][tabindex=0 on desktop]
//! │       └─ div.mega-menu > .mega-left  .mega-middle  .mega-right
//! ├─ div.nav-links      (authored sections list)
//! └─ div.nav-tools      (authored tools)
//! ```

use meganav_core::breakpoint::Breakpoint;
use meganav_core::config::NavConfig;
use meganav_core::fragment::Element;

use crate::classify::MenuItem;
use crate::controller::NavigationState;
use crate::mega_panel::{
    HAMBURGER_ID, IndexEntry, MegaPanel, NAV_ROOT_ID, NavEntry, NavModel, Section, SectionId,
    Target, item_node_id, panel_item_node_id,
};

/// Attribute the host resolves signals against.
pub const NAV_ID_ATTR: &str = "data-nav-id";

fn bool_attr(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

/// Render the full navigation tree for the current state.
#[must_use]
pub fn render_nav(model: &NavModel, state: &NavigationState, config: &NavConfig) -> Element {
    let breakpoint = match state.breakpoint() {
        Breakpoint::Desktop => "desktop",
        Breakpoint::Mobile => "mobile",
    };
    let mut nav = Element::new("nav")
        .with_attr("id", NAV_ROOT_ID)
        .with_attr(NAV_ID_ATTR, NAV_ROOT_ID)
        .with_attr("aria-expanded", bool_attr(state.nav_expanded()))
        .with_attr("data-nav-epoch", state.epoch().to_string())
        .with_attr("data-breakpoint", breakpoint)
        .with_child(render_hamburger(state, config))
        .with_child(
            Element::new("div")
                .with_class("nav-brand")
                .with_child(model.brand().clone()),
        );

    let list = Element::new("ul").with_children(
        model
            .sections()
            .iter()
            .map(|section| render_section(model, state, section)),
    );
    nav.push(Element::new("div").with_class("nav-sections").with_child(list));

    if let Some(links) = model.links() {
        nav.push(Element::new("div").with_class("nav-links").with_child(links.clone()));
    }
    if let Some(tools) = model.tools() {
        nav.push(Element::new("div").with_class("nav-tools").with_child(tools.clone()));
    }
    nav
}

/// Render and serialize to HTML.
#[must_use]
pub fn render_html(model: &NavModel, state: &NavigationState, config: &NavConfig) -> String {
    render_nav(model, state, config).to_html()
}

fn render_hamburger(state: &NavigationState, config: &NavConfig) -> Element {
    let label = if state.nav_expanded() && !state.breakpoint().is_desktop() {
        &config.close_label
    } else {
        &config.open_label
    };
    Element::new("div").with_class("nav-hamburger").with_child(
        Element::new("button")
            .with_attr("type", "button")
            .with_attr(NAV_ID_ATTR, HAMBURGER_ID)
            .with_attr("aria-controls", NAV_ROOT_ID)
            .with_attr("aria-label", label.clone())
            .with_child(Element::new("span").with_class("nav-hamburger-icon")),
    )
}

fn render_section(model: &NavModel, state: &NavigationState, section: &Section) -> Element {
    let item = section.entry.item();
    let mut li = Element::new("li").with_attr(NAV_ID_ATTR, section.id.node_id());

    if section.entry.is_expandable() {
        let expanded = state.is_section_expanded(section.id);
        li.add_class("nav-drop");
        li.set_attr("aria-expanded", bool_attr(expanded));
        if state.breakpoint().is_desktop() {
            li.set_attr("tabindex", "0");
        }
    }
    li.push(label_node(item));

    match &section.entry {
        NavEntry::Plain { item } => {
            if item.has_children() {
                let list = Element::new("ul").with_children(
                    item.children
                        .iter()
                        .enumerate()
                        .map(|(pos, child)| entry_li(child, item_node_id(section.id, pos + 1), state)),
                );
                li.push(list);
            }
        }
        NavEntry::TwoLevelMega {
            title,
            description,
            items,
            ..
        } => {
            let mut left = Element::new("div")
                .with_class("mega-left")
                .with_child(Element::new("h2").with_class("mega-title").with_text(title.clone()));
            if let Some(desc) = description {
                left.push(desc.clone().with_class("mega-description"));
            }
            let middle = Element::new("div").with_class("mega-middle").with_child(
                Element::new("ul").with_children(
                    items
                        .iter()
                        .enumerate()
                        .map(|(pos, child)| entry_li(child, item_node_id(section.id, pos + 1), state)),
                ),
            );
            li.push(mega_menu("mega-two-level", left, middle, right_column(model, state, section.id)));
        }
        NavEntry::ThreeLevelMega { items, panels, .. } => {
            let left = Element::new("div").with_class("mega-left").with_child(
                Element::new("ul").with_class("mega-index").with_children(
                    items
                        .iter()
                        .enumerate()
                        .map(|(pos, entry)| index_li(entry, item_node_id(section.id, pos + 1), state)),
                ),
            );
            let middle = Element::new("div").with_class("mega-middle").with_children(
                panels
                    .iter()
                    .filter_map(|id| model.panels().get(id))
                    .map(|panel| render_panel(panel, state, section.id)),
            );
            li.push(mega_menu("mega-three-level", left, middle, right_column(model, state, section.id)));
        }
    }
    li
}

fn mega_menu(kind: &str, left: Element, middle: Element, right: Element) -> Element {
    Element::new("div")
        .with_class("mega-menu")
        .with_class(kind)
        .with_child(left)
        .with_child(middle)
        .with_child(right)
}

fn label_node(item: &MenuItem) -> Element {
    match &item.href {
        Some(href) => Element::new("a")
            .with_attr("href", href.clone())
            .with_text(item.label.clone()),
        None => Element::new("span").with_class("nav-label").with_text(item.label.clone()),
    }
}

fn entry_li(item: &MenuItem, node_id: String, state: &NavigationState) -> Element {
    let hovered = state.hovered() == Some(node_id.as_str());
    let mut li = Element::new("li").with_attr(NAV_ID_ATTR, node_id);
    if hovered {
        li.add_class("active");
    }
    li.with_child(label_node(item))
}

fn index_li(entry: &IndexEntry, node_id: String, state: &NavigationState) -> Element {
    let mut li = entry_li(&entry.item, node_id, state);
    if let Some(panel) = &entry.target_panel_id {
        li.set_attr("data-target", panel.as_str());
        li.set_attr("aria-controls", panel.as_str());
    }
    li
}

fn render_panel(panel: &MegaPanel, state: &NavigationState, section: SectionId) -> Element {
    let visible =
        state.is_section_expanded(section) && state.visible_panel() == Some(&panel.id);
    let mut div = Element::new("div")
        .with_class("mega-panel")
        .with_attr("id", panel.id.as_str())
        .with_child(Element::new("h3").with_text(panel.level1_label.clone()))
        .with_child(Element::new("h4").with_text(panel.level2_label.clone()))
        .with_child(
            Element::new("ul").with_children(
                panel
                    .items
                    .iter()
                    .enumerate()
                    .map(|(pos, item)| entry_li(item, panel_item_node_id(&panel.id, pos + 1), state)),
            ),
        );
    if !visible {
        div.set_attr("hidden", "");
    }
    div
}

/// Right column image for `section`, derived from the hovered entry when it
/// belongs to this section.
fn right_column(model: &NavModel, state: &NavigationState, section: SectionId) -> Element {
    let mut right = Element::new("div").with_class("mega-right");
    if !state.is_section_expanded(section) {
        return right;
    }
    let hovered = state.hovered().and_then(|id| match model.target(id) {
        Some(Target::Hover(h)) if h.section == section => Some(h),
        _ => None,
    });
    if let Some(src) = model.resolve_image(section, hovered) {
        right.push(
            Element::new("img")
                .with_attr("src", src)
                .with_attr("alt", "")
                .with_attr("loading", "lazy"),
        );
    }
    right
}
