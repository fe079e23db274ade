//! Property-based invariant tests for classification and the navigation
//! state machine.
//!
//! 1. Classification is total and deterministic over arbitrary menu trees.
//! 2. Panel ids are unique and sequential across a render.
//! 3. At most one section is open, and only expandable sections open.
//! 4. A visible panel always belongs to the open section.
//! 5. The dismiss lease is held exactly while something is open.
//! 6. Scroll lock is only ever held in the mobile layout.
//! 7. Rendering never panics and never mutates state.

use std::collections::HashSet;

use meganav_core::breakpoint::{Breakpoint, FixedBreakpoint};
use meganav_core::config::NavConfig;
use meganav_core::event::KeyCode;
use meganav_widgets::classify::{EntryShape, MenuItem, NavTree, classify};
use meganav_widgets::controller::{ResponsiveController, Transition};
use meganav_widgets::image_index::ImageIndex;
use meganav_widgets::mega_panel::{MegaPanelBuilder, NavEntry, NavModel, SectionId};
use meganav_widgets::render::render_nav;
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

fn leaf_strategy(level: u8) -> impl Strategy<Value = MenuItem> {
    "[a-z]{1,6}".prop_map(move |label| MenuItem::new(label, level))
}

fn level2_strategy() -> impl Strategy<Value = MenuItem> {
    ("[a-z]{1,6}", prop::collection::vec(leaf_strategy(3), 0..3)).prop_map(|(label, kids)| {
        kids.into_iter()
            .fold(MenuItem::new(label, 2), MenuItem::with_child)
    })
}

fn entry_strategy() -> impl Strategy<Value = MenuItem> {
    (
        "[A-Z][a-z]{0,6}",
        any::<bool>(),
        any::<bool>(),
        prop::collection::vec(level2_strategy(), 0..4),
    )
        .prop_map(|(label, heading, described, kids)| {
            let mut item = MenuItem::new(label, 1);
            if heading {
                item = item.with_heading();
            }
            if described {
                item = item.with_description("about");
            }
            kids.into_iter().fold(item, MenuItem::with_child)
        })
}

fn tree_strategy() -> impl Strategy<Value = NavTree> {
    prop::collection::vec(entry_strategy(), 0..6).prop_map(NavTree::new)
}

fn model_for(tree: &NavTree) -> NavModel {
    let mut images = ImageIndex::new();
    for item in tree.entries() {
        images.insert(&item.label, format!("/{}.png", item.image_key));
    }
    MegaPanelBuilder::new(&NavConfig::default()).build(tree, images)
}

#[derive(Debug, Clone)]
enum Op {
    Toggle(usize),
    Key(usize, bool),
    Hamburger,
    Escape,
    FocusOut(bool),
    Breakpoint(bool),
    Enter(usize, usize, bool),
    Leave(usize, usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (1usize..7).prop_map(Op::Toggle),
        (1usize..7, any::<bool>()).prop_map(|(s, k)| Op::Key(s, k)),
        Just(Op::Hamburger),
        Just(Op::Escape),
        any::<bool>().prop_map(Op::FocusOut),
        any::<bool>().prop_map(Op::Breakpoint),
        (1usize..7, 1usize..5, any::<bool>()).prop_map(|(s, i, stale)| Op::Enter(s, i, stale)),
        (1usize..7, 1usize..5).prop_map(|(s, i)| Op::Leave(s, i)),
    ]
}

fn to_transition(op: &Op, epoch: u64) -> Transition {
    match *op {
        Op::Toggle(s) => Transition::ToggleSection(SectionId(s)),
        Op::Key(s, enter) => Transition::KeyActivate {
            section: SectionId(s),
            key: if enter { KeyCode::Enter } else { KeyCode::Tab },
        },
        Op::Hamburger => Transition::HamburgerClick,
        Op::Escape => Transition::Escape,
        Op::FocusOut(inside) => Transition::FocusOut {
            related_inside: inside,
        },
        Op::Breakpoint(desktop) => Transition::BreakpointChanged(Breakpoint::from_desktop_match(desktop)),
        Op::Enter(s, i, stale) => Transition::HoverEnter {
            target: format!("nav-section-{s}-item-{i}"),
            epoch: if stale { epoch.wrapping_add(1) } else { epoch },
        },
        Op::Leave(s, i) => Transition::HoverLeave {
            target: format!("nav-section-{s}-item-{i}"),
            epoch,
        },
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 1–2. Classification and panel allocation
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn classification_total_and_deterministic(tree in tree_strategy()) {
        for item in tree.entries() {
            let shape = classify(item);
            prop_assert_eq!(shape, classify(item));
            let deep = item.children.iter().any(MenuItem::has_children);
            match shape {
                EntryShape::ThreeLevelMega => prop_assert!(deep),
                EntryShape::TwoLevelMega => {
                    prop_assert!(!deep);
                    prop_assert!(item.heading.is_some() || item.description.is_some());
                }
                EntryShape::Plain => prop_assert!(!deep),
            }
        }
    }

    #[test]
    fn panel_ids_unique_and_sequential(tree in tree_strategy()) {
        let model = model_for(&tree);
        let ids: Vec<String> = model.panels().panels().iter().map(|p| p.id.to_string()).collect();
        let unique: HashSet<&String> = ids.iter().collect();
        prop_assert_eq!(unique.len(), ids.len());
        for (n, id) in ids.iter().enumerate() {
            prop_assert_eq!(id, &format!("thirdMenu-{}", n + 1));
        }

        let expected: usize = tree
            .entries()
            .iter()
            .filter(|i| classify(i) == EntryShape::ThreeLevelMega)
            .map(|i| i.children.iter().filter(|c| c.has_children()).count())
            .sum();
        prop_assert_eq!(ids.len(), expected);

        for section in model.sections() {
            if let NavEntry::ThreeLevelMega { items, .. } = &section.entry {
                for entry in items {
                    if let Some(id) = &entry.target_panel_id {
                        prop_assert!(model.panels().get(id).is_some(), "dangling panel ref {}", id);
                    }
                }
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3–7. State machine invariants
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn state_invariants_hold_for_any_sequence(
        tree in tree_strategy(),
        desktop in any::<bool>(),
        ops in prop::collection::vec(op_strategy(), 0..40),
    ) {
        let model = model_for(&tree);
        let mut ctl = ResponsiveController::new(
            model,
            &FixedBreakpoint(Breakpoint::from_desktop_match(desktop)),
        );
        ctl.start();
        let config = NavConfig::default();

        for op in &ops {
            let epoch = ctl.state().epoch();
            let outcome = ctl.apply(to_transition(op, epoch));
            let state = ctl.state().clone();

            if let Op::Enter(_, _, true) = op {
                prop_assert!(outcome.dropped_stale);
                prop_assert!(!outcome.changed);
            }

            if let Some(open) = state.expanded_section() {
                prop_assert!(state.breakpoint().is_desktop());
                let section = ctl.model().section(open);
                prop_assert!(section.is_some_and(|s| s.entry.is_expandable()));
            }

            if let Some(panel) = state.visible_panel() {
                let owner = ctl.model().sections().iter().find(|s| match &s.entry {
                    NavEntry::ThreeLevelMega { panels, .. } => panels.contains(panel),
                    _ => false,
                });
                prop_assert!(owner.is_some_and(|s| state.is_section_expanded(s.id)));
            }

            let open = match state.breakpoint() {
                Breakpoint::Desktop => state.expanded_section().is_some(),
                Breakpoint::Mobile => state.nav_expanded(),
            };
            prop_assert_eq!(ctl.lease_active(), open);

            if state.scroll_locked() {
                prop_assert!(!state.breakpoint().is_desktop());
                prop_assert!(state.nav_expanded());
            }

            let _ = render_nav(ctl.model(), ctl.state(), &config);
            prop_assert_eq!(ctl.state(), &state);
        }

        ctl.teardown();
        prop_assert!(!ctl.lease_active());
    }
}
