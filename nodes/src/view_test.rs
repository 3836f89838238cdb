use super::*;

fn two_child_tree() -> Vec<Node> {
    vec![Node::new(1, None, "Hi", "Hello").with_children(vec![
        Node::new(2, Some(NodeId(1)), "left", "").with_children(vec![Node::new(4, Some(NodeId(2)), "left leaf", "")]),
        Node::new(3, Some(NodeId(1)), "right", "").with_children(vec![Node::new(5, Some(NodeId(3)), "right leaf", "")]),
    ])]
}

fn ids(rows: &[TreeRow]) -> Vec<i64> {
    rows.iter().map(|r| r.id.0).collect()
}

// =============================================================
// Expansion
// =============================================================

#[test]
fn unknown_ids_default_to_expanded() {
    let expansion = Expansion::default();
    assert!(expansion.is_expanded(NodeId(42)));
}

#[test]
fn toggle_flips_and_reports_state() {
    let mut expansion = Expansion::default();
    assert!(!expansion.toggle(NodeId(1)));
    assert!(!expansion.is_expanded(NodeId(1)));
    assert!(expansion.toggle(NodeId(1)));
    assert!(expansion.is_expanded(NodeId(1)));
}

#[test]
fn clones_stay_independent_after_edits() {
    let mut expansion = Expansion::default();
    expansion.set_expanded(NodeId(2), false);
    let copy = expansion.clone();
    assert_eq!(copy, expansion);

    expansion.set_expanded(NodeId(2), true);
    assert!(!copy.is_expanded(NodeId(2)));
    assert!(expansion.is_expanded(NodeId(2)));
    assert_ne!(copy, expansion);
}

#[test]
fn reset_expands_everything() {
    let mut expansion = Expansion::default();
    expansion.set_expanded(NodeId(1), false);
    expansion.set_expanded(NodeId(2), false);
    expansion.reset();
    assert!(expansion.is_expanded(NodeId(1)));
    assert!(expansion.is_expanded(NodeId(2)));
}

// =============================================================
// visible_rows
// =============================================================

#[test]
fn expanded_forest_lists_preorder_with_depths() {
    let rows = visible_rows(&two_child_tree(), &Expansion::default(), None);
    assert_eq!(ids(&rows), vec![1, 2, 4, 3, 5]);
    let depths: Vec<_> = rows.iter().map(|r| r.depth).collect();
    assert_eq!(depths, vec![0, 1, 2, 1, 2]);
    assert!(rows[0].has_children);
    assert!(!rows[2].has_children);
}

#[test]
fn collapsing_parent_hides_both_subtrees_and_keeps_child_state() {
    let forest = two_child_tree();
    let mut expansion = Expansion::default();
    expansion.set_expanded(NodeId(3), false);

    expansion.set_expanded(NodeId(1), false);
    let rows = visible_rows(&forest, &expansion, None);
    assert_eq!(ids(&rows), vec![1]);
    assert!(!rows[0].expanded);

    expansion.set_expanded(NodeId(1), true);
    let rows = visible_rows(&forest, &expansion, None);
    assert_eq!(ids(&rows), vec![1, 2, 4, 3]);
    assert!(rows[1].expanded);
    assert!(!rows[3].expanded);
}

#[test]
fn only_the_selected_row_is_marked() {
    let rows = visible_rows(&two_child_tree(), &Expansion::default(), Some(NodeId(2)));
    let selected: Vec<_> = rows.iter().filter(|r| r.selected).map(|r| r.id.0).collect();
    assert_eq!(selected, vec![2]);
}

#[test]
fn rows_carry_previews() {
    let forest = vec![Node::new(9, None, "", "")];
    let rows = visible_rows(&forest, &Expansion::default(), None);
    assert_eq!(rows[0].preview, "(no prompt)");
}

// =============================================================
// sidebar_view
// =============================================================

#[test]
fn sidebar_loading_wins_over_content() {
    let view = sidebar_view(true, &two_child_tree(), &Expansion::default(), None);
    assert_eq!(view, SidebarView::Loading);
}

#[test]
fn sidebar_empty_forest() {
    assert_eq!(sidebar_view(false, &[], &Expansion::default(), None), SidebarView::Empty);
}

#[test]
fn sidebar_rows_when_loaded() {
    let view = sidebar_view(false, &two_child_tree(), &Expansion::default(), None);
    assert!(matches!(view, SidebarView::Rows(rows) if rows.len() == 5));
}

// =============================================================
// PanelView
// =============================================================

#[test]
fn panel_for_protected_root_shows_notice() {
    let panel = PanelView::from_node(&Node::new(1, None, "Hi", "Hello"));
    assert_eq!(panel.branch_action, BranchAction::Protected);
    assert_eq!(panel.depth, 0);
    assert_eq!(panel.title(), "Node #1");
}

#[test]
fn panel_for_regular_node_offers_delete() {
    let mut node = Node::new(2, Some(NodeId(1)), "How are you?", "Good");
    node.depth = Some(1);
    node.summary = Some("   ".to_owned());
    let panel = PanelView::from_node(&node);
    assert_eq!(panel.branch_action, BranchAction::Delete);
    assert_eq!(panel.depth, 1);
    assert_eq!(panel.prompt, "How are you?");
    assert_eq!(panel.response, "Good");
    assert!(panel.summary.is_none());
}
