//! One tree row plus, when expanded, its children.

#[cfg(test)]
#[path = "tree_node_test.rs"]
mod tree_node_test;

use leptos::prelude::*;
use nodes::{Expansion, Node, NodeId};

/// Horizontal indent per nesting level, in pixels.
pub const INDENT_PX: usize = 16;

/// Recursive tree node.
///
/// Expand state is read from the shared [`Expansion`] map rather than held
/// per component, so collapsing this node keeps each hidden descendant's
/// own state for when it is shown again.
#[component]
pub fn TreeNode(
    node: Node,
    depth: usize,
    #[prop(into)] selected: Signal<Option<NodeId>>,
    #[prop(into)] expansion: Signal<Expansion>,
    on_select: Callback<NodeId>,
    on_toggle: Callback<NodeId>,
) -> AnyView {
    let id = node.id;
    let has_children = node.has_children();
    let preview = node.preview();
    let children = node.children;

    let expanded = move || expansion.with(|e| e.is_expanded(id));
    let class = move || row_class(selected.get() == Some(id));

    let on_toggle_click = move |ev: leptos::ev::MouseEvent| {
        ev.stop_propagation();
        on_toggle.run(id);
    };

    view! {
        <div class="tree-node">
            <div
                class=class
                style:padding-left=indent(depth)
                on:click=move |_| on_select.run(id)
            >
                {has_children
                    .then(|| {
                        view! {
                            <button class="tree-node__toggle" on:click=on_toggle_click>
                                {move || toggle_glyph(expanded())}
                            </button>
                        }
                    })}
                <span class="tree-node__id">{format!("#{id}")}</span>
                <span class="tree-node__preview">{preview}</span>
            </div>
            {move || {
                (has_children && expanded())
                    .then(|| {
                        children
                            .iter()
                            .map(|child| {
                                view! {
                                    <TreeNode
                                        node=child.clone()
                                        depth=depth + 1
                                        selected=selected
                                        expansion=expansion
                                        on_select=on_select
                                        on_toggle=on_toggle
                                    />
                                }
                            })
                            .collect_view()
                    })
            }}
        </div>
    }
    .into_any()
}

pub fn row_class(selected: bool) -> &'static str {
    if selected { "tree-node__row tree-node__row--selected" } else { "tree-node__row" }
}

pub fn toggle_glyph(expanded: bool) -> &'static str {
    if expanded { "\u{25bc}" } else { "\u{25b6}" }
}

pub fn indent(depth: usize) -> String {
    format!("{}px", depth * INDENT_PX)
}
