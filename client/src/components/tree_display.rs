//! The forest: one [`TreeNode`] per root.

use leptos::prelude::*;
use nodes::{Expansion, NodeId, Snapshot};

use super::tree_node::TreeNode;

#[component]
pub fn TreeDisplay(
    #[prop(into)] nodes: Signal<Snapshot>,
    #[prop(into)] selected: Signal<Option<NodeId>>,
    #[prop(into)] expansion: Signal<Expansion>,
    on_select: Callback<NodeId>,
    on_toggle: Callback<NodeId>,
) -> impl IntoView {
    view! {
        <div class="tree-display">
            {move || {
                nodes
                    .get()
                    .iter()
                    .map(|root| {
                        view! {
                            <TreeNode
                                node=root.clone()
                                depth=0
                                selected=selected
                                expansion=expansion
                                on_select=on_select
                                on_toggle=on_toggle
                            />
                        }
                    })
                    .collect_view()
            }}
        </div>
    }
}
