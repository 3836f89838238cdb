//! Detail view of the selected node with branch and delete actions.

#[cfg(test)]
#[path = "node_panel_test.rs"]
mod node_panel_test;

use leptos::prelude::*;
use nodes::view::PROTECTED_ROOT_NOTICE;
use nodes::{BranchAction, PanelView};

/// Node panel.
///
/// Shows the selected node's prompt and response, a draft box bound to the
/// session's message, and the delete-branch / delete-tree buttons. The
/// protected root gets a notice in place of the branch button. Buttons are
/// only disabled while a mutation is in flight; empty drafts reach the
/// controller, which refuses them with an alert.
#[component]
pub fn NodePanel(
    panel: PanelView,
    #[prop(into)] message: Signal<String>,
    #[prop(into)] busy: Signal<bool>,
    on_message: Callback<String>,
    on_send: Callback<()>,
    on_delete_branch: Callback<()>,
    on_delete_tree: Callback<()>,
) -> impl IntoView {
    let title = panel.title();
    let depth = depth_label(panel.depth);
    let summary = panel.summary.clone();
    let timestamp = panel.timestamp.clone();

    let on_keydown = move |ev: leptos::ev::KeyboardEvent| {
        if ev.key() == "Enter" && (ev.ctrl_key() || ev.meta_key()) {
            ev.prevent_default();
            on_send.run(());
        }
    };

    let branch_action = match panel.branch_action {
        BranchAction::Delete => view! {
            <button class="btn btn--danger" on:click=move |_| on_delete_branch.run(()) disabled=move || busy.get()>
                "Clear Current Branch"
            </button>
        }
        .into_any(),
        BranchAction::Protected => view! { <p class="node-panel__notice">{PROTECTED_ROOT_NOTICE}</p> }.into_any(),
    };

    view! {
        <section class="node-panel">
            <header class="node-panel__header">
                <h2>{title}</h2>
                <span class="node-panel__depth">{depth}</span>
            </header>

            <div class="node-panel__block">
                <h3>"Prompt"</h3>
                <p class="node-panel__text">{panel.prompt}</p>
            </div>
            <div class="node-panel__block">
                <h3>"Response"</h3>
                <p class="node-panel__text">{panel.response}</p>
            </div>
            {summary
                .map(|summary| {
                    view! {
                        <div class="node-panel__block node-panel__block--muted">
                            <h3>"Summary"</h3>
                            <p class="node-panel__text">{summary}</p>
                        </div>
                    }
                })}
            {timestamp.map(|ts| view! { <p class="node-panel__timestamp">{ts}</p> })}

            <div class="node-panel__compose">
                <h3>"Create Branch"</h3>
                <p>"Send a new message from this node:"</p>
                <textarea
                    class="node-panel__input"
                    rows="5"
                    placeholder="Type your message here..."
                    prop:value=move || message.get()
                    on:input=move |ev| on_message.run(event_target_value(&ev))
                    on:keydown=on_keydown
                ></textarea>
                <button class="btn btn--primary" on:click=move |_| on_send.run(()) disabled=move || busy.get()>
                    "Send Message"
                </button>
            </div>

            <div class="node-panel__actions">
                {branch_action}
                <button class="btn btn--danger" on:click=move |_| on_delete_tree.run(()) disabled=move || busy.get()>
                    "Clear Entire Tree"
                </button>
            </div>
        </section>
    }
}

pub fn depth_label(depth: u32) -> String {
    format!("Depth: {depth}")
}
