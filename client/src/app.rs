//! Root application component: owns the session and lays out the page.

use std::future::Future;
use std::rc::Rc;

use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};
use nodes::view::{APP_TITLE, EMPTY_TREE_TEXT, LOADING_TEXT, NO_SELECTION_TEXT, SIDEBAR_TITLE};
use nodes::{Session, TreeState};

use crate::components::node_panel::NodePanel;
use crate::components::tree_display::TreeDisplay;
use crate::net::api::GlooTreeApi;
use crate::state::tree::SignalStore;
use crate::util::{config, dialogs::BrowserDialogs};

pub type AppSession = Session<GlooTreeApi, BrowserDialogs, SignalStore>;

/// The session lives on the UI thread only, hence local storage.
pub type SessionHandle = StoredValue<Rc<AppSession>, LocalStorage>;

/// Run a session operation on the local executor.
fn spawn_with<F, Fut>(session: SessionHandle, op: F)
where
    F: FnOnce(Rc<AppSession>) -> Fut,
    Fut: Future<Output = ()> + 'static,
{
    let session = session.get_value();
    leptos::task::spawn_local(op(session));
}

/// Root application component.
///
/// Provides the tree state signal as context, fetches the tree once on
/// mount, and wires every component callback to the session.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let state = RwSignal::new(TreeState::default());
    provide_context(state);

    let api = GlooTreeApi::new(config::backend_url());
    tracing::debug!(backend = %api.base_url(), "backend configured");
    let session: SessionHandle = StoredValue::new_local(Rc::new(Session::new(api, BrowserDialogs, SignalStore(state))));

    Effect::new(move || {
        spawn_with(session, |s| async move {
            s.fetch_tree().await;
        });
    });

    let loading = Memo::new(move |_| state.with(|s| s.loading));
    let tree = Memo::new(move |_| state.with(TreeState::snapshot));
    let selected = Memo::new(move |_| state.with(|s| s.selected));
    let expansion = Memo::new(move |_| state.with(|s| s.expansion.clone()));
    let panel = Memo::new(move |_| state.with(TreeState::panel));
    let message = Memo::new(move |_| state.with(|s| s.message.clone()));
    let busy = Memo::new(move |_| state.with(TreeState::is_busy));

    let on_select = Callback::new(move |id| session.with_value(|s| s.select(Some(id))));
    let on_toggle = Callback::new(move |id| {
        session.with_value(|s| {
            s.toggle(id);
        });
    });
    let on_message = Callback::new(move |text: String| session.with_value(|s| s.set_message(text)));
    let on_send = Callback::new(move |()| {
        spawn_with(session, |s| async move {
            if let Err(error) = s.send_message().await {
                tracing::debug!(%error, "send did not complete");
            }
        });
    });
    let on_delete_branch = Callback::new(move |()| {
        spawn_with(session, |s| async move {
            if let Err(error) = s.clear_branch().await {
                tracing::debug!(%error, "branch delete did not complete");
            }
        });
    });
    let on_delete_tree = Callback::new(move |()| {
        spawn_with(session, |s| async move {
            if let Err(error) = s.clear_tree().await {
                tracing::debug!(%error, "tree clear did not complete");
            }
        });
    });
    let on_refresh = move |_| {
        spawn_with(session, |s| async move {
            s.fetch_tree().await;
        });
    };

    view! {
        <Title text=APP_TITLE/>

        <div class="app">
            <aside class="sidebar">
                <h2>{SIDEBAR_TITLE}</h2>
                {move || {
                    if loading.get() {
                        view! { <p class="sidebar__loading">{LOADING_TEXT}</p> }.into_any()
                    } else if tree.with(|t| t.is_empty()) {
                        view! { <p class="sidebar__empty">{EMPTY_TREE_TEXT}</p> }.into_any()
                    } else {
                        view! {
                            <TreeDisplay
                                nodes=tree
                                selected=selected
                                expansion=expansion
                                on_select=on_select
                                on_toggle=on_toggle
                            />
                        }
                            .into_any()
                    }
                }}
                <button class="btn sidebar__refresh" on:click=on_refresh>
                    "\u{21bb} Refresh Tree"
                </button>
            </aside>

            <main class="main">
                <h1>{APP_TITLE}</h1>
                {move || match panel.get() {
                    Some(panel) => view! {
                        <NodePanel
                            panel=panel
                            message=message
                            busy=busy
                            on_message=on_message
                            on_send=on_send
                            on_delete_branch=on_delete_branch
                            on_delete_tree=on_delete_tree
                        />
                    }
                        .into_any(),
                    None => view! {
                        <div class="main__empty">
                            <p>{NO_SELECTION_TEXT}</p>
                        </div>
                    }
                        .into_any(),
                }}
            </main>
        </div>
    }
}
