use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::Cursor;
use std::sync::Mutex;

use nodes::session::{ALERT_EMPTY_MESSAGE, ALERT_PROTECTED_ROOT, CONFIRM_CLEAR_TREE};
use nodes::{ApiError, ChatRequest, ChatResponse, Node, TreeState};

use super::*;

// =============================================================
// Scripted backend
// =============================================================

#[derive(Default)]
struct ScriptedApi {
    trees: Mutex<VecDeque<Vec<Node>>>,
    chats: Mutex<VecDeque<Result<ChatResponse, ApiError>>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedApi {
    fn with_tree(self, tree: Vec<Node>) -> Self {
        self.trees.lock().unwrap().push_back(tree);
        self
    }

    fn with_chat(self, reply: Result<ChatResponse, ApiError>) -> Self {
        self.chats.lock().unwrap().push_back(reply);
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait(?Send)]
impl TreeApi for ScriptedApi {
    async fn fetch_tree(&self) -> Result<Vec<Node>, ApiError> {
        self.calls.lock().unwrap().push("GET /tree".to_owned());
        self.trees
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| ApiError::Transport("no scripted tree".to_owned()))
    }

    async fn send_chat(&self, request: &ChatRequest) -> Result<ChatResponse, ApiError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("POST /chat {} {}", request.parent_id, request.message));
        self.chats.lock().unwrap().pop_front().unwrap_or(Err(ApiError::Unavailable))
    }

    async fn clear_branch(&self, id: NodeId) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(format!("DELETE /clear/{id}"));
        Ok(())
    }

    async fn clear_tree(&self) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push("DELETE /clear".to_owned());
        Ok(())
    }
}

type TestSession = Session<ScriptedApi, Console<Cursor<Vec<u8>>, Vec<u8>>, RefCell<TreeState>>;

fn session(api: ScriptedApi, input: &str) -> TestSession {
    let console = Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new());
    Session::new(api, console, RefCell::new(TreeState::default()))
}

fn output(session: &TestSession) -> String {
    String::from_utf8(session.dialogs().output().clone()).unwrap()
}

fn hi_tree() -> Vec<Node> {
    vec![Node::new(1, None, "Hi", "Hello!").with_children(vec![Node::new(2, Some(NodeId(1)), "How are you?", "Good")])]
}

fn chat_reply(id: i64) -> ChatResponse {
    ChatResponse { node_id: NodeId(id), response: None, parent_id: None, depth: None }
}

// =============================================================
// Parsing
// =============================================================

#[test]
fn parses_every_command() {
    let cases = [
        ("tree", ShellCommand::Tree),
        ("ls", ShellCommand::Tree),
        ("refresh", ShellCommand::Refresh),
        ("select 7", ShellCommand::Select(NodeId(7))),
        ("select #7", ShellCommand::Select(NodeId(7))),
        ("toggle 3", ShellCommand::Toggle(NodeId(3))),
        ("show", ShellCommand::Show),
        ("draft Tell me more", ShellCommand::Draft("Tell me more".to_owned())),
        ("send", ShellCommand::Send),
        ("say  spaced  out ", ShellCommand::Say(" spaced  out ".to_owned())),
        ("delete", ShellCommand::Delete),
        ("clear", ShellCommand::Clear),
        ("help", ShellCommand::Help),
        ("?", ShellCommand::Help),
        ("quit", ShellCommand::Quit),
        ("EXIT", ShellCommand::Quit),
    ];
    for (line, expected) in cases {
        assert_eq!(line.parse::<ShellCommand>(), Ok(expected), "{line}");
    }
}

#[test]
fn bare_draft_clears_the_draft() {
    assert_eq!("draft".parse::<ShellCommand>(), Ok(ShellCommand::Draft(String::new())));
}

#[test]
fn parse_errors_name_the_problem() {
    assert_eq!("frobnicate".parse::<ShellCommand>(), Err(CommandError::Unknown("frobnicate".to_owned())));
    assert_eq!("select".parse::<ShellCommand>(), Err(CommandError::MissingArgument("select")));
    assert_eq!("toggle abc".parse::<ShellCommand>(), Err(CommandError::InvalidId("abc".to_owned())));
    assert_eq!("say   ".parse::<ShellCommand>(), Err(CommandError::MissingArgument("say")));
}

// =============================================================
// Loop
// =============================================================

#[tokio::test]
async fn startup_fetches_and_prints_tree_then_stops_at_eof() {
    let session = session(ScriptedApi::default().with_tree(hi_tree()), "");
    run(&session).await.unwrap();

    let out = output(&session);
    assert!(out.starts_with("AI Memory Tree Chat\nConversation Tree\n"));
    assert!(out.contains("▼ #1 Hi"));
    assert!(out.contains("· #2 How are you?"));
    assert_eq!(session.api().calls(), vec!["GET /tree"]);
}

#[tokio::test]
async fn say_branches_from_selection_and_shows_new_node() {
    let after = vec![Node::new(1, None, "Hi", "Hello!").with_children(vec![
        Node::new(2, Some(NodeId(1)), "How are you?", "Good"),
        Node::new(3, Some(NodeId(1)), "Tell me more", "Sure"),
    ])];
    let api = ScriptedApi::default()
        .with_tree(hi_tree())
        .with_chat(Ok(chat_reply(3)))
        .with_tree(after);
    let session = session(api, "select 1\nsay Tell me more\nquit\n");
    run(&session).await.unwrap();

    assert_eq!(session.api().calls(), vec!["GET /tree", "POST /chat 1 Tell me more", "GET /tree"]);
    let state = session.store().borrow();
    assert_eq!(state.selected, Some(NodeId(3)));
    assert!(state.message.is_empty());
    drop(state);
    let out = output(&session);
    assert!(out.contains(">   · #3 Tell me more"));
    assert!(out.contains("Node #3 (depth 0)"));
}

#[tokio::test]
async fn send_without_draft_alerts() {
    let session = session(ScriptedApi::default().with_tree(hi_tree()), "select 2\nsend\n");
    run(&session).await.unwrap();
    assert!(output(&session).contains(ALERT_EMPTY_MESSAGE));
    assert_eq!(session.api().calls(), vec!["GET /tree"]);
}

#[tokio::test]
async fn deleting_the_root_is_refused() {
    let session = session(ScriptedApi::default().with_tree(hi_tree()), "select 1\ndelete\n");
    run(&session).await.unwrap();
    assert!(output(&session).contains(ALERT_PROTECTED_ROOT));
    assert_eq!(session.api().calls(), vec!["GET /tree"]);
}

#[tokio::test]
async fn declined_clear_prints_cancelled() {
    let session = session(ScriptedApi::default().with_tree(hi_tree()), "clear\nno\n");
    run(&session).await.unwrap();
    let out = output(&session);
    assert!(out.contains(&format!("{CONFIRM_CLEAR_TREE} [y/N] Cancelled")));
    assert_eq!(session.api().calls(), vec!["GET /tree"]);
}

#[tokio::test]
async fn confirmed_branch_delete_refetches() {
    let after = vec![Node::new(1, None, "Hi", "Hello!")];
    let api = ScriptedApi::default().with_tree(hi_tree()).with_tree(after);
    let session = session(api, "select 2\ndelete\ny\n");
    run(&session).await.unwrap();

    assert_eq!(session.api().calls(), vec!["GET /tree", "DELETE /clear/2", "GET /tree"]);
    assert!(output(&session).contains("Branch deleted"));
    assert_eq!(session.store().borrow().selected, None);
}

#[tokio::test]
async fn unknown_ids_and_commands_are_reported() {
    let session = session(ScriptedApi::default().with_tree(hi_tree()), "select 9\ntoggle 9\nfly\n");
    run(&session).await.unwrap();
    let out = output(&session);
    assert_eq!(out.matches("No node #9 in the tree").count(), 2);
    assert!(out.contains("unknown command 'fly' (try `help`)"));
    assert_eq!(session.store().borrow().selected, None);
}

#[tokio::test]
async fn toggle_collapses_children() {
    let session = session(ScriptedApi::default().with_tree(hi_tree()), "toggle 1\n");
    run(&session).await.unwrap();
    let out = output(&session);
    assert!(out.contains("▶ #1 Hi"));
    assert!(!session.store().borrow().expansion.is_expanded(NodeId(1)));
}
