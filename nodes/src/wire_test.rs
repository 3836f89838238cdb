use super::*;
use crate::node::{NodeIndex, find_node_by_id};
use crate::view::{Expansion, visible_rows};

/// One linear conversation `depth` turns long, nested the way `GET /tree`
/// returns it.
fn chain_payload(depth: u64) -> String {
    let mut json = String::from("[");
    for id in 1..=depth {
        let parent = if id == 1 { "null".to_owned() } else { (id - 1).to_string() };
        json.push_str(&format!(
            r#"{{"id":{id},"parent_id":{parent},"prompt":"turn {id}","response":"ok","depth":{},"children":["#,
            id - 1
        ));
    }
    json.push_str(&"]}".repeat(usize::try_from(depth).unwrap()));
    json.push(']');
    json
}

#[test]
fn chat_request_serializes_backend_shape() {
    let req = ChatRequest { message: "Tell me more".to_owned(), parent_id: NodeId(2) };
    assert_eq!(serde_json::to_string(&req).unwrap(), r#"{"message":"Tell me more","parent_id":2}"#);
}

#[test]
fn chat_response_needs_only_node_id() {
    let resp: ChatResponse = serde_json::from_str(r#"{"node_id":3}"#).unwrap();
    assert_eq!(resp.node_id, NodeId(3));
    assert!(resp.response.is_none());

    let full: ChatResponse =
        serde_json::from_str(r#"{"response":"Sure","node_id":4,"parent_id":2,"depth":2}"#).unwrap();
    assert_eq!(full.parent_id, Some(NodeId(2)));
    assert_eq!(full.depth, Some(2));
}

#[test]
fn clear_branch_response_tolerates_missing_ids() {
    let resp: ClearBranchResponse = serde_json::from_str("{}").unwrap();
    assert!(resp.deleted_ids.is_empty());
    let resp: ClearBranchResponse = serde_json::from_str(r#"{"deleted_ids":[4,5]}"#).unwrap();
    assert_eq!(resp.deleted_ids, vec![NodeId(4), NodeId(5)]);
}

#[test]
fn endpoints_join_without_double_slash() {
    assert_eq!(endpoint("http://localhost:8000/", TREE_PATH), "http://localhost:8000/tree");
    assert_eq!(endpoint("http://localhost:8000", CHAT_PATH), "http://localhost:8000/chat");
    assert_eq!(clear_branch_path(NodeId(12)), "/clear/12");
}

// =============================================================
// ErrorBody
// =============================================================

#[test]
fn error_body_reads_detail_string() {
    let body = ErrorBody::parse(r#"{"detail":"parent_id not found"}"#).unwrap();
    assert_eq!(body.detail, "parent_id not found");
}

#[test]
fn error_body_keeps_structured_detail_as_json() {
    let body = ErrorBody::parse(r#"{"detail":[{"loc":["body","message"]}]}"#).unwrap();
    assert_eq!(body.detail, r#"[{"loc":["body","message"]}]"#);
}

#[test]
fn error_body_falls_back_to_message_key_then_raw_text() {
    assert_eq!(ErrorBody::parse(r#"{"message":"nope"}"#).unwrap().detail, "nope");
    assert_eq!(ErrorBody::parse("Internal Server Error").unwrap().detail, "Internal Server Error");
    assert_eq!(ErrorBody::parse(r#"{"other":1}"#).unwrap().detail, r#"{"other":1}"#);
}

#[test]
fn error_body_blank_is_none() {
    assert!(ErrorBody::parse("").is_none());
    assert!(ErrorBody::parse("  \n").is_none());
}

// =============================================================
// ApiError
// =============================================================

#[test]
fn status_error_display_includes_detail() {
    let err = ApiError::from_status(404, r#"{"detail":"node not found"}"#);
    assert_eq!(err.to_string(), "backend returned status 404: node not found");
    assert_eq!(err.status(), Some(404));
    assert!(err.is_rejection());
}

#[test]
fn status_error_display_without_body() {
    let err = ApiError::from_status(500, "");
    assert_eq!(err.to_string(), "backend returned status 500");
}

#[test]
fn transport_error_is_not_rejection() {
    let err = ApiError::Transport("connection refused".to_owned());
    assert!(!err.is_rejection());
    assert!(err.status().is_none());
    assert_eq!(err.to_string(), "request failed: connection refused");
}

#[test]
fn deep_conversation_decodes_and_resolves() {
    let forest = decode_forest(&chain_payload(250)).unwrap();
    assert_eq!(forest.len(), 1);

    let leaf = find_node_by_id(&forest, NodeId(250)).unwrap();
    assert_eq!(leaf.parent_id, Some(NodeId(249)));
    assert_eq!(leaf.prompt, "turn 250");

    let index = NodeIndex::build(&forest);
    assert_eq!(index.len(), 250);
    assert_eq!(index.get(&forest, NodeId(250)), Some(leaf));

    let mut expansion = Expansion::default();
    let rows = visible_rows(&forest, &expansion, Some(NodeId(250)));
    assert_eq!(rows.len(), 250);
    assert_eq!(rows[249].depth, 249);
    assert!(rows[249].selected);

    expansion.set_expanded(NodeId(1), false);
    assert_eq!(visible_rows(&forest, &expansion, None).len(), 1);
}

#[test]
fn forest_decode_rejects_malformed_bodies() {
    assert!(matches!(decode_forest(r#"{"id":1}"#), Err(ApiError::Decode(_))));
    assert!(matches!(decode_forest("[] trailing"), Err(ApiError::Decode(_))));
    assert_eq!(decode_forest("[]").unwrap(), Vec::<Node>::new());
}
