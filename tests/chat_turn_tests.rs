//! End-to-end chat turns: real GroqProvider against a mock endpoint, with a
//! scripted tool transport standing in for the MCP server.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use paperchat::chat::{ChatSession, ToolTransport};
use paperchat::error::{ChatError, Result};
use paperchat::models::GroqModel;
use paperchat::provider::groq::GroqProvider;
use paperchat::provider::ToolDefinition;
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct ArxivStub {
    calls: Mutex<Vec<(String, serde_json::Value)>>,
}

impl ArxivStub {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl ToolTransport for ArxivStub {
    fn tool_definitions(&self) -> Vec<ToolDefinition> {
        vec![ToolDefinition {
            name: "search_papers".into(),
            description: "Search arXiv for papers".into(),
            parameters: json!({
                "type": "object",
                "properties": { "query": { "type": "string" } }
            }),
        }]
    }

    async fn call(&self, name: &str, arguments: serde_json::Value) -> Result<serde_json::Value> {
        self.calls
            .lock()
            .unwrap()
            .push((name.to_string(), arguments));
        if name != "search_papers" {
            return Err(ChatError::UnknownTool(name.to_string()));
        }
        Ok(json!({
            "papers": [
                { "id": "quant-ph/9508027", "title": "Simulating Physics with Computers" }
            ]
        }))
    }
}

fn session_against(server: &MockServer, stub: Arc<ArxivStub>) -> ChatSession {
    let provider = GroqProvider::new(GroqModel::default(), "gsk_test".into(), Some(server.uri()));
    ChatSession::new(Arc::new(provider), stub)
}

#[tokio::test]
async fn tool_call_turn_synthesizes_results_into_prose() {
    let server = MockServer::start().await;

    // follow-up request carries the tool-role result; match it first
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("\"role\":\"tool\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": "Feynman's 1982 paper proposes simulating physics with computers."
                },
                "finish_reason": "stop"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": {
                            "name": "search_papers",
                            "arguments": "{\"query\": \"quantum computing Feynman\"}"
                        }
                    }]
                },
                "finish_reason": "tool_calls"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let stub = ArxivStub::new();
    let session = session_against(&server, stub.clone());

    let answer = session
        .process_query("find papers on quantum computing by Feynman")
        .await
        .unwrap();

    assert_eq!(
        answer,
        "Feynman's 1982 paper proposes simulating physics with computers."
    );

    let calls = stub.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "search_papers");
    assert_eq!(calls[0].1["query"], "quantum computing Feynman");
}

#[tokio::test]
async fn plain_turn_never_touches_the_tool_transport() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": "Hello!" },
                "finish_reason": "stop"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let stub = ArxivStub::new();
    let session = session_against(&server, stub.clone());

    let answer = session.process_query("hi").await.unwrap();
    assert_eq!(answer, "Hello!");
    assert!(stub.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn unreachable_endpoint_abandons_the_turn_without_tool_calls() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server); // nothing listening anymore

    let provider = GroqProvider::new(GroqModel::default(), "gsk_test".into(), Some(uri));
    let stub = ArxivStub::new();
    let session = ChatSession::new(Arc::new(provider), stub.clone());

    let err = session.process_query("hi").await.unwrap_err();
    assert!(matches!(err, ChatError::Network(_)));
    assert!(!err.is_fatal());
    assert!(stub.calls.lock().unwrap().is_empty());
}
