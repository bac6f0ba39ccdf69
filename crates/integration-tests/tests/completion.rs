mod harness;

use axum::http::StatusCode;
use harness::config::{custom_provider, http_adapter};
use harness::mock_vendor::{MockVendor, closed_port};
use quill_llm::{FailureKind, Invocation, LiveOutput, LlmError};

fn invocation() -> Invocation {
    Invocation {
        prompt_text: "+pub fn render() {}".to_owned(),
        files: vec!["src/render.rs".to_owned()],
        ..Invocation::default()
    }
}

/// SSE body with each delta in its own `data:` record
fn openai_sse(deltas: &[&str]) -> String {
    let mut body = String::new();
    for delta in deltas {
        let record = serde_json::json!({"choices": [{"index": 0, "delta": {"content": delta}}]});
        body.push_str(&format!("data: {record}\n\n"));
    }
    body.push_str("data: [DONE]\n\n");
    body
}

/// Split `body` into chunks of `size` bytes, ignoring record boundaries
fn fragment(body: &str, size: usize) -> Vec<Vec<u8>> {
    body.as_bytes().chunks(size).map(<[u8]>::to_vec).collect()
}

#[tokio::test]
async fn openai_stream_with_thinking_resolves_answer() {
    let body = openai_sse(&["<think>", "compare\nthe two", " options</think>", "\n\nfeat(render): ", "add renderer"]);
    let mock = MockVendor::start(fragment(&body, 7)).await.unwrap();
    let config = custom_provider(&format!("{}/v1/", mock.base_url()), "openai", "r1-test");

    let live = LiveOutput::new();
    let answer = http_adapter(&config).complete(invocation(), &live).await.unwrap();

    assert_eq!(answer, "feat(render): add renderer");
    assert_eq!(live.answer(), "feat(render): add renderer");

    let requests = mock.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path, "/v1/chat/completions");
    assert_eq!(requests[0].headers["authorization"], "Bearer sk-integration");
    assert_eq!(requests[0].body["model"], "r1-test");
    assert_eq!(requests[0].body["stream"], true);
    assert_eq!(requests[0].body["messages"][0]["role"], "system");
}

#[tokio::test]
async fn ollama_ndjson_stream_without_credential() {
    let lines = [
        r#"{"model":"llama3","response":"fix","done":false}"#,
        r#"{"model":"llama3","response":": handle ","done":false}"#,
        r#"{"model":"llama3","response":"empty diff","done":true}"#,
    ]
    .join("\n");
    let mock = MockVendor::start(fragment(&lines, 11)).await.unwrap();
    let config = custom_provider(&mock.base_url(), "ollama", "llama3");

    let answer = http_adapter(&config)
        .complete(invocation(), &LiveOutput::new())
        .await
        .unwrap();

    assert_eq!(answer, "fix: handle empty diff");
    let request = &mock.requests()[0];
    assert_eq!(request.path, "/api/generate");
    assert!(request.headers.get("authorization").is_none());
    assert!(request.body["prompt"].as_str().unwrap().contains("src/render.rs"));
}

#[tokio::test]
async fn gemini_document_is_parsed_at_end() {
    let document = r#"{"candidates":[{"content":{"parts":[{"text":"```\ndocs: describe renderer\n```"}],"role":"model"}}]}"#;
    let mock = MockVendor::start(fragment(document, 16)).await.unwrap();
    let config = custom_provider(&mock.base_url(), "gemini", "gemini-test");

    let answer = http_adapter(&config)
        .complete(invocation(), &LiveOutput::new())
        .await
        .unwrap();

    assert_eq!(answer, "docs: describe renderer");
    let request = &mock.requests()[0];
    assert_eq!(request.path, "/v1beta/models/gemini-test:generateContent");
    assert_eq!(request.headers["x-goog-api-key"], "sk-integration");
}

#[tokio::test]
async fn gemini_error_document_surfaces_vendor_message() {
    let document = r#"{"error":{"code":429,"message":"Resource has been exhausted","status":"RESOURCE_EXHAUSTED"}}"#;
    let mock = MockVendor::start_with_status(StatusCode::TOO_MANY_REQUESTS, vec![document])
        .await
        .unwrap();
    let config = custom_provider(&mock.base_url(), "gemini", "gemini-test");

    let err = http_adapter(&config)
        .complete(invocation(), &LiveOutput::new())
        .await
        .unwrap_err();

    assert!(matches!(err, LlmError::TerminalParse(msg) if msg == "Gemini API error: Resource has been exhausted"));
}

#[tokio::test]
async fn anthropic_events_stream_text_and_thinking() {
    let body = [
        "event: message_start",
        r#"data: {"type":"message_start","message":{"id":"msg_1"}}"#,
        "",
        "event: content_block_delta",
        r#"data: {"type":"content_block_delta","index":0,"delta":{"type":"thinking_delta","thinking":"weigh scope"}}"#,
        "",
        "event: content_block_delta",
        r#"data: {"type":"content_block_delta","index":1,"delta":{"type":"text_delta","text":"refactor: split "}}"#,
        "",
        "event: content_block_delta",
        r#"data: {"type":"content_block_delta","index":1,"delta":{"type":"text_delta","text":"renderer"}}"#,
        "",
        "event: message_stop",
        r#"data: {"type":"message_stop"}"#,
        "",
    ]
    .join("\n");
    let mock = MockVendor::start(fragment(&body, 13)).await.unwrap();
    let config = custom_provider(&mock.base_url(), "anthropic", "claude-test");

    let live = LiveOutput::new();
    let answer = http_adapter(&config).complete(invocation(), &live).await.unwrap();

    assert_eq!(answer, "refactor: split renderer");
    assert_eq!(live.status(), "weigh scope");

    let request = &mock.requests()[0];
    assert_eq!(request.path, "/v1/messages");
    assert_eq!(request.headers["x-api-key"], "sk-integration");
    assert_eq!(request.headers["anthropic-version"], "2023-06-01");
}

#[tokio::test]
async fn error_status_body_becomes_terminal_failure() {
    let body = "{\n  \"error\": {\n    \"message\": \"Incorrect API key provided\",\n    \"type\": \"invalid_request_error\"\n  }\n}\n";
    let mock = MockVendor::start_with_status(StatusCode::UNAUTHORIZED, vec![body]).await.unwrap();
    let config = custom_provider(&mock.base_url(), "openai", "gpt-test");

    let err = http_adapter(&config)
        .complete(invocation(), &LiveOutput::new())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), FailureKind::TerminalParseError);
    assert_eq!(err.to_string(), "Incorrect API key provided");
}

#[tokio::test]
async fn reasoning_only_stream_is_empty_result() {
    let body = openai_sse(&["<think>", "I should look at the diff"]);
    let mock = MockVendor::start(vec![body]).await.unwrap();
    let config = custom_provider(&mock.base_url(), "openai", "r1-test");

    let err = http_adapter(&config)
        .complete(invocation(), &LiveOutput::new())
        .await
        .unwrap_err();

    assert!(matches!(err, LlmError::EmptyResult));
}

#[tokio::test]
async fn refused_connection_is_transport_error() {
    let addr = closed_port().await.unwrap();
    let config = custom_provider(&format!("http://{addr}/v1"), "openai", "gpt-test");

    let err = http_adapter(&config)
        .complete(invocation(), &LiveOutput::new())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), FailureKind::TransportError);
}
