use chat_completion::{
    ChatCompletion, ClientConfig, ErrorKind, GenerationConfig, LlmError, Message,
};
use futures::StreamExt;
use serde_json::{Value, json};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, header, method, path},
};

fn client_for(server: &MockServer, model: &str) -> ChatCompletion {
    let config = ClientConfig::new("test_key", model)
        .expect("config")
        .with_base_url(server.uri());
    ChatCompletion::new(config).expect("client")
}

fn conversation() -> Vec<Message> {
    vec![Message::user("Say this is a test!")]
}

fn completion_body(content: Value) -> Value {
    json!({
        "id": "chatcmpl-abc123",
        "object": "chat.completion",
        "created": 1_700_000_000,
        "model": "gpt-4o-mini",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 12, "completion_tokens": 2, "total_tokens": 14 }
    })
}

fn chunk(delta: Value) -> String {
    let chunk = json!({
        "id": "chatcmpl-abc123",
        "object": "chat.completion.chunk",
        "model": "gpt-4o-mini",
        "choices": [{ "index": 0, "delta": delta, "finish_reason": null }]
    });
    format!("data: {chunk}\n\n")
}

fn event_stream(events: &[String]) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "text/event-stream")
        .set_body_string(events.concat())
}

#[tokio::test]
async fn generate_completion_returns_primary_choice_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test_key"))
        .and(body_json(json!({
            "model": "gpt-4o-mini",
            "messages": [{ "role": "user", "content": "Say this is a test!" }],
            "temperature": 0.7
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(json!(
            "Test response"
        ))))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, "gpt-4o-mini");
    let text = client
        .generate_completion(&conversation(), GenerationConfig::default())
        .await
        .expect("completion");

    assert_eq!(text, "Test response");
}

#[tokio::test]
async fn generate_completion_forwards_parameters() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(json!("ok"))))
        .mount(&server)
        .await;

    let client = client_for(&server, "gpt-4.1");
    let messages = vec![
        Message::system("You are terse."),
        Message::user("Hi"),
        Message::assistant("Hello."),
        Message::user("Again"),
    ];
    client
        .generate_completion(&messages, GenerationConfig::new().temperature(0.0).max_tokens(32))
        .await
        .expect("completion");

    let requests = server.received_requests().await.expect("recorded requests");
    assert_eq!(requests.len(), 1);

    let body: Value = serde_json::from_slice(&requests[0].body).expect("json body");
    assert_eq!(body["model"], "gpt-4.1");
    assert_eq!(body["temperature"], 0.0);
    assert_eq!(body["max_tokens"], 32);
    assert!(body.get("stream").is_none());

    let roles: Vec<&str> = body["messages"]
        .as_array()
        .expect("messages")
        .iter()
        .map(|m| m["role"].as_str().unwrap())
        .collect();
    assert_eq!(roles, vec!["system", "user", "assistant", "user"]);
}

#[tokio::test]
async fn generate_completion_with_null_content_is_empty_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(Value::Null)))
        .mount(&server)
        .await;

    let client = client_for(&server, "gpt-4o-mini");
    let err = client
        .generate_completion(&conversation(), GenerationConfig::default())
        .await
        .unwrap_err();

    assert!(matches!(err, LlmError::EmptyResponse(_)));
}

#[tokio::test]
async fn generate_completion_surfaces_api_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {
                "message": "Incorrect API key provided: test_key.",
                "type": "invalid_request_error",
                "code": "invalid_api_key"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, "gpt-4o-mini");
    let err = client
        .generate_completion(&conversation(), GenerationConfig::default())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Provider);
    match err {
        LlmError::Api {
            message,
            status_code,
        } => {
            assert_eq!(status_code, Some(401));
            assert_eq!(message, "Incorrect API key provided: test_key.");
        }
        other => panic!("Expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn server_errors_are_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, "gpt-4o-mini");
    let err = client
        .generate_completion(&conversation(), GenerationConfig::default())
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(503));
}

#[tokio::test]
async fn stream_completion_yields_fragments_in_order() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_json(json!({
            "model": "gpt-4o-mini",
            "messages": [{ "role": "user", "content": "Say this is a test!" }],
            "temperature": 0.7,
            "stream": true
        })))
        .respond_with(event_stream(&[
            chunk(json!({ "role": "assistant", "content": "Test " })),
            chunk(json!({ "content": "response" })),
            "data: [DONE]\n\n".to_string(),
        ]))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, "gpt-4o-mini");
    let fragments: Vec<String> = client
        .stream_completion(&conversation(), GenerationConfig::default())
        .await
        .expect("stream")
        .map(|fragment| fragment.expect("fragment"))
        .collect()
        .await;

    assert_eq!(fragments, vec!["Test ".to_string(), "response".to_string()]);
}

#[tokio::test]
async fn stream_completion_skips_units_without_content() {
    let server = MockServer::start().await;

    let usage_chunk = json!({
        "id": "chatcmpl-abc123",
        "object": "chat.completion.chunk",
        "choices": [],
        "usage": { "prompt_tokens": 12, "completion_tokens": 2, "total_tokens": 14 }
    });

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(event_stream(&[
            chunk(json!({ "role": "assistant" })),
            chunk(json!({ "content": "Test " })),
            chunk(json!({ "content": null })),
            chunk(json!({ "content": "response" })),
            chunk(json!({})),
            format!("data: {usage_chunk}\n\n"),
            "data: [DONE]\n\n".to_string(),
        ]))
        .mount(&server)
        .await;

    let client = client_for(&server, "gpt-4o-mini");
    let fragments: Vec<String> = client
        .stream_completion(&conversation(), GenerationConfig::default())
        .await
        .expect("stream")
        .map(|fragment| fragment.expect("fragment"))
        .collect()
        .await;

    assert_eq!(fragments, vec!["Test ".to_string(), "response".to_string()]);
}

#[tokio::test]
async fn stream_completion_fails_before_iteration_on_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": { "message": "Rate limit reached", "type": "requests" }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, "gpt-4o-mini");
    let result = client
        .stream_completion(&conversation(), GenerationConfig::default())
        .await;

    match result {
        Err(LlmError::Api { status_code, .. }) => assert_eq!(status_code, Some(429)),
        Err(other) => panic!("Expected Api error, got {other:?}"),
        Ok(_) => panic!("Expected the stream to fail before iteration"),
    }
}

#[tokio::test]
async fn stream_completion_keeps_partial_output_on_malformed_chunk() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(event_stream(&[
            chunk(json!({ "content": "Test " })),
            "data: {not json\n\n".to_string(),
            chunk(json!({ "content": "response" })),
            "data: [DONE]\n\n".to_string(),
        ]))
        .mount(&server)
        .await;

    let client = client_for(&server, "gpt-4o-mini");
    let items: Vec<Result<String, LlmError>> = client
        .stream_completion(&conversation(), GenerationConfig::default())
        .await
        .expect("stream")
        .collect()
        .await;

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].as_ref().expect("first fragment"), "Test ");
    assert!(matches!(items[1], Err(LlmError::Parse { .. })));
}

#[tokio::test]
async fn stream_completion_surfaces_in_band_error_events() {
    let server = MockServer::start().await;

    let error_event = json!({
        "error": {
            "message": "The server had an error while processing your request.",
            "type": "server_error"
        }
    });

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(event_stream(&[
            chunk(json!({ "content": "Test " })),
            format!("data: {error_event}\n\n"),
        ]))
        .mount(&server)
        .await;

    let client = client_for(&server, "gpt-4o-mini");
    let items: Vec<Result<String, LlmError>> = client
        .stream_completion(&conversation(), GenerationConfig::default())
        .await
        .expect("stream")
        .collect()
        .await;

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].as_ref().expect("first fragment"), "Test ");
    match &items[1] {
        Err(LlmError::Api { message, .. }) => {
            assert_eq!(message, "The server had an error while processing your request.");
        }
        other => panic!("Expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn generate_completion_surfaces_error_in_successful_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": { "message": "Model overloaded", "type": "server_error" }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, "gpt-4o-mini");
    let err = client
        .generate_completion(&conversation(), GenerationConfig::default())
        .await
        .unwrap_err();

    match err {
        LlmError::Api { message, .. } => assert_eq!(message, "Model overloaded"),
        other => panic!("Expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_server_is_a_network_error_with_cause() {
    let config = ClientConfig::new("test_key", "gpt-4o-mini")
        .expect("config")
        .with_base_url("http://127.0.0.1:1");
    let client = ChatCompletion::new(config).expect("client");

    let err = client
        .generate_completion(&conversation(), GenerationConfig::default())
        .await
        .unwrap_err();

    assert!(matches!(err, LlmError::Network { .. }));
    assert!(err.to_string().contains("127.0.0.1:1"));
}

#[test]
fn missing_api_key_fails_construction() {
    let result = ClientConfig::from_lookup(|_| None);

    let err = result.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert!(
        err.to_string()
            .contains("OPENAI_API_KEY not found in environment variables")
    );
}
