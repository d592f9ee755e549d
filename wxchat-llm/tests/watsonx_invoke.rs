use httpmock::prelude::*;
use serde_json::json;
use wxchat_core::Runnable;
use wxchat_llm::{LlmRequest, Message, WatsonxClient};

fn client(server: &MockServer) -> WatsonxClient {
    WatsonxClient::builder()
        .base_url(server.url(""))
        .iam_url(server.url(""))
        .api_key("apikey")
        .project_id("proj-1")
        .build()
        .expect("client")
}

fn mock_iam(server: &MockServer) {
    server.mock(|when, then| {
        when.method(POST).path("/identity/token");
        then.status(200)
            .json_body(json!({"access_token": "tok-abc"}));
    });
}

#[tokio::test]
async fn chat_maps_first_choice_content() {
    let server = MockServer::start();
    mock_iam(&server);
    let chat = server.mock(|when, then| {
        when.method(POST)
            .path("/ml/v1/text/chat")
            .header("authorization", "Bearer tok-abc");
        then.status(200).json_body(json!({
            "choices": [{"message": {"role": "assistant", "content": "hello there"}}]
        }));
    });

    let req = LlmRequest {
        model: String::new(),
        messages: vec![Message::user("hi")],
    };
    let resp = client(&server).invoke(req).await.expect("invoke");
    assert_eq!(resp.content, "hello there");
    chat.assert();
}

#[tokio::test]
async fn chat_request_carries_project_and_model() {
    let server = MockServer::start();
    mock_iam(&server);
    let chat = server.mock(|when, then| {
        when.method(POST)
            .path("/ml/v1/text/chat")
            .json_body_partial(
                r#"{"model_id": "ibm/granite-3-3-8b-instruct", "project_id": "proj-1"}"#,
            );
        then.status(200)
            .json_body(json!({"choices": [{"message": {"content": "ok"}}]}));
    });

    let req = LlmRequest {
        model: String::new(),
        messages: vec![Message::user("hi")],
    };
    client(&server).invoke(req).await.expect("invoke");
    chat.assert();
}

#[tokio::test]
async fn generate_text_returns_first_result() {
    let server = MockServer::start();
    mock_iam(&server);
    server.mock(|when, then| {
        when.method(POST).path("/ml/v1/text/generation");
        then.status(200).json_body(json!({
            "results": [{"generated_text": "powervs"}]
        }));
    });

    let text = client(&server)
        .generate_text("classify this")
        .await
        .expect("generate");
    assert_eq!(text, "powervs");
}

#[tokio::test]
async fn prompt_invoke_uses_generation_endpoint() {
    let server = MockServer::start();
    mock_iam(&server);
    let generation = server.mock(|when, then| {
        when.method(POST).path("/ml/v1/text/generation");
        then.status(200).json_body(json!({
            "results": [{"generated_text": "schematics"}]
        }));
    });

    let text: String = client(&server)
        .invoke("classify this".to_string())
        .await
        .expect("invoke");
    assert_eq!(text, "schematics");
    generation.assert();
}

#[tokio::test]
async fn provider_error_carries_status_and_body() {
    let server = MockServer::start();
    mock_iam(&server);
    server.mock(|when, then| {
        when.method(POST).path("/ml/v1/text/chat");
        then.status(500).body("model unavailable");
    });

    let req = LlmRequest {
        model: String::new(),
        messages: vec![Message::user("hi")],
    };
    let err = client(&server).invoke(req).await.unwrap_err();
    let text = err.to_string();
    assert!(text.contains("500"));
    assert!(text.contains("model unavailable"));
}

#[tokio::test]
async fn iam_failure_surfaces_as_provider_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/identity/token");
        then.status(401).body("bad key");
    });

    let err = client(&server).generate_text("x").await.unwrap_err();
    assert!(err.to_string().contains("IAM token exchange failed"));
}
