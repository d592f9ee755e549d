use httpmock::prelude::*;
use serde_json::json;
use wxchat_core::Runnable;
use wxchat_llm::{LlmRequest, Message, OpenAiCompatibleClient};

#[tokio::test]
async fn invoke_maps_response_content() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/chat/completions")
            .header("authorization", "Bearer sk-test");
        then.status(200).json_body(json!({
            "choices": [{"message": {"role": "assistant", "content": "hi"}}]
        }));
    });

    let client = OpenAiCompatibleClient::builder()
        .base_url(server.url(""))
        .api_key("sk-test")
        .build()
        .expect("client");

    let req = LlmRequest {
        model: String::new(),
        messages: vec![Message::user("hello")],
    };
    let resp = client.invoke(req).await.expect("invoke");
    assert_eq!(resp.content, "hi");
    mock.assert();
}

#[tokio::test]
async fn empty_model_falls_back_to_default() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/chat/completions")
            .json_body_partial(r#"{"model": "gpt-3.5-turbo"}"#);
        then.status(200)
            .json_body(json!({"choices": [{"message": {"content": "ok"}}]}));
    });

    let client = OpenAiCompatibleClient::builder()
        .base_url(server.url(""))
        .api_key("sk-test")
        .build()
        .expect("client");

    let req = LlmRequest {
        model: String::new(),
        messages: vec![Message::user("hello")],
    };
    client.invoke(req).await.expect("invoke");
    mock.assert();
}

#[tokio::test]
async fn api_error_message_is_extracted() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(429).json_body(json!({
            "error": {"message": "rate limited", "type": "requests"}
        }));
    });

    let client = OpenAiCompatibleClient::builder()
        .base_url(server.url(""))
        .api_key("sk-test")
        .build()
        .expect("client");

    let req = LlmRequest {
        model: String::new(),
        messages: vec![Message::user("hello")],
    };
    let err = client.invoke(req).await.unwrap_err();
    assert!(err.to_string().contains("rate limited"));
}

#[test]
fn builder_requires_base_url_and_key() {
    assert!(OpenAiCompatibleClient::builder().build().is_err());
    assert!(OpenAiCompatibleClient::builder()
        .base_url("http://localhost")
        .build()
        .is_err());
}
