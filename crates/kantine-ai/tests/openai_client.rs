//! Integration tests for the OpenAI completion client and the parser on top of it.
//!
//! Uses wiremock for HTTP mocking.

use kantine_ai::{AiParser, CompletionClient, ExtractError, OpenAiClient, OpenAiConfig, Turn};
use kantine_core::Weekday;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MENU_JSON: &str =
    r#"{"mandag": ["Fiskesuppe"], "tirsdag": [], "onsdag": [], "torsdag": [], "fredag": ["Pizza"]}"#;

fn client_for(server: &MockServer) -> OpenAiClient {
    let config = OpenAiConfig {
        api_key: Some("sk-test".into()),
        organization: Some("org-test".into()),
        base_url: format!("{}/v1/", server.uri()),
        ..OpenAiConfig::default()
    };
    OpenAiClient::from_config(&config).expect("client builds")
}

fn chat_reply(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [
            {"index": 0, "message": {"role": "assistant", "content": content}, "finish_reason": "stop"}
        ]
    }))
}

#[tokio::test]
async fn test_complete_sends_prompt_and_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(header("openai-organization", "org-test"))
        .and(body_partial_json(json!({
            "model": "gpt-3.5-turbo",
            "temperature": 0.0,
            "messages": [
                {"role": "system", "content": "menu please"},
                {"role": "user", "content": "Mandag\n\nFiskesuppe"}
            ]
        })))
        .respond_with(chat_reply(MENU_JSON))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let reply = client
        .complete(&[Turn::system("menu please")], "Mandag\n\nFiskesuppe")
        .await
        .expect("completion succeeds");
    assert_eq!(reply, MENU_JSON);
}

#[tokio::test]
async fn test_complete_maps_error_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.complete(&[], "text").await.unwrap_err();
    match err {
        ExtractError::Api { status, body } => {
            assert_eq!(status, 429);
            assert_eq!(body, "rate limited");
        }
        other => panic!("expected API error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_complete_without_choices_is_a_validation_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.complete(&[], "text").await.unwrap_err();
    assert!(matches!(err, ExtractError::Validation(_)));
}

#[tokio::test]
async fn test_parser_escalates_over_http() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(chat_reply("Sorry, I can only describe the menu in prose."))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(chat_reply(&format!("```json\n{MENU_JSON}\n```")))
        .expect(1)
        .mount(&server)
        .await;

    let parser = AiParser::new(Some(client_for(&server)));
    let menu = parser.parse("Mandag\n\nFiskesuppe\n\nFredag\n\nPizza").await.unwrap();
    assert_eq!(menu.dishes(Weekday::Mandag), ["Fiskesuppe"]);
    assert_eq!(menu.dishes(Weekday::Fredag), ["Pizza"]);
    assert!(menu.dishes(Weekday::Onsdag).is_empty());
}

#[tokio::test]
async fn test_parser_stops_on_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;

    let parser = AiParser::new(Some(client_for(&server)));
    let err = parser.parse("Mandag\n\nFiskesuppe").await.unwrap_err();
    assert!(matches!(err, ExtractError::Api { status: 500, .. }));
}
