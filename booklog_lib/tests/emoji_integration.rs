use booklog_lib::emoji::FALLBACK_EMOJI;
use booklog_lib::{EmojiConfig, EmojiSuggester};
use serde_json::json;
use wiremock::matchers::{bearer_token, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn suggester_for(server: &MockServer) -> EmojiSuggester {
    EmojiSuggester::new(
        EmojiConfig::default()
            .with_api_key("test-key")
            .with_base_url(&format!("{}/v1", server.uri())),
    )
}

fn is_fallback(pair: &[String; 2]) -> bool {
    pair[0] != pair[1] && pair.iter().all(|e| FALLBACK_EMOJI.contains(&e.as_str()))
}

#[tokio::test]
async fn suggest_uses_model_reply() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(bearer_token("test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "chatcmpl-1",
            "choices": [
                { "index": 0, "message": { "role": "assistant", "content": "🏜️ 🪱" } }
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let pair = suggester_for(&mock_server)
        .suggest("Dune", "Set on the desert planet Arrakis")
        .await;
    assert_eq!(pair, ["🏜️".to_string(), "🪱".to_string()]);
}

#[tokio::test]
async fn suggest_falls_back_on_http_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": { "message": "Rate limit reached", "type": "requests" }
        })))
        .mount(&mock_server)
        .await;

    let pair = suggester_for(&mock_server).suggest("Dune", "").await;
    assert!(is_fallback(&pair), "{:?}", pair);
}

#[tokio::test]
async fn suggest_falls_back_on_unusable_reply() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [
                { "index": 0, "message": { "role": "assistant", "content": "I cannot help with that." } }
            ]
        })))
        .mount(&mock_server)
        .await;

    let pair = suggester_for(&mock_server).suggest("Dune", "").await;
    assert!(is_fallback(&pair), "{:?}", pair);
}

#[tokio::test]
async fn suggest_falls_back_on_malformed_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let pair = suggester_for(&mock_server).suggest("Dune", "").await;
    assert!(is_fallback(&pair), "{:?}", pair);
}
