//! Conversation turns against the real Gemini adapter and a mock upstream.

use std::sync::Arc;
use std::time::Duration;

use arena_conversation::{ConversationController, HistoryWindow};
use arena_core::{GenerationConfig, Persona, Role, SessionId, UpstreamError};
use arena_providers::GeminiProvider;
use arena_session::MemorySessionStore;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

const PERSONA_TEXT: &str = "Você é um debatedor cético.";

fn persona(history_window: usize) -> Persona {
    Persona {
        name: "integration".into(),
        instruction: PERSONA_TEXT.into(),
        history_window,
        generation: GenerationConfig::default(),
    }
}

fn reply(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "candidates": [{"content": {"parts": [{"text": text}]}}]
    }))
}

fn controller(
    provider: GeminiProvider,
) -> (
    ConversationController<GeminiProvider, Arc<MemorySessionStore>>,
    Arc<MemorySessionStore>,
) {
    let store = Arc::new(MemorySessionStore::new());
    let window = HistoryWindow::new(provider.persona().history_window);
    (
        ConversationController::new(provider, Arc::clone(&store), window),
        store,
    )
}

#[tokio::test]
async fn missing_credential_records_configuration_error_without_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(reply("should not be called"))
        .expect(0)
        .mount(&server)
        .await;

    let provider = GeminiProvider::new(None, persona(20)).with_base_url(server.uri());
    let (controller, _store) = controller(provider);
    let id = SessionId::new();

    let outcome = controller.submit_turn(&id, "A").await.unwrap();

    assert_eq!(outcome.ai_response, "Erro interno: API Key não configurada.");
    let history = controller.history(&id).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[1].text(), UpstreamError::Configuration.to_string());
}

#[tokio::test]
async fn upstream_timeout_is_recorded_after_user_turn() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(reply("too late").set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let provider = GeminiProvider::new(Some("key".into()), persona(20))
        .with_base_url(server.uri())
        .with_timeout(Duration::from_millis(100));
    let (controller, _store) = controller(provider);
    let id = SessionId::new();

    let outcome = controller.submit_turn(&id, "A").await.unwrap();

    assert_eq!(
        outcome.ai_response,
        "A IA demorou muito para responder. Tente novamente."
    );
    let history = controller.history(&id).await.unwrap();
    assert_eq!(history[0].role(), Role::User);
    assert_eq!(history[0].text(), "A");
    assert_eq!(history[1].role(), Role::Model);
}

#[tokio::test]
async fn persona_leads_every_payload_and_is_never_stored() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(reply("resposta"))
        .expect(12)
        .mount(&server)
        .await;

    let provider = GeminiProvider::new(Some("key".into()), persona(20)).with_base_url(server.uri());
    let (controller, store) = controller(provider);
    let id = SessionId::new();

    for i in 0..12 {
        controller.submit_turn(&id, &format!("arg {i}")).await.unwrap();
    }

    let requests = server.received_requests().await.unwrap();
    let last: serde_json::Value = serde_json::from_slice(&requests[11].body).unwrap();
    let contents = last["contents"].as_array().unwrap();

    // Persona plus the last 20 of 23 stored turns (12 users + 11 replies).
    assert_eq!(contents.len(), 21);
    assert_eq!(contents[0]["role"], "user");
    assert_eq!(contents[0]["parts"][0]["text"], PERSONA_TEXT);
    assert_eq!(contents[20]["parts"][0]["text"], "arg 11");
    assert_eq!(contents[1]["role"], "model");
    assert_eq!(contents[2]["parts"][0]["text"], "arg 2");

    let history = controller.history(&id).await.unwrap();
    assert_eq!(history.len(), 24);
    assert!(history.iter().all(|t| t.text() != PERSONA_TEXT));
    assert_eq!(store.stats(&id).await.unwrap().model_turns, 12);
}

#[tokio::test]
async fn end_to_end_two_turns_then_reset() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(reply("r"))
        .mount(&server)
        .await;

    let provider = GeminiProvider::new(Some("key".into()), persona(20)).with_base_url(server.uri());
    let (controller, _store) = controller(provider);
    let id = SessionId::new();

    controller.submit_turn(&id, "A").await.unwrap();
    controller.submit_turn(&id, "B").await.unwrap();

    let history = controller.history(&id).await.unwrap();
    let pairs: Vec<(Role, &str)> = history.iter().map(|t| (t.role(), t.text())).collect();
    assert_eq!(
        pairs,
        [
            (Role::User, "A"),
            (Role::Model, "r"),
            (Role::User, "B"),
            (Role::Model, "r"),
        ]
    );

    controller.reset(&id).await.unwrap();
    assert!(controller.history(&id).await.unwrap().is_empty());
}
