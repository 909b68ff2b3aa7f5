//! HTTP-level tests against a local mock Akinator server.

use std::sync::Arc;
use std::time::Duration;

use akinator_client::{
    Akinator, AkinatorClient, AnswerOutcome, BeginForm, Error, GameResult, GameService, Language,
};
use akinator_session::{CacheConfig, SessionCache, SessionStore};
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, header_regex, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BEGIN_PAGE: &str = r#"<!DOCTYPE html>
<html><body>
  <p id="question-label">Is your character real?</p>
  <form id="askSoundlike" method="post">
    <input type="hidden" name="session" value="431">
    <input type="hidden" name="signature" value="1907522873">
  </form>
</body></html>"#;

fn client_for(server: &MockServer) -> AkinatorClient {
    AkinatorClient::builder()
        .language(Language::English)
        .base_url(server.uri())
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap()
}

fn cache_config(path: &std::path::Path) -> CacheConfig {
    CacheConfig::new()
        .with_path(path)
        .with_ttl(Duration::from_secs(600))
}

async fn mount_begin(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/game"))
        .and(body_string_contains("sid=1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(BEGIN_PAGE))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_begin_sends_form_and_browser_agent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/game"))
        .and(header(
            "content-type",
            "application/x-www-form-urlencoded",
        ))
        .and(header_regex("user-agent", r"Chrome/127\.0\.0\.0"))
        .and(body_string_contains("cm=false"))
        .respond_with(ResponseTemplate::new(200).set_body_string(BEGIN_PAGE))
        .expect(1)
        .mount(&server)
        .await;

    let page = client_for(&server)
        .begin(&BeginForm::new(false))
        .await
        .unwrap();

    assert_eq!(page.question, "Is your character real?");
    assert_eq!(page.credentials(), Some(("431", "1907522873")));
}

#[tokio::test]
async fn test_error_status_is_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/game"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .begin(&BeginForm::new(false))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Api { status: 503, .. }));
    assert!(err.is_server_error());
}

#[tokio::test]
async fn test_empty_answer_body_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/answer"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let record = akinator_session::SessionRecord::new("431", "sig");
    let form = akinator_client::AnswerForm::new(&record, akinator_client::Answer::Yes, false);
    let err = client_for(&server).answer(&form).await.unwrap_err();

    assert!(matches!(err, Error::MalformedResponse(_)));
}

#[tokio::test]
async fn test_answer_decodes_guess() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/answer"))
        .and(body_string_contains("answer=0"))
        .and(body_string_contains("question_filter=string"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "valide_contrainte": true,
            "photo": "https://photos.example/ada.jpg",
            "description_proposition": "Mathematician",
            "name_proposition": "Ada Lovelace"
        })))
        .mount(&server)
        .await;

    let record = akinator_session::SessionRecord::new("431", "sig");
    let form = akinator_client::AnswerForm::new(&record, akinator_client::Answer::Yes, false);
    let outcome = client_for(&server)
        .answer(&form)
        .await
        .unwrap()
        .into_outcome()
        .unwrap();

    match outcome {
        AnswerOutcome::Guess(guess) => assert_eq!(guess.name, "Ada Lovelace"),
        other => panic!("expected guess, got {:?}", other),
    }
}

#[tokio::test]
async fn test_full_game_against_file_cache() {
    let server = MockServer::start().await;
    mount_begin(&server).await;

    Mock::given(method("POST"))
        .and(path("/answer"))
        .and(body_string_contains("answer=3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "valide_contrainte": false,
            "step": "1",
            "progression": "12.345",
            "question": "Is your character a girl?"
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/cancel_answer"))
        .and(body_string_contains("step=1"))
        .and(body_string_contains("progression=12.345"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "step": 0,
            "progression": 3.5,
            "question": "Is your character real?"
        })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let cache_path = dir.path().join("cache").join("akinator.json");
    let cache = SessionCache::new(cache_config(&cache_path));
    let aki = Akinator::with_parts(client_for(&server), Arc::new(cache.clone()), false);

    let started = aki.start_game().await;
    assert!(started.ok, "{:?}", started);
    let id = started.result.id().unwrap().to_string();
    assert!(cache_path.exists());

    let answered = aki.answer_question("probably", &id).await;
    assert_eq!(
        answered.result,
        GameResult::Question {
            id: id.clone(),
            progress: "12.345".to_string(),
            step: 1,
            question: "Is your character a girl?".to_string(),
        }
    );

    let back = aki.back(&id).await;
    assert!(back.ok, "{:?}", back);
    assert_eq!(back.result.question(), Some("Is your character real?"));

    // A second handle over the same file sees the persisted progress
    let reopened = SessionCache::new(cache_config(&cache_path));
    let record = reopened.get(&id).await.unwrap();
    assert_eq!(record.step, 0);
    assert_eq!(record.progress, "3.5");
    assert_eq!(record.session, "431");
}

#[tokio::test]
async fn test_start_without_signature_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/game"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<p id="question-label">Q</p><form id="askSoundlike"><input name="session" value="431"></form>"#,
        ))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let cache_path = dir.path().join("akinator.json");
    let cache = SessionCache::new(cache_config(&cache_path));
    let aki = Akinator::with_parts(client_for(&server), Arc::new(cache), false);

    let response = aki.start_game().await;
    assert!(!response.ok);
    assert!(!cache_path.exists());
}
