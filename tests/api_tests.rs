use std::sync::{Arc, Mutex};

use axum::http::{header, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::{json, Value};

use mood_movies_api::{
    api::{build_cors_layer, create_router, AppState},
    error::{AppError, AppResult},
    models::ChatCompletionRequest,
    services::CompletionProvider,
};

/// Provider double that replays a canned outcome and records credentials
struct StubProvider {
    outcome: StubOutcome,
    credentials_seen: Mutex<Vec<String>>,
}

enum StubOutcome {
    Reply(String),
    Unauthorized,
    ProviderError(&'static str),
}

impl StubProvider {
    fn new(outcome: StubOutcome) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            credentials_seen: Mutex::new(Vec::new()),
        })
    }

    fn credentials_seen(&self) -> Vec<String> {
        self.credentials_seen.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl CompletionProvider for StubProvider {
    async fn complete(
        &self,
        _request: &ChatCompletionRequest,
        credential: &str,
    ) -> AppResult<String> {
        self.credentials_seen
            .lock()
            .unwrap()
            .push(credential.to_string());

        match &self.outcome {
            StubOutcome::Reply(body) => Ok(body.clone()),
            StubOutcome::Unauthorized => Err(AppError::AuthenticationFailure),
            StubOutcome::ProviderError(msg) => Err(AppError::ProviderError(msg.to_string())),
        }
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

fn movie(name: &str) -> Value {
    json!({
        "movie_name": name,
        "genre": "Comedy",
        "mood": "Happy",
        "language": "English",
        "duration": "100 mins",
        "platform": "Netflix",
        "cast": ["X"],
        "crew": { "director": "D", "writers": ["W"] },
        "ratings": { "imdb": "7.0", "rottenTomatoes": "80%" },
        "synopsis": "S",
        "trailer_link": "https://www.youtube.com/watch?v=abc"
    })
}

fn reply(movies: Vec<Value>) -> String {
    let content = json!({ "movies": movies }).to_string();
    json!({ "choices": [{ "message": { "role": "assistant", "content": content } }] }).to_string()
}

fn preferences() -> Value {
    json!({
        "mood": "Happy",
        "languages": ["English"],
        "platforms": ["Netflix"],
        "contentTypes": ["Movie"]
    })
}

const ALLOWED_ORIGIN: &str = "http://localhost:5173";

fn create_test_server(provider: Arc<StubProvider>, credential: Option<&str>) -> TestServer {
    let state = AppState::new(
        provider,
        "gpt-4o-2024-08-06".to_string(),
        credential.map(str::to_string),
    );
    let cors = build_cors_layer(&[ALLOWED_ORIGIN.to_string()]).unwrap();
    TestServer::new(create_router(state, cors)).unwrap()
}

fn bearer(token: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("Bearer {}", token)).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server(StubProvider::new(StubOutcome::Unauthorized), None);
    let response = server.get("/health").await;
    response.assert_status_ok();
    assert!(!response.header("x-request-id").is_empty());
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let server = create_test_server(StubProvider::new(StubOutcome::Unauthorized), None);
    let response = server
        .get("/health")
        .add_header(
            header::HeaderName::from_static("x-request-id"),
            HeaderValue::from_static("ui-123"),
        )
        .await;
    assert_eq!(response.header("x-request-id"), "ui-123");
}

#[tokio::test]
async fn test_options_lists_form_values() {
    let server = create_test_server(StubProvider::new(StubOutcome::Unauthorized), None);
    let response = server.get("/api/v1/options").await;
    response.assert_status_ok();

    let options: Value = response.json();
    assert_eq!(options["moods"].as_array().unwrap().len(), 5);
    assert!(options["platforms"]
        .as_array()
        .unwrap()
        .contains(&json!("Amazon Prime")));
    assert_eq!(options["contentTypes"], json!(["Movie", "Series", "Both"]));
    assert!(options.get("content_types").is_none());
}

#[tokio::test]
async fn test_allowed_origin_is_echoed() {
    let server = create_test_server(StubProvider::new(StubOutcome::Unauthorized), None);
    let response = server
        .get("/api/v1/credential")
        .add_header(header::ORIGIN, HeaderValue::from_static(ALLOWED_ORIGIN))
        .await;

    response.assert_status_ok();
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN),
        Some(&HeaderValue::from_static(ALLOWED_ORIGIN))
    );
}

#[tokio::test]
async fn test_foreign_origin_gets_no_cors_grant() {
    let provider = StubProvider::new(StubOutcome::Reply(reply(vec![movie("A")])));
    let server = create_test_server(provider, Some("sk-stored"));

    let response = server
        .post("/api/v1/recommendations")
        .add_header(header::ORIGIN, HeaderValue::from_static("https://evil.example"))
        .json(&preferences())
        .await;

    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}

#[tokio::test]
async fn test_recommendations_with_stored_credential() {
    let provider = StubProvider::new(StubOutcome::Reply(reply(vec![
        movie("A"),
        movie("B"),
        movie("C"),
    ])));
    let server = create_test_server(provider.clone(), Some("sk-stored"));

    let response = server
        .post("/api/v1/recommendations")
        .json(&preferences())
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    let names: Vec<_> = body["movies"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["movie_name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["A", "B", "C"]);
    assert_eq!(body["movies"][0]["ratings"]["rottenTomatoes"], "80%");
    assert_eq!(provider.credentials_seen(), vec!["sk-stored"]);
}

#[tokio::test]
async fn test_bearer_header_overrides_stored_credential() {
    let provider = StubProvider::new(StubOutcome::Reply(reply(vec![movie("A")])));
    let server = create_test_server(provider.clone(), Some("sk-stored"));

    server
        .post("/api/v1/recommendations")
        .add_header(header::AUTHORIZATION, bearer("sk-header"))
        .json(&preferences())
        .await
        .assert_status_ok();

    assert_eq!(provider.credentials_seen(), vec!["sk-header"]);
}

#[tokio::test]
async fn test_missing_credential() {
    let provider = StubProvider::new(StubOutcome::Reply(reply(vec![movie("A")])));
    let server = create_test_server(provider.clone(), None);

    let response = server
        .post("/api/v1/recommendations")
        .json(&preferences())
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["kind"], "missing_credential");
    assert!(provider.credentials_seen().is_empty());
}

#[tokio::test]
async fn test_authentication_failure_clears_stored_credential() {
    let provider = StubProvider::new(StubOutcome::Unauthorized);
    let server = create_test_server(provider, Some("sk-stored"));

    let response = server
        .post("/api/v1/recommendations")
        .json(&preferences())
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["kind"], "authentication_failure");
    assert_eq!(
        body["error"],
        "Invalid API key. Please check your OpenAI API key and try again."
    );

    let status: Value = server.get("/api/v1/credential").await.json();
    assert_eq!(status["configured"], false);
}

#[tokio::test]
async fn test_rejected_header_credential_keeps_stored_one() {
    let provider = StubProvider::new(StubOutcome::Unauthorized);
    let server = create_test_server(provider, Some("sk-stored"));

    server
        .post("/api/v1/recommendations")
        .add_header(header::AUTHORIZATION, bearer("sk-typo"))
        .json(&preferences())
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    let status: Value = server.get("/api/v1/credential").await.json();
    assert_eq!(status["configured"], true);
}

#[tokio::test]
async fn test_provider_error_message_is_surfaced() {
    let provider = StubProvider::new(StubOutcome::ProviderError("Rate limit reached"));
    let server = create_test_server(provider, Some("sk-stored"));

    let response = server
        .post("/api/v1/recommendations")
        .json(&preferences())
        .await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    let body: Value = response.json();
    assert_eq!(body["kind"], "provider_error");
    assert_eq!(body["error"], "OpenAI API Error: Rate limit reached");
}

#[tokio::test]
async fn test_malformed_batch_is_rejected() {
    let mut broken = movie("B");
    broken["crew"].as_object_mut().unwrap().remove("director");
    let provider = StubProvider::new(StubOutcome::Reply(reply(vec![
        movie("A"),
        broken,
        movie("C"),
    ])));
    let server = create_test_server(provider, Some("sk-stored"));

    let response = server
        .post("/api/v1/recommendations")
        .json(&preferences())
        .await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    let body: Value = response.json();
    assert_eq!(body["kind"], "malformed_response");
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("missing required field: crew.director"));
}

#[tokio::test]
async fn test_exclusions_and_empty_result() {
    let provider = StubProvider::new(StubOutcome::Reply(reply(vec![
        movie("A"),
        movie("B"),
        movie("C"),
    ])));
    let server = create_test_server(provider, Some("sk-stored"));

    let mut prefs = preferences();
    prefs["excludeTitles"] = json!(["a "]);
    let response = server.post("/api/v1/recommendations").json(&prefs).await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["movies"].as_array().unwrap().len(), 2);

    prefs["excludeTitles"] = json!(["A", "b", "C"]);
    let response = server.post("/api/v1/recommendations").json(&prefs).await;
    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["kind"], "empty_result");
}

#[tokio::test]
async fn test_empty_selection_is_rejected() {
    let provider = StubProvider::new(StubOutcome::Reply(reply(vec![movie("A")])));
    let server = create_test_server(provider.clone(), Some("sk-stored"));

    let mut prefs = preferences();
    prefs["languages"] = json!([]);
    let response = server.post("/api/v1/recommendations").json(&prefs).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(provider.credentials_seen().is_empty());
}

#[tokio::test]
async fn test_unknown_mood_is_invalid_input() {
    let provider = StubProvider::new(StubOutcome::Reply(reply(vec![movie("A")])));
    let server = create_test_server(provider.clone(), Some("sk-stored"));

    let mut prefs = preferences();
    prefs["mood"] = json!("Angry");
    let response = server.post("/api/v1/recommendations").json(&prefs).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["kind"], "invalid_input");
    assert!(body["error"].as_str().unwrap().contains("mood"));
    assert!(provider.credentials_seen().is_empty());
}

#[tokio::test]
async fn test_credential_lifecycle() {
    let server = create_test_server(StubProvider::new(StubOutcome::Unauthorized), None);

    let status: Value = server.get("/api/v1/credential").await.json();
    assert_eq!(status["configured"], false);

    server
        .put("/api/v1/credential")
        .json(&json!({ "api_key": "sk-new" }))
        .await
        .assert_status(StatusCode::NO_CONTENT);
    let status: Value = server.get("/api/v1/credential").await.json();
    assert_eq!(status["configured"], true);

    server
        .put("/api/v1/credential")
        .json(&json!({ "api_key": "  " }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let response = server.put("/api/v1/credential").json(&json!({})).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["kind"], "invalid_input");

    server
        .delete("/api/v1/credential")
        .await
        .assert_status(StatusCode::NO_CONTENT);
    let status: Value = server.get("/api/v1/credential").await.json();
    assert_eq!(status["configured"], false);
}
