use super::mocks::MockLlmClient;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response},
};
use placify::{
    agent::ResumePipeline,
    config::IdentityConfig,
    history::{HeaderIdentityResolver, HistoryStorage},
    server::{self, handlers::AppState},
};
use std::sync::Arc;
use std::time::Duration;

pub const SAMPLE_JOB_DESCRIPTION: &str =
    "Requirements:\n3+ years Python\nSkills:\nDjango, AWS";

/// Router wired to an in-memory history and the given mock LLM.
pub async fn create_test_app(llm: MockLlmClient) -> Router {
    let history = HistoryStorage::new(":memory:").await.unwrap();
    let identity = HeaderIdentityResolver::new(&IdentityConfig::default()).unwrap();

    let state = AppState {
        history: Arc::new(history),
        pipeline: Arc::new(ResumePipeline::new(Arc::new(llm), Duration::from_secs(5))),
        session_header: identity.session_header().clone(),
        identity: Arc::new(identity),
    };
    server::router(state)
}

/// Complete resume form with one filled and one blank experience row.
pub fn sample_form_pairs() -> Vec<(&'static str, &'static str)> {
    vec![
        ("full_name", "Ada Lovelace"),
        ("email", "ada@example.com"),
        ("target_position", "Backend Engineer"),
        ("target_industry", "Fintech"),
        ("job_description", SAMPLE_JOB_DESCRIPTION),
        ("technical_skills", "Python, AWS"),
        ("experience_title[]", "Engineer"),
        ("experience_company[]", "Analytical Engines"),
        ("experience_title[]", ""),
        ("experience_company[]", "Ghost Corp"),
    ]
}

/// URL-encodes form pairs the way a browser would.
pub fn encode_form(pairs: &[(&str, &str)]) -> String {
    serde_urlencoded::to_string(pairs).unwrap()
}

pub fn json_request(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn form_request(uri: &str, pairs: &[(&str, &str)], session: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded");
    if let Some(session) = session {
        builder = builder.header("x-session-id", session);
    }
    builder.body(Body::from(encode_form(pairs))).unwrap()
}

pub fn get_request(uri: &str, headers: &[(&str, &str)]) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_str(&body_string(response).await).unwrap()
}
