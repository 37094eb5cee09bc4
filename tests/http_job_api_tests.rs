//! Wire-format tests for the HTTP job API adapter against an in-process
//! axum server standing in for the hosted endpoint.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::sync::Mutex;

use omnigenius::{
    FailureKind, GenerationParameters, HttpInferenceJobApi, InferenceJobApi, InferenceJobClient,
    JobId, JobStatus, PollPolicy, Prompt,
};

const BASE_PATH: &str = "/v2/test-endpoint";
const API_KEY: &str = "test-key";

#[derive(Default)]
struct FakeEndpoint {
    submissions: Mutex<Vec<Value>>,
    auth_headers: Mutex<Vec<String>>,
    polls: Mutex<HashMap<String, usize>>,
}

async fn record_auth(state: &FakeEndpoint, headers: &HeaderMap) {
    let value = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    state.auth_headers.lock().await.push(value);
}

async fn run(
    State(state): State<Arc<FakeEndpoint>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    record_auth(&state, &headers).await;
    let mut submissions = state.submissions.lock().await;
    submissions.push(body);
    Json(json!({ "id": format!("job-{}", submissions.len()), "status": "IN_QUEUE" }))
}

/// Reports `IN_QUEUE`, then `IN_PROGRESS`, then completes echoing the prompt.
async fn status(
    State(state): State<Arc<FakeEndpoint>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Json<Value> {
    record_auth(&state, &headers).await;
    let mut polls = state.polls.lock().await;
    let count = polls.entry(id.clone()).or_insert(0);
    *count += 1;

    match *count {
        1 => Json(json!({ "id": id, "status": "IN_QUEUE" })),
        2 => Json(json!({ "id": id, "status": "IN_PROGRESS" })),
        _ => {
            let submissions = state.submissions.lock().await;
            let prompt = submissions
                .last()
                .and_then(|s| s["input"]["prompt"].as_str())
                .unwrap_or_default()
                .to_string();
            Json(json!({
                "id": id,
                "status": "COMPLETED",
                "output": { "response": format!("echo: {prompt}") }
            }))
        }
    }
}

async fn spawn_server(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    format!("http://{}{}", addr, BASE_PATH)
}

fn fast_policy() -> PollPolicy {
    PollPolicy::new(Duration::from_millis(10), 20)
}

#[tokio::test]
async fn ask_round_trip_over_http() {
    let state = Arc::new(FakeEndpoint::default());
    let app = Router::new()
        .route(&format!("{BASE_PATH}/run"), post(run))
        .route(&format!("{BASE_PATH}/status/{{id}}"), get(status))
        .with_state(state.clone());
    let endpoint = spawn_server(app).await;

    let api = Arc::new(HttpInferenceJobApi::new(&endpoint, API_KEY).expect("api"));
    let client = InferenceJobClient::new(api)
        .with_parameters(GenerationParameters::new(256, 0.5, 2))
        .with_poll_policy(fast_policy());

    let text = client.ask("  hi there ").await.expect("reply");
    assert_eq!(text, "echo: hi there");

    let submissions = state.submissions.lock().await;
    assert_eq!(
        submissions[0],
        json!({
            "input": { "prompt": "hi there", "max_tokens": 256, "alpha": 0.5, "recurrence": 2 }
        })
    );

    let auth = state.auth_headers.lock().await;
    assert_eq!(auth.len(), 4);
    assert!(auth.iter().all(|h| h == "Bearer test-key"));
    assert_eq!(state.polls.lock().await.get("job-1"), Some(&3));
}

#[tokio::test]
async fn submit_without_id_carries_raw_body() {
    let app = Router::new().route(
        &format!("{BASE_PATH}/run"),
        post(|| async { (StatusCode::OK, r#"{"status":"accepted"}"#) }),
    );
    let endpoint = spawn_server(app).await;
    let api = HttpInferenceJobApi::new(&endpoint, API_KEY).expect("api");

    let err = api
        .submit(&Prompt::new("hello").unwrap(), &GenerationParameters::default())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), FailureKind::Submission);
    assert!(err.to_string().contains(r#"{"status":"accepted"}"#));
}

#[tokio::test]
async fn submit_rejected_by_server_is_a_submission_failure() {
    let app = Router::new().route(
        &format!("{BASE_PATH}/run"),
        post(|| async { (StatusCode::UNAUTHORIZED, "invalid api key") }),
    );
    let endpoint = spawn_server(app).await;
    let api = HttpInferenceJobApi::new(&endpoint, API_KEY).expect("api");

    let err = api
        .submit(&Prompt::new("hello").unwrap(), &GenerationParameters::default())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), FailureKind::Submission);
    assert!(err.to_string().contains("invalid api key"));
}

#[tokio::test]
async fn status_server_error_is_a_network_failure() {
    let app = Router::new().route(
        &format!("{BASE_PATH}/status/{{id}}"),
        get(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
    );
    let endpoint = spawn_server(app).await;
    let api = HttpInferenceJobApi::new(&endpoint, API_KEY).expect("api");

    let err = api.status(&JobId::new("job-1")).await.unwrap_err();

    assert_eq!(err.kind(), FailureKind::Network);
}

#[tokio::test]
async fn failed_job_reports_remote_error() {
    let app = Router::new().route(
        &format!("{BASE_PATH}/status/{{id}}"),
        get(|Path(id): Path<String>| async move {
            Json(json!({ "id": id, "status": "FAILED", "error": "CUDA out of memory" }))
        }),
    );
    let endpoint = spawn_server(app).await;
    let api = HttpInferenceJobApi::new(&endpoint, API_KEY).expect("api");

    let job = api.status(&JobId::new("job-7")).await.expect("status");

    assert_eq!(job.status(), &JobStatus::Failed);
    assert_eq!(job.error(), Some("CUDA out of memory"));
}

#[tokio::test]
async fn unreachable_endpoint_is_a_network_failure() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let api = Arc::new(
        HttpInferenceJobApi::new(&format!("http://{addr}{BASE_PATH}"), API_KEY).expect("api"),
    );
    let client = InferenceJobClient::new(api).with_poll_policy(fast_policy());

    let err = client.ask("hello").await.unwrap_err();

    assert_eq!(err.kind(), FailureKind::Network);
}
