#![allow(dead_code)]

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use portal_assistant::config::RelayConfig;
use portal_assistant::services::profile::{
    AttendanceRecord, CourseRef, Enrollment, FeeRecord, ProfileContext, StudentProfile,
};
use portal_assistant::services::profile_store::InMemoryProfileStore;
use portal_assistant::state::AppState;

pub const TOKEN: &str = "student-token";

pub async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

pub fn sse(deltas: &[&str]) -> String {
    let mut body = String::from(": connected\n\n");
    for d in deltas {
        body.push_str(&format!(
            "data: {}\n\n",
            serde_json::json!({ "choices": [{ "index": 0, "delta": { "content": d } }] })
        ));
    }
    body.push_str("data: [DONE]\n\n");
    body
}

/// Canned completion endpoint that records what it was sent.
#[derive(Clone)]
pub struct FakeUpstream {
    pub hits: Arc<AtomicUsize>,
    pub last_body: Arc<Mutex<Option<serde_json::Value>>>,
    pub last_auth: Arc<Mutex<Option<String>>>,
    status: StatusCode,
    body: String,
}

impl FakeUpstream {
    pub fn streaming(deltas: &[&str]) -> Self {
        Self::with_status(StatusCode::OK, sse(deltas))
    }

    pub fn with_status(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            hits: Arc::new(AtomicUsize::new(0)),
            last_body: Arc::new(Mutex::new(None)),
            last_auth: Arc::new(Mutex::new(None)),
            status,
            body: body.into(),
        }
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub async fn start(&self) -> String {
        let router = Router::new()
            .route("/v1/chat/completions", post(completions))
            .with_state(self.clone());
        format!("{}/v1/chat/completions", spawn(router).await)
    }
}

async fn completions(
    State(fake): State<FakeUpstream>,
    headers: axum::http::HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> Response {
    fake.hits.fetch_add(1, Ordering::SeqCst);
    *fake.last_body.lock().unwrap() = Some(body);
    *fake.last_auth.lock().unwrap() = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let content_type = if fake.status.is_success() { "text/event-stream" } else { "application/json" };
    (fake.status, [(header::CONTENT_TYPE, content_type)], fake.body.clone()).into_response()
}

pub fn config(upstream_url: &str) -> RelayConfig {
    RelayConfig {
        api_key: Some("test-key".to_string()),
        upstream_url: upstream_url.to_string(),
        ..RelayConfig::default()
    }
}

pub fn student() -> ProfileContext {
    let physics = CourseRef { name: "Physics".into(), code: Some("PH101".into()), credits: Some(3) };
    ProfileContext {
        profile: StudentProfile {
            id: "p-1".into(),
            user_id: Some("u-1".into()),
            name: "Meera Iyer".into(),
            roll_no: Some("HIT22CS017".into()),
            branch: Some("Computer Science".into()),
            semester: Some(4),
            cgpa: Some(8.7),
            attendance_percent: Some(82.5),
        },
        enrollments: vec![Enrollment { progress: Some(60.0), course: Some(physics.clone()) }],
        marks: Vec::new(),
        attendance: vec![AttendanceRecord {
            date: "2024-02-01".into(),
            status: "present".into(),
            course: Some(physics),
        }],
        fees: Some(FeeRecord { total_fee: 90000.0, paid: Some(45000.0), pending: 45000.0, due_date: None }),
    }
}

pub fn state(config: RelayConfig) -> Arc<AppState> {
    let store = InMemoryProfileStore::new().with_profile(TOKEN, student());
    Arc::new(AppState::new(config, Arc::new(store)))
}
