//! Fake backend and fixtures shared by unit tests.

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header::AUTHORIZATION};
use axum::routing::{delete, get, post, put};
use axum::Json;
use serde_json::{Value, json};

use crate::api::ApiClient;
use crate::config::Timeouts;
use crate::nav::History;
use crate::session::{MemoryStorage, SessionStore};

/// `Authorization` header of every request the fake backend saw, in order.
#[derive(Clone, Default)]
pub struct SeenAuth(Arc<Mutex<Vec<Option<String>>>>);

impl SeenAuth {
    fn record(&self, headers: &HeaderMap) {
        let value = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()).map(str::to_owned);
        self.0.lock().unwrap().push(value);
    }

    pub fn all(&self) -> Vec<Option<String>> {
        self.0.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<String> {
        self.all().last().cloned().flatten()
    }
}

/// Serve `router` on an ephemeral local port and return its base URL.
pub async fn spawn_backend(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// Spawn the fake maintenance backend.
pub async fn spawn_fake_backend() -> (String, SeenAuth) {
    let seen = SeenAuth::default();
    let base_url = spawn_backend(fake_backend(seen.clone())).await;
    (base_url, seen)
}

#[must_use]
pub fn test_client(base_url: &str) -> ApiClient {
    ApiClient::new(base_url, Timeouts { request_secs: 5, connect_secs: 2 }).unwrap()
}

/// Logged-out store over fresh memory storage, with history at `/login`.
#[must_use]
pub fn test_session() -> (Arc<SessionStore>, Arc<MemoryStorage>, Arc<History>) {
    let storage = Arc::new(MemoryStorage::new());
    let history = Arc::new(History::starting_at("/login"));
    let store = Arc::new(SessionStore::new(storage.clone(), history.clone()));
    (store, storage, history)
}

// =============================================================================
// FAKE BACKEND
// =============================================================================

pub fn fake_backend(seen: SeenAuth) -> Router {
    Router::new()
        .route("/user/login", post(login))
        .route("/auth/oauth/google", post(google_login))
        .route("/user/role/{role}", get(users_by_role))
        .route("/asset/all", get(assets))
        .route("/asset/save", post(echo_with_id))
        .route("/asset/delete/{id}", delete(recorded_empty))
        .route("/workorder/all", get(work_orders))
        .route("/workorder/updateStatus/{id}", put(update_status))
        .route("/task/save", post(task_saved))
        .route("/maintenanceplan/all", get(plans))
        .route("/expired", get(expired))
        .route("/broken", get(broken))
        .route("/plain", get(plain))
        .with_state(seen)
}

async fn login(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["email"] == "tess@utility.test" && body["password"] == "secret" {
        let response = json!({
            "token": "tok-123",
            "user": { "id": 7, "name": "Tess", "email": "tess@utility.test", "role": "technician", "skill": "HVAC" }
        });
        (StatusCode::OK, Json(response))
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({ "error": "bad credentials" })))
    }
}

async fn google_login(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["credential"] == "google-cred" {
        let response = json!({
            "token": "g-tok",
            "user": { "id": "sup-1", "name": "Sam", "email": "sam@utility.test", "role": "supervisor" }
        });
        (StatusCode::OK, Json(response))
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({ "error": "bad credential" })))
    }
}

async fn users_by_role(State(seen): State<SeenAuth>, headers: HeaderMap, Path(role): Path<String>) -> Json<Value> {
    seen.record(&headers);
    Json(json!([{ "id": 11, "name": "Tom", "email": "tom@utility.test", "role": role, "phno": 5550100 }]))
}

async fn assets(State(seen): State<SeenAuth>, headers: HeaderMap) -> Json<Value> {
    seen.record(&headers);
    Json(json!([
        { "id": 1, "name": "Pump A", "type": "Motor", "siteCode": "S-01", "description": "Main pump", "count": 2, "regDate": "2024-03-01" },
        { "id": "2", "name": "Rack", "type": "Server", "siteCode": "S-02", "description": "Core rack", "count": 1 }
    ]))
}

async fn echo_with_id(State(seen): State<SeenAuth>, headers: HeaderMap, Json(mut body): Json<Value>) -> Json<Value> {
    seen.record(&headers);
    body["id"] = json!(99);
    Json(body)
}

async fn recorded_empty(State(seen): State<SeenAuth>, headers: HeaderMap) -> StatusCode {
    seen.record(&headers);
    StatusCode::OK
}

async fn work_orders(State(seen): State<SeenAuth>, headers: HeaderMap) -> Json<Value> {
    seen.record(&headers);
    Json(json!([
        { "workId": 1, "description": "Replace seal", "status": "Assigned", "assignedTo": "Tom", "assignedToId": 11, "requestedById": 3 },
        { "workId": 2, "description": "Inspect rack", "status": "Done", "assignedTo": "Tom", "assignedToId": 11, "requestedById": 4 },
        { "workId": 3, "description": "New request", "status": "Open", "requestedById": 3 }
    ]))
}

async fn update_status(
    State(seen): State<SeenAuth>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Json<Value> {
    seen.record(&headers);
    Json(json!({ "workId": id, "status": body["status"] }))
}

async fn task_saved(State(seen): State<SeenAuth>, headers: HeaderMap) -> &'static str {
    seen.record(&headers);
    "Task saved"
}

async fn plans(State(seen): State<SeenAuth>, headers: HeaderMap) -> Json<Value> {
    seen.record(&headers);
    Json(json!([
        { "planId": 501, "workOrderId": 1, "frequency": 30, "nextMaintenanceDate": "2024-05-01", "technician": { "skill": "HVAC" } }
    ]))
}

async fn expired(State(seen): State<SeenAuth>, headers: HeaderMap) -> (StatusCode, &'static str) {
    seen.record(&headers);
    (StatusCode::UNAUTHORIZED, "token expired")
}

async fn broken(State(seen): State<SeenAuth>, headers: HeaderMap) -> (StatusCode, &'static str) {
    seen.record(&headers);
    (StatusCode::INTERNAL_SERVER_ERROR, "boom")
}

async fn plain(State(seen): State<SeenAuth>, headers: HeaderMap) -> &'static str {
    seen.record(&headers);
    "hello"
}
