//! Stub console API for integration tests.
//!
//! Binds an axum server to an ephemeral port, records every request and
//! answers from a fixed route table.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::Method;
use axum::http::StatusCode;
use axum::http::Uri;
use axum::http::header;
use axum::response::IntoResponse;
use axum::response::Response;
use docudesk_lib::ConsoleClient;
use docudesk_lib::auth::StaticTokenProvider;
use docudesk_lib::retry::RetryConfig;
use serde_json::Value;
use serde_json::json;

pub const TOKEN: &str = "test-token";

/// One request as seen by the stub.
#[derive(Debug, Clone)]
pub struct Hit {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: Value,
}

#[derive(Clone, Default)]
pub struct Stub {
    hits: Arc<Mutex<Vec<Hit>>>,
    status_replies: Arc<Mutex<VecDeque<Value>>>,
}

impl Stub {
    pub fn hits(&self) -> Vec<Hit> {
        self.hits.lock().unwrap().clone()
    }

    pub fn hits_to(&self, method: &str, path: &str) -> Vec<Hit> {
        self.hits()
            .into_iter()
            .filter(|h| h.method == method && h.path == path)
            .collect()
    }

    /// Queues a reply for `POST /documents/process/status`.
    pub fn push_status_reply(&self, reply: Value) {
        self.status_replies.lock().unwrap().push_back(reply);
    }
}

/// Starts the stub and returns it with the API base URL.
pub async fn start() -> (Stub, String) {
    let stub = Stub::default();
    let app = Router::new().fallback(handle).with_state(stub.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (stub, format!("http://{addr}/api"))
}

/// A client for `base` with millisecond retry delays.
pub fn client(base: &str) -> ConsoleClient {
    ConsoleClient::builder()
        .base_url(base)
        .token_provider(StaticTokenProvider::new(TOKEN))
        .retry_config(
            RetryConfig::default()
                .initial_delay(Duration::from_millis(1))
                .max_delay(Duration::from_millis(4)),
        )
        .build()
        .unwrap()
}

fn folder(id: i64, name: &str) -> Value {
    json!({"id": id, "name": name, "document_type": "invoice", "status": "active"})
}

fn document(id: i64, status: &str) -> Value {
    json!({"id": id, "name": format!("scan-{id}.pdf"), "folder_id": 1, "status": status})
}

fn note(id: i64, content: &str) -> Value {
    json!({"id": id, "call_log_id": 3, "content": content, "created_at": "2024-03-01T10:00:00"})
}

async fn handle(
    State(stub): State<Stub>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    stub.hits.lock().unwrap().push(Hit {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: body.clone(),
    });

    let path = uri.path().trim_start_matches("/api");
    match (method.as_str(), path) {
        ("GET", "/folders") => ok(json!({
            "folders": [folder(1, "Alpha"), folder(2, "Beta")],
            "pagination": {
                "totalItems": 47, "totalPages": 3, "currentPage": 2,
                "pageSize": 20, "hasNextPage": true, "hasPrevPage": true
            }
        })),
        ("GET", "/folders/1") => ok(json!({ "folder": folder(1, "Alpha") })),
        ("GET", "/folders/503") => error(StatusCode::SERVICE_UNAVAILABLE, json!({"message": "down"})),
        ("DELETE", "/folders/404") => {
            error(StatusCode::NOT_FOUND, json!({"error_key": "folders.not_found"}))
        }
        ("POST", "/folders/") => {
            let mut saved = body;
            saved["id"] = json!(10);
            ok(saved)
        }
        ("GET", "/folders/1/documents") => ok(json!({
            "documents": [document(5, "pending"), document(9, "pending")],
            "pagination": {"total_items": 2, "current_page": 1, "page_size": 20}
        })),
        ("PATCH", "/documents/5/correctedData") => {
            let mut doc = document(5, "processed");
            doc["corrected_data"] = body["correctedData"].clone();
            ok(doc)
        }
        ("PATCH", "/documents/5/name") => {
            let mut doc = document(5, "processed");
            doc["name"] = body["name"].clone();
            ok(json!({ "document": doc }))
        }
        ("POST", "/documents/process") => {
            let ids = body["documentIds"].as_array().cloned().unwrap_or_default();
            if ids.contains(&json!(666)) {
                error(StatusCode::INTERNAL_SERVER_ERROR, json!({"message": "queue down"}))
            } else {
                (StatusCode::ACCEPTED, axum::Json(json!({"accepted": ids.len()}))).into_response()
            }
        }
        ("POST", "/documents/process/status") => {
            let reply = stub.status_replies.lock().unwrap().pop_front();
            ok(reply.unwrap_or_else(|| {
                let ids = body["documentIds"].as_array().cloned().unwrap_or_default();
                let docs: Vec<Value> = ids
                    .into_iter()
                    .map(|id| json!({"id": id, "status": "pending"}))
                    .collect();
                json!({ "documents": docs })
            }))
        }
        ("POST", "/documents/export") => (
            [(header::CONTENT_TYPE, "text/csv")],
            "id,total\n5,10.00\n",
        )
            .into_response(),
        ("GET", "/call-logs/by-clinic/c-1") => ok(json!({
            "items": [{
                "id": 3, "clinic_id": "c-1", "caller_name": "Dana",
                "status": "new", "duration_seconds": 61
            }],
            "total": 21, "page": 2, "limit": 20, "pages": 2
        })),
        ("GET", "/internal-notes/call-log/3") => ok(json!([note(1, "first"), note(2, "second")])),
        ("POST", "/internal-notes/") => {
            if body["content"] == "reject me" {
                error(StatusCode::BAD_REQUEST, json!({"error_key": "notes.rejected"}))
            } else {
                ok(json!({ "note": note(7, body["content"].as_str().unwrap_or_default()) }))
            }
        }
        ("PUT", "/internal-notes/1") => ok(note(1, body["content"].as_str().unwrap_or_default())),
        ("DELETE", "/internal-notes/1") => StatusCode::NO_CONTENT.into_response(),
        _ => error(StatusCode::NOT_FOUND, json!({"message": "no route"})),
    }
}

fn ok(value: Value) -> Response {
    axum::Json(value).into_response()
}

fn error(status: StatusCode, body: Value) -> Response {
    (status, axum::Json(body)).into_response()
}
