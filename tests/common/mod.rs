//! Shared test utilities: an in-process stand-in for the 2Chat remote API.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

/// Bind a router on an ephemeral port and serve it in the background.
/// Returns the base URL.
pub async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve test router");
    });
    format!("http://{addr}")
}

pub fn group_json(uuid: &str, name: &str) -> Value {
    json!({
        "uuid": uuid,
        "wa_group_name": name,
        "wa_subject": "test subject",
        "size": 5,
        "wa_created_at": "2024-01-15T10:30:00Z",
    })
}

pub fn message_json(id: &str, text: &str) -> Value {
    json!({
        "id": id,
        "message": { "text": text },
        "created_at": "2025-01-03T14:19:28",
        "sent_by": "user",
        "participant": { "phone_number": "+17131112222", "pushname": "Test User" },
    })
}

/// Scripted 2Chat remote. Group listings are keyed by phone number, message
/// pages by group UUID in page order; pages past the script are empty
/// (exhaustion), unknown UUIDs answer 422 like the real API.
#[derive(Default)]
pub struct RemoteFixture {
    groups: HashMap<String, (u16, Value)>,
    pages: HashMap<String, Vec<(u16, Value)>>,
    require_key: Option<String>,
}

impl RemoteFixture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only answer requests carrying this API key; others get 401.
    pub fn requiring_key(mut self, key: &str) -> Self {
        self.require_key = Some(key.to_string());
        self
    }

    pub fn with_groups(mut self, phone: &str, groups: Vec<Value>) -> Self {
        self.groups.insert(
            phone.to_string(),
            (200, json!({ "success": true, "data": groups })),
        );
        self
    }

    pub fn with_groups_response(mut self, phone: &str, status: u16, body: Value) -> Self {
        self.groups.insert(phone.to_string(), (status, body));
        self
    }

    /// Script a group's pages; each entry is one page's message list.
    pub fn with_pages(mut self, uuid: &str, pages: Vec<Vec<Value>>) -> Self {
        let scripted = pages
            .into_iter()
            .enumerate()
            .map(|(n, messages)| {
                (
                    200,
                    json!({ "success": true, "page_number": n, "messages": messages }),
                )
            })
            .collect();
        self.pages.insert(uuid.to_string(), scripted);
        self
    }

    pub fn with_page_response(mut self, uuid: &str, status: u16, body: Value) -> Self {
        self.pages.insert(uuid.to_string(), vec![(status, body)]);
        self
    }

    pub async fn spawn(self) -> String {
        let state = Arc::new(self);
        let router = Router::new()
            .route("/whatsapp/groups/{phone}", get(groups_handler))
            .route("/whatsapp/groups/messages/{uuid}", get(messages_handler))
            .with_state(state);
        spawn(router).await
    }
}

#[derive(Deserialize)]
struct PageQuery {
    page_number: u32,
}

fn status_of(code: u16) -> StatusCode {
    StatusCode::from_u16(code).expect("valid status code")
}

fn key_rejection(fixture: &RemoteFixture, headers: &HeaderMap) -> Option<(StatusCode, Json<Value>)> {
    let expected = fixture.require_key.as_deref()?;
    let presented = headers
        .get("X-User-API-Key")
        .and_then(|v| v.to_str().ok());
    if presented == Some(expected) {
        None
    } else {
        Some((
            StatusCode::UNAUTHORIZED,
            Json(json!({ "success": false, "message": "invalid api key" })),
        ))
    }
}

async fn groups_handler(
    State(fixture): State<Arc<RemoteFixture>>,
    Path(phone): Path<String>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    if let Some(rejection) = key_rejection(&fixture, &headers) {
        return rejection;
    }
    match fixture.groups.get(&phone) {
        Some((status, body)) => (status_of(*status), Json(body.clone())),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "success": false, "message": "unknown number" })),
        ),
    }
}

async fn messages_handler(
    State(fixture): State<Arc<RemoteFixture>>,
    Path(uuid): Path<String>,
    Query(query): Query<PageQuery>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    if let Some(rejection) = key_rejection(&fixture, &headers) {
        return rejection;
    }
    match fixture.pages.get(&uuid) {
        Some(pages) => match pages.get(query.page_number as usize) {
            Some((status, body)) => (status_of(*status), Json(body.clone())),
            None => (
                StatusCode::OK,
                Json(json!({
                    "success": true,
                    "page_number": query.page_number,
                    "messages": [],
                })),
            ),
        },
        None => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "success": false, "message": "unknown group" })),
        ),
    }
}
