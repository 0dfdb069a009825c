//! JSON HTTP API over the search and history operations.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::client::ChatApi;
use crate::config::{Config, DEFAULT_MAX_PAGES};
use crate::demo::demo_search_outcome;
use crate::error::RemoteError;
use crate::export::{sanitize_stem, write_export, ExportInfo};
use crate::history::fetch_all_messages;
use crate::models::{is_valid_phone_number, Group, Message};
use crate::search::{search_number, search_numbers};

pub struct AppState {
    pub api: Arc<dyn ChatApi>,
    pub config: Config,
}

/// Error answered as `{success: false, error}` with a status derived from
/// the remote error's kind, or 400 for boundary validation failures.
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl From<RemoteError> for ApiError {
    fn from(err: RemoteError) -> Self {
        let status = StatusCode::from_u16(err.kind.http_status())
            .unwrap_or(StatusCode::BAD_GATEWAY);
        Self {
            status,
            message: err.message,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "success": false, "error": self.message }));
        (self.status, body).into_response()
    }
}

#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    export: Option<ExportInfo>,
}

impl<T: Serialize> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            export: None,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GroupsData {
    phone_number: String,
    groups_count: usize,
    groups: Vec<Group>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HistoryData {
    group_uuid: String,
    messages_count: usize,
    messages: Vec<Message>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct HistoryQuery {
    max_pages: Option<u32>,
    export: Option<bool>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchRequest {
    phone_number: Option<String>,
    group_title: Option<String>,
    max_pages: Option<u32>,
    export: Option<bool>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchAllRequest {
    group_title: Option<String>,
    max_pages: Option<u32>,
    export: Option<bool>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api", get(api_docs))
        .route("/api/chat/groups/{id}", get(list_groups))
        .route("/api/chat/groups/{id}/messages", get(get_chat_history))
        .route("/api/chat/search", post(search_groups_by_title))
        .route("/api/chat/search-all", post(search_all_numbers))
        .route("/api/chat/demo", get(demo))
        .fallback(not_found)
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn serve(state: Arc<AppState>) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], state.config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "2chat checker API listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "success": true,
        "message": "2Chat chat checker API is running",
        "timestamp": Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn api_docs() -> Json<serde_json::Value> {
    Json(json!({
        "success": true,
        "message": "2Chat chat checker API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "GET /health",
            "listGroups": "GET /api/chat/groups/{phoneNumber}",
            "getChatHistory": "GET /api/chat/groups/{groupUuid}/messages",
            "searchGroups": "POST /api/chat/search",
            "searchAllNumbers": "POST /api/chat/search-all",
            "demo": "GET /api/chat/demo",
        },
    }))
}

async fn not_found() -> ApiError {
    ApiError {
        status: StatusCode::NOT_FOUND,
        message: "Endpoint not found".to_string(),
    }
}

fn validate_phone(phone_number: &str) -> Result<(), ApiError> {
    if !is_valid_phone_number(phone_number) {
        return Err(ApiError::bad_request(
            "Invalid phone number format. Use international format (e.g., +1234567890)",
        ));
    }
    Ok(())
}

async fn list_groups(
    State(state): State<Arc<AppState>>,
    Path(phone_number): Path<String>,
) -> Result<Response, ApiError> {
    validate_phone(&phone_number)?;

    let groups = state.api.list_groups(&phone_number).await?;
    let data = GroupsData {
        phone_number,
        groups_count: groups.len(),
        groups,
    };
    Ok(Json(ApiResponse::ok(data)).into_response())
}

async fn get_chat_history(
    State(state): State<Arc<AppState>>,
    Path(group_uuid): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Response, ApiError> {
    let max_pages = query.max_pages.unwrap_or(DEFAULT_MAX_PAGES);
    let messages = fetch_all_messages(state.api.as_ref(), &group_uuid, max_pages).await?;

    let mut response = ApiResponse::ok(HistoryData {
        group_uuid: group_uuid.clone(),
        messages_count: messages.len(),
        messages,
    });

    if query.export.unwrap_or(false) {
        let stem = format!("chat-history-{group_uuid}");
        let info = write_export(&state.config.export_dir, &stem, &response)
            .map_err(|e| ApiError::internal(e.to_string()))?;
        response.export = Some(info);
    }

    Ok(Json(response).into_response())
}

async fn search_groups_by_title(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SearchRequest>,
) -> Result<Response, ApiError> {
    let (Some(phone_number), Some(group_title)) = (request.phone_number, request.group_title)
    else {
        return Err(ApiError::bad_request(
            "Phone number and group title are required",
        ));
    };
    validate_phone(&phone_number)?;

    let max_pages = request.max_pages.unwrap_or(DEFAULT_MAX_PAGES);
    let outcome = search_number(state.api.as_ref(), &phone_number, &group_title, max_pages).await?;

    if outcome.matching_groups_count == 0 {
        return Ok(Json(json!({
            "success": true,
            "data": {
                "phoneNumber": outcome.phone_number,
                "searchTerm": outcome.search_term,
                "matchingGroups": [],
                "message": "No groups found matching the title",
            },
        }))
        .into_response());
    }

    let mut response = ApiResponse::ok(outcome);
    if request.export.unwrap_or(false) {
        let stem = format!("search-results-{}", sanitize_stem(&group_title));
        let info = write_export(&state.config.export_dir, &stem, &response)
            .map_err(|e| ApiError::internal(e.to_string()))?;
        response.export = Some(info);
    }

    Ok(Json(response).into_response())
}

async fn search_all_numbers(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SearchAllRequest>,
) -> Result<Response, ApiError> {
    let max_pages = request.max_pages.unwrap_or(DEFAULT_MAX_PAGES);
    let report = search_numbers(
        state.api.as_ref(),
        &state.config.search_numbers,
        request.group_title.as_deref(),
        max_pages,
    )
    .await;

    let mut response = ApiResponse::ok(report);
    if request.export.unwrap_or(false) {
        let stem = format!(
            "search-all-numbers-{}",
            sanitize_stem(request.group_title.as_deref().unwrap_or("all-groups"))
        );
        let info = write_export(&state.config.export_dir, &stem, &response)
            .map_err(|e| ApiError::internal(e.to_string()))?;
        response.export = Some(info);
    }

    Ok(Json(response).into_response())
}

async fn demo() -> Json<ApiResponse<crate::models::SearchOutcome>> {
    Json(ApiResponse::ok(demo_search_outcome()))
}
