//! Admin API endpoints for reading the conversation log

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    routing::get,
};
use serde::{Deserialize, Serialize};

use super::{ApiState, auth::require_admin_key};

/// Default number of exchanges returned per session
const DEFAULT_LIMIT: usize = 100;

// --- Request/Response types ---

#[derive(Deserialize)]
pub struct ConversationQuery {
    pub limit: Option<usize>,
}

#[derive(Serialize)]
pub struct SessionResponse {
    pub session_id: String,
    pub turns: usize,
    pub first_at: String,
    pub last_at: String,
}

#[derive(Serialize)]
pub struct ConversationResponse {
    pub id: String,
    pub user_message: String,
    pub bot_response: String,
    pub intent: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
    pub created_at: String,
}

#[derive(Serialize)]
pub struct DeletedResponse {
    pub deleted: usize,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

fn error_response(code: &str, message: &str) -> Json<ErrorResponse> {
    Json(ErrorResponse {
        error: ErrorDetail {
            code: code.to_string(),
            message: message.to_string(),
        },
    })
}

fn db_error(e: &crate::Error) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        error_response("db_error", &e.to_string()),
    )
}

// --- Handlers ---

/// List sessions present in the log
async fn list_sessions(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<SessionResponse>>, (StatusCode, Json<ErrorResponse>)> {
    let sessions = state.conversations.list_sessions().map_err(|e| db_error(&e))?;

    Ok(Json(
        sessions
            .into_iter()
            .map(|s| SessionResponse {
                session_id: s.session_id,
                turns: s.turns,
                first_at: s.first_at.to_rfc3339(),
                last_at: s.last_at.to_rfc3339(),
            })
            .collect(),
    ))
}

/// Get logged exchanges for a session
async fn get_session_conversations(
    State(state): State<Arc<ApiState>>,
    Path(session_id): Path<String>,
    Query(query): Query<ConversationQuery>,
) -> Result<Json<Vec<ConversationResponse>>, (StatusCode, Json<ErrorResponse>)> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);

    let conversations = state
        .conversations
        .list_for_session(&session_id, limit)
        .map_err(|e| db_error(&e))?;

    Ok(Json(
        conversations
            .into_iter()
            .map(|c| ConversationResponse {
                id: c.id,
                user_message: c.user_message,
                bot_response: c.bot_response,
                intent: c.intent,
                metadata: c.metadata.and_then(|m| serde_json::to_value(m).ok()),
                created_at: c.created_at.to_rfc3339(),
            })
            .collect(),
    ))
}

/// Purge a session from the log
async fn delete_session(
    State(state): State<Arc<ApiState>>,
    Path(session_id): Path<String>,
) -> Result<Json<DeletedResponse>, (StatusCode, Json<ErrorResponse>)> {
    let deleted = state
        .conversations
        .delete_session(&session_id)
        .map_err(|e| db_error(&e))?;

    if deleted == 0 {
        return Err((
            StatusCode::NOT_FOUND,
            error_response("not_found", "Session not found"),
        ));
    }

    tracing::info!(session_id = %session_id, deleted, "purged session from log");
    Ok(Json(DeletedResponse { deleted }))
}

/// Build admin router with auth middleware
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/sessions", get(list_sessions))
        .route("/sessions/{id}", axum::routing::delete(delete_session))
        .route("/sessions/{id}/conversations", get(get_session_conversations))
        .layer(middleware::from_fn_with_state(state.clone(), require_admin_key))
        .with_state(state)
}
