//! Assistant endpoint: one utterance in, one canned reply out

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use super::ApiState;
use crate::concierge::HotelProfile;
use crate::db::ConversationMetadata;
use crate::transcript::HistoryEntry;

/// Path served for clients built against the hosted edge-function deployment
pub const LEGACY_ASSISTANT_PATH: &str = "/functions/v1/hotel-voice-assistant";

/// Build assistant router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/api/assistant", post(assistant))
        .route(LEGACY_ASSISTANT_PATH, post(assistant))
        .route("/api/hotel", get(hotel))
        .with_state(state)
}

/// Assistant request body
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,

    /// Earlier turns; accepted for logging, not used for matching
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_history: Option<Vec<HistoryEntry>>,
}

/// Assistant response body
#[derive(Debug, Serialize, Deserialize)]
pub struct AssistantResponse {
    pub response: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,
}

/// Answer an utterance and log the exchange
///
/// The body is parsed by hand so that malformed JSON produces the same error
/// shape as every other failure of this endpoint.
async fn assistant(
    State(state): State<Arc<ApiState>>,
    body: Bytes,
) -> Result<Json<AssistantResponse>, AssistantError> {
    let request: AssistantRequest = serde_json::from_slice(&body).map_err(|e| {
        tracing::error!(error = %e, "error processing request");
        AssistantError::Internal(e.to_string())
    })?;

    let (Some(user_message), Some(session_id)) = (
        request.user_message.filter(|m| !m.is_empty()),
        request.session_id.filter(|s| !s.is_empty()),
    ) else {
        return Err(AssistantError::MissingFields);
    };

    let history_length = request.conversation_history.as_ref().map_or(0, Vec::len);

    let reply = state.concierge.respond(&user_message);
    let metadata = ConversationMetadata::new(&user_message, &reply.intent, history_length);

    // Logging is best effort: the guest still gets an answer
    if let Err(e) = state
        .conversations
        .record(&session_id, &user_message, &reply.text, &metadata)
    {
        tracing::error!(session_id = %session_id, error = %e, "error storing conversation");
    }

    tracing::info!(
        session_id = %session_id,
        intent = %reply.intent,
        history_length,
        "answered utterance"
    );

    Ok(Json(AssistantResponse {
        intent: Some(reply.intent.label().to_string()),
        response: reply.text,
    }))
}

/// Hotel facts the concierge answers from
async fn hotel(State(state): State<Arc<ApiState>>) -> Json<HotelProfile> {
    Json(state.concierge.profile().clone())
}

/// Assistant endpoint errors
#[derive(Debug)]
pub enum AssistantError {
    MissingFields,
    Internal(String),
}

impl IntoResponse for AssistantError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorBody {
            error: &'static str,
            #[serde(skip_serializing_if = "Option::is_none")]
            message: Option<String>,
        }

        let (status, error, message) = match self {
            Self::MissingFields => (StatusCode::BAD_REQUEST, "Missing required fields", None),
            Self::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error",
                Some(msg),
            ),
        };

        (status, Json(ErrorBody { error, message })).into_response()
    }
}
