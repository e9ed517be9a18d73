//! Front-desk key check for the conversation log endpoints

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::ApiState;

/// Bearer token from the Authorization header
fn bearer_token(req: &Request) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, "Bearer realm=\"concierge-admin\"")],
    )
        .into_response()
}

/// Guard the admin routes with `CONCIERGE_API_KEY`
///
/// With no key configured the log is readable by anyone on the network;
/// every such request is logged at warn level.
pub async fn require_admin_key(
    State(state): State<Arc<ApiState>>,
    req: Request,
    next: Next,
) -> Response {
    let Some(expected) = state.api_key.as_deref() else {
        tracing::warn!(
            path = %req.uri().path(),
            "CONCIERGE_API_KEY not set - serving conversation log without authentication"
        );
        return next.run(req).await;
    };

    match bearer_token(&req) {
        Some(token) if token == expected => next.run(req).await,
        Some(_) => {
            tracing::warn!(path = %req.uri().path(), "rejected admin request with wrong key");
            unauthorized()
        }
        None => {
            tracing::debug!(path = %req.uri().path(), "admin request without bearer token");
            unauthorized()
        }
    }
}
