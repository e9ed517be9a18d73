//! Gateway-wide request budget

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{
    Quota, RateLimiter,
    clock::{Clock, DefaultClock},
    state::{InMemoryState, NotKeyed},
};

use super::ApiState;

/// One budget shared by every route
pub type SharedLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Budget of `requests_per_minute`, all of which may be spent in a burst
///
/// Zero is treated as one.
#[must_use]
pub fn create_limiter(requests_per_minute: u32) -> SharedLimiter {
    let rpm = NonZeroU32::new(requests_per_minute).unwrap_or(NonZeroU32::MIN);
    Arc::new(RateLimiter::direct(Quota::per_minute(rpm)))
}

/// Whole seconds a client should wait, rounded up and at least one
fn retry_after_secs(wait: Duration) -> u64 {
    let secs = wait.as_secs() + u64::from(wait.subsec_nanos() > 0);
    secs.max(1)
}

/// Reject with 429 and `Retry-After` once the budget is spent
pub async fn rate_limit_middleware(
    State(state): State<Arc<ApiState>>,
    req: Request,
    next: Next,
) -> Response {
    let Some(limiter) = &state.rate_limiter else {
        return next.run(req).await;
    };

    match limiter.check() {
        Ok(()) => next.run(req).await,
        Err(not_until) => {
            let retry_after =
                retry_after_secs(not_until.wait_time_from(DefaultClock::default().now()));
            tracing::warn!(
                method = %req.method(),
                path = %req.uri().path(),
                retry_after,
                "request budget exhausted"
            );
            (
                StatusCode::TOO_MANY_REQUESTS,
                [(header::RETRY_AFTER, retry_after.to_string())],
            )
                .into_response()
        }
    }
}
