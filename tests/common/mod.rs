//! Shared test utilities

#![allow(dead_code)]

use std::sync::Arc;

use concierge_gateway::{ApiServer, ApiServerBuilder, Concierge, DbPool, db};

/// Admin key used by test servers
pub const TEST_API_KEY: &str = "test-api-key";

/// Set up an in-memory test database
#[must_use]
pub fn setup_test_db() -> DbPool {
    db::init_memory().expect("failed to init test db")
}

/// Build a test API server with the default hotel profile and an admin key
#[must_use]
pub fn build_test_server(db: DbPool) -> ApiServer {
    build_test_server_with(db, None)
}

/// Build a test API server with an optional rate limit
#[must_use]
pub fn build_test_server_with(db: DbPool, rate_limit: Option<u32>) -> ApiServer {
    ApiServerBuilder::new(db, Arc::new(Concierge::default()))
        .port(0)
        .api_key(Some(TEST_API_KEY.to_string()))
        .rate_limit(rate_limit)
        .build()
}

/// Build a test API router
#[must_use]
pub fn build_test_router(db: DbPool) -> axum::Router {
    build_test_server(db).router()
}
