use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Authenticated Router Module
///
/// Every handler here relies on the `auth_middleware` layer applied by `create_router`,
/// so requests without a valid session are rejected with 401 before reaching them.
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // GET /me
        // The caller's stored profile, including the raw role string.
        .route("/me", get(handlers::get_me))
}
