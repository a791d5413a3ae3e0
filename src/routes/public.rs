use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Public Router Module
///
/// Endpoints that need no session. The session redirect endpoint reads a session when one
/// is present but never requires it.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Dependency probe for load balancers: 200 when healthy, 503 otherwise.
        .route("/health", get(handlers::health_check))
        // GET /api/roles/{role}/dashboard
        .route("/api/roles/{role}/dashboard", get(handlers::get_role_dashboard))
        // GET /api/session/redirect?current_path=/login
        .route("/api/session/redirect", get(handlers::get_login_redirect))
        // GET /api/shortlinks/{short_slug}
        .route("/api/shortlinks/{short_slug}", get(handlers::resolve_short_link))
        // GET /{short_slug}
        // Single-segment catch for short links. Static single-segment routes registered
        // elsewhere (/health, /me, dashboards) take precedence.
        .route("/{short_slug}", get(handlers::follow_short_link))
}
