use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Admin Router Module
///
/// Diagnostics for operators. Handlers check `Role::Admin` themselves and answer 403 to
/// anyone else; `/admin/dashboard` is a guarded page and lives in `dashboards`.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // GET /admin/diagnostics/env
        // Set/unset status of the known configuration variables. Values never leave the process.
        .route("/admin/diagnostics/env", get(handlers::get_env_report))
}
