use crate::{AppState, auth::AuthUser, handlers, roles::Role};
use axum::{Router, routing::get};

/// Dashboard Router Module
///
/// Registers one guarded page per entry of the role table. Each page runs its own
/// access guard against the role that owns it.
pub fn dashboard_routes() -> Router<AppState> {
    Role::ALL.into_iter().fold(Router::new(), |router, role| {
        router.route(
            role.dashboard_path(),
            get(move |session: Option<AuthUser>| handlers::dashboard_page(role, session)),
        )
    })
}
