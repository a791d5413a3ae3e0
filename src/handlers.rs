use crate::{
    AppState,
    auth::AuthUser,
    config::KNOWN_ENV_VARS,
    guard::{Access, AccessGuard},
    health,
    models::{
        DashboardPage, EnvVarStatus, HealthReport, LoginRedirectResponse, Profile,
        RoleDashboardResponse, ShortLinkResponse,
    },
    roles::{self, Role},
    shortlink,
};
use axum::{
    Json,
    extract::{Path, Query, State, rejection::PathRejection},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;

// --- Query Structs ---

/// LoginRedirectQuery
///
/// The page the frontend is currently showing.
#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LoginRedirectQuery {
    pub current_path: String,
}

// --- Handlers ---

/// health_check
///
/// [Public Route] Probes the database (and the auth provider when configured).
/// 200 when every check passes, 503 otherwise; the JSON body is the same shape either way.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "All dependencies reachable", body = HealthReport),
        (status = 503, description = "At least one dependency unreachable", body = HealthReport)
    )
)]
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthReport>) {
    let report = health::run_checks(&state).await;
    let status = if report.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(report))
}

/// follow_short_link
///
/// [Public Route] Redirects a short link to its canonical event page, or to `/` when it
/// cannot be resolved. Never renders an error.
#[utoipa::path(
    get,
    path = "/{short_slug}",
    params(("short_slug" = String, Path, description = "Custom slug of an event")),
    responses((status = 307, description = "Redirect to the event page or the site root"))
)]
pub async fn follow_short_link(
    State(state): State<AppState>,
    short_slug: Result<Path<String>, PathRejection>,
) -> Redirect {
    let Some(short_slug) = short_slug_segment(short_slug) else {
        return Redirect::temporary(shortlink::FALLBACK_PATH);
    };
    let settled = shortlink::resolve(state.repo.as_ref(), &short_slug).await;
    Redirect::temporary(settled.redirect_target().unwrap_or(shortlink::FALLBACK_PATH))
}

/// resolve_short_link
///
/// [Public Route] Same resolution as `follow_short_link`, returned as JSON for pages that
/// show their own loading indicator and navigate client-side.
#[utoipa::path(
    get,
    path = "/api/shortlinks/{short_slug}",
    params(("short_slug" = String, Path, description = "Custom slug of an event")),
    responses((status = 200, description = "Resolution", body = ShortLinkResponse))
)]
pub async fn resolve_short_link(
    State(state): State<AppState>,
    short_slug: Result<Path<String>, PathRejection>,
) -> Json<ShortLinkResponse> {
    let Some(short_slug) = short_slug_segment(short_slug) else {
        return Json(ShortLinkResponse {
            resolving: false,
            redirect_to: Some(shortlink::FALLBACK_PATH.to_string()),
        });
    };
    let settled = shortlink::resolve(state.repo.as_ref(), &short_slug).await;
    Json(ShortLinkResponse {
        resolving: settled.is_resolving(),
        redirect_to: settled.redirect_target().map(str::to_string),
    })
}

/// A segment axum cannot decode (e.g. percent-encoded bytes that are not UTF-8) is a
/// failed short link like any other: logged, then sent to the fallback.
fn short_slug_segment(segment: Result<Path<String>, PathRejection>) -> Option<String> {
    match segment {
        Ok(Path(short_slug)) => Some(short_slug),
        Err(rejection) => {
            tracing::warn!(error = %rejection.body_text(), "undecodable short link segment");
            None
        }
    }
}

/// get_role_dashboard
///
/// [Public Route] Exposes the role table. Unknown roles are reported as invalid but still
/// receive the client dashboard path.
#[utoipa::path(
    get,
    path = "/api/roles/{role}/dashboard",
    params(("role" = String, Path, description = "Role name, any case")),
    responses((status = 200, description = "Dashboard path", body = RoleDashboardResponse))
)]
pub async fn get_role_dashboard(Path(role): Path<String>) -> Json<RoleDashboardResponse> {
    Json(RoleDashboardResponse {
        valid: roles::is_valid_role(&role),
        dashboard_path: roles::resolve_dashboard_path(&role).to_string(),
        role,
    })
}

/// get_login_redirect
///
/// [Public Route] Post-login redirection. A visitor without a session has no role, so
/// `redirect_to` stays `null` regardless of the path.
#[utoipa::path(
    get,
    path = "/api/session/redirect",
    params(LoginRedirectQuery),
    responses((status = 200, description = "Redirect decision", body = LoginRedirectResponse))
)]
pub async fn get_login_redirect(
    session: Option<AuthUser>,
    Query(query): Query<LoginRedirectQuery>,
) -> Json<LoginRedirectResponse> {
    let role = session.as_ref().map(|user| user.profile.role.as_str());
    let redirect_to = role
        .filter(|_| roles::should_redirect_after_login(role, &query.current_path))
        .map(|role| roles::resolve_dashboard_path(role).to_string());
    Json(LoginRedirectResponse { redirect_to })
}

/// get_me
///
/// [Authenticated Route] The caller's stored profile.
#[utoipa::path(
    get,
    path = "/me",
    responses(
        (status = 200, description = "Profile", body = Profile),
        (status = 401, description = "No session")
    )
)]
pub async fn get_me(AuthUser { profile, .. }: AuthUser) -> Json<Profile> {
    Json(profile)
}

/// dashboard_page
///
/// [Guarded Page] Serves the dashboard owned by `required`. Runs the access guard once
/// for this page load and either renders the page payload or redirects.
pub async fn dashboard_page(required: Role, session: Option<AuthUser>) -> Response {
    let mut guard = AccessGuard::new(required);

    match guard.settle(session) {
        Access::Authorized(user) => Json(DashboardPage {
            role: user.role,
            dashboard_path: required.dashboard_path().to_string(),
            profile: user.profile.clone(),
        })
        .into_response(),
        Access::Unauthorized { redirect_to } => Redirect::temporary(redirect_to).into_response(),
    }
}

/// get_env_report
///
/// [Admin Route] Which known configuration variables are set in this process.
///
/// *Authorization*: Explicitly checks that the role resolved by `AuthUser` is admin.
#[utoipa::path(
    get,
    path = "/admin/diagnostics/env",
    responses(
        (status = 200, description = "Environment report", body = [EnvVarStatus]),
        (status = 403, description = "Not an admin")
    )
)]
pub async fn get_env_report(
    AuthUser { role, .. }: AuthUser,
) -> Result<Json<Vec<EnvVarStatus>>, StatusCode> {
    if role != Role::Admin {
        return Err(StatusCode::FORBIDDEN);
    }

    let report = KNOWN_ENV_VARS
        .iter()
        .map(|name| EnvVarStatus {
            name: (*name).to_string(),
            set: std::env::var_os(name).is_some_and(|value| !value.is_empty()),
        })
        .collect();
    Ok(Json(report))
}
