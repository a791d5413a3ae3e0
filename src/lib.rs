use axum::{
    Router,
    extract::{FromRef, Request},
    http::HeaderName,
    middleware::{Next, from_fn, from_fn_with_state},
    response::Response,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

pub mod auth;
pub mod config;
pub mod guard;
pub mod handlers;
pub mod health;
pub mod middleware;
pub mod models;
pub mod repository;
pub mod roles;
pub mod shortlink;

// Routing segregation (Public, Authenticated, Dashboards, Admin).
pub mod routes;
use auth::AuthUser;
use routes::{admin, authenticated, dashboards, public};

// --- Public Re-exports ---

pub use config::AppConfig;
pub use repository::{PostgresRepository, RepositoryState};
pub use roles::{Role, is_valid_role, resolve_dashboard_path, should_redirect_after_login};

/// ApiDoc
///
/// OpenAPI document for the JSON endpoints, served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health_check, handlers::follow_short_link, handlers::resolve_short_link,
        handlers::get_role_dashboard, handlers::get_login_redirect, handlers::get_me,
        handlers::get_env_report
    ),
    components(
        schemas(
            models::Profile, models::EventSlugRecord, models::ShortLinkResponse,
            models::RoleDashboardResponse, models::LoginRedirectResponse, models::DashboardPage,
            models::HealthCheck, models::HealthReport, models::EnvVarStatus, roles::Role,
        )
    ),
    tags(
        (name = "webtv-portal", description = "Short links, role routing and dashboard guards")
    )
)]
struct ApiDoc;

/// AppState
///
/// Single immutable container for the services every request may need. Cloned per
/// request; all members are cheap handles.
#[derive(Clone)]
pub struct AppState {
    /// Persistence layer (Postgres in production).
    pub repo: RepositoryState,
    /// The loaded, immutable environment configuration.
    pub config: AppConfig,
    /// Outbound HTTP client, used by the health probes.
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(repo: RepositoryState, config: AppConfig) -> Self {
        Self {
            repo,
            config,
            http: reqwest::Client::new(),
        }
    }
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// auth_middleware
///
/// Enforces authentication for `authenticated_routes`. Extracting `AuthUser` rejects the
/// request with 401 before the handler runs when no session can be resolved.
async fn auth_middleware(_auth_user: AuthUser, request: Request, next: Next) -> Response {
    next.run(request).await
}

/// create_router
///
/// Assembles the routing structure, applies global and scoped middleware, and registers
/// the application state.
///
/// *Layering order* (outermost first, as a request sees it):
/// 1. CORS.
/// 2. Request id: assigned if absent, then propagated to the response.
/// 3. Trace span per request, tagged with that id; latency logged at INFO.
/// 4. Security response headers on every answer, including redirects.
/// 5. Warn-only origin check for state-changing methods.
/// 6. Routes. Only `/me` carries `auth_middleware`; dashboards resolve the session
///    themselves through `Option<AuthUser>` so anonymous visitors get a redirect, not 401.
///
/// *Route precedence*: static routes (`/health`, the dashboard pages, `/api/..`)
/// always win over the catch-all `/{short_slug}`.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    // 1. Application routes, grouped by access level.
    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public::public_routes())
        .merge(
            authenticated::authenticated_routes().route_layer(from_fn_with_state(
                state.clone(),
                auth_middleware,
            )),
        )
        .merge(dashboards::dashboard_routes())
        .merge(admin::admin_routes())
        // 2. Request filtering. Warn-only CSRF origin check; see
        //    `middleware::csrf_origin_check`.
        .layer(from_fn_with_state(
            state.config.clone(),
            middleware::csrf_origin_check,
        ))
        .layer(from_fn(middleware::security_headers))
        .with_state(state);

    // 3. Observability and correlation layers, outermost.
    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Span for every request, carrying the `x-request-id` so all log lines of one request
/// correlate.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
