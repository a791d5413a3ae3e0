use axum::{
    extract::{Request, State},
    http::{
        HeaderValue, Method,
        header::{ORIGIN, REFERRER_POLICY, X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS},
    },
    middleware::Next,
    response::Response,
};

use crate::config::AppConfig;

/// OriginCheck
///
/// Outcome of comparing a request's `Origin` header with the configured site origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OriginCheck {
    SameOrigin,
    Missing,
    Mismatch,
}

/// Compares origins ignoring a trailing slash on the configured site URL.
pub fn check_origin(origin: Option<&str>, site_url: &str) -> OriginCheck {
    match origin {
        None => OriginCheck::Missing,
        Some(origin) if origin == site_url.trim_end_matches('/') => OriginCheck::SameOrigin,
        Some(_) => OriginCheck::Mismatch,
    }
}

fn is_state_changing(method: &Method) -> bool {
    !matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

/// csrf_origin_check
///
/// Logs state-changing requests whose `Origin` differs from `SITE_URL`. It never rejects:
/// payment-provider webhooks post from foreign origins and are verified by signature
/// downstream.
pub async fn csrf_origin_check(
    State(config): State<AppConfig>,
    request: Request,
    next: Next,
) -> Response {
    if is_state_changing(request.method()) {
        let origin = request
            .headers()
            .get(ORIGIN)
            .and_then(|value| value.to_str().ok());

        if check_origin(origin, &config.site_url) == OriginCheck::Mismatch {
            tracing::warn!(
                method = %request.method(),
                uri = %request.uri(),
                origin = origin.unwrap_or_default(),
                expected = %config.site_url,
                "cross-origin state-changing request"
            );
        }
    }

    next.run(request).await
}

/// security_headers
///
/// Adds the baseline hardening headers to every response.
pub async fn security_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert(X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    headers.insert(
        REFERRER_POLICY,
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );

    response
}
