use axum::{
    extract::{FromRef, FromRequestParts, OptionalFromRequestParts},
    http::{StatusCode, header, request::Parts},
};
use jsonwebtoken::{DecodingKey, Validation, decode, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use uuid::Uuid;

use crate::{
    config::{AppConfig, Env},
    models::Profile,
    repository::RepositoryState,
    roles::Role,
};

/// Audience Supabase stamps on every access token issued to a signed-in user.
pub const SUPABASE_AUDIENCE: &str = "authenticated";

/// Claims
///
/// Payload expected inside a Supabase-issued JWT. Supabase also sends `role`, `email`
/// and session metadata; those are ignored, the stored profile is authoritative.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (sub): the UUID of the user, primary key of `public.profiles`.
    pub sub: Uuid,
    /// Audience (aud): must be `SUPABASE_AUDIENCE`.
    pub aud: String,
    /// Expiration Time (exp).
    pub exp: usize,
    /// Issued At (iat).
    pub iat: usize,
}

/// AuthUser
///
/// The resolved identity of an authenticated request: the stored profile plus its role,
/// already interpreted with the least-privilege fallback.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub role: Role,
    pub profile: Profile,
}

impl From<Profile> for AuthUser {
    fn from(profile: Profile) -> Self {
        AuthUser {
            id: profile.id,
            role: Role::from_lossy(&profile.role),
            profile,
        }
    }
}

/// authenticate
///
/// Shared by the strict and the optional extractor:
/// 1. Local bypass: `x-user-id` header, honored only in `Env::Local`.
/// 2. Bearer token extraction and JWT validation.
/// 3. Profile lookup, so deleted users are rejected even with a live token.
///
/// Every failure is `StatusCode::UNAUTHORIZED`.
async fn authenticate(
    parts: &Parts,
    repo: &RepositoryState,
    config: &AppConfig,
) -> Result<AuthUser, StatusCode> {
    if config.env == Env::Local {
        let bypass_id = parts
            .headers
            .get("x-user-id")
            .and_then(|value| value.to_str().ok())
            .and_then(|id_str| Uuid::parse_str(id_str).ok());
        if let Some(user_id) = bypass_id {
            if let Some(profile) = repo.get_profile(user_id).await {
                return Ok(profile.into());
            }
        }
        // Fall through to JWT validation when the bypass header is absent or unknown.
    }

    let token = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());
    let mut validation = Validation::default();
    validation.validate_exp = true;
    validation.set_audience(&[SUPABASE_AUDIENCE]);

    let token_data = decode::<Claims>(token, &decoding_key, &validation).map_err(|e| {
        match e.kind() {
            ErrorKind::ExpiredSignature => tracing::debug!("rejected expired token"),
            kind => tracing::debug!(?kind, "rejected invalid token"),
        }
        StatusCode::UNAUTHORIZED
    })?;

    let user_id = token_data.claims.sub;
    let profile = repo.get_profile(user_id).await.ok_or_else(|| {
        tracing::warn!(%user_id, "valid token for a user without a profile");
        StatusCode::UNAUTHORIZED
    })?;

    Ok(profile.into())
}

/// Strict extractor: rejects the request with 401 when no session can be resolved.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    RepositoryState: FromRef<S>,
    AppConfig: FromRef<S>,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let repo = RepositoryState::from_ref(state);
        let config = AppConfig::from_ref(state);
        authenticate(parts, &repo, &config).await
    }
}

/// Optional extractor (`Option<AuthUser>`): a missing or invalid session is `None`, so
/// page guards can decide where to send the visitor instead of failing with 401.
impl<S> OptionalFromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    RepositoryState: FromRef<S>,
    AppConfig: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        let repo = RepositoryState::from_ref(state);
        let config = AppConfig::from_ref(state);
        Ok(authenticate(parts, &repo, &config).await.ok())
    }
}
