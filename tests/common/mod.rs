#![allow(dead_code)]

use async_trait::async_trait;
use axum::http::{HeaderValue, Request, header};
use jsonwebtoken::{EncodingKey, Header, encode};
use std::{sync::Arc, time::SystemTime};
use uuid::Uuid;
use webtv_portal::{
    AppState,
    auth::{Claims, SUPABASE_AUDIENCE},
    config::{AppConfig, Env},
    models::{EventSlugRecord, Profile},
    repository::Repository,
};

pub const TEST_JWT_SECRET: &str = "test-secret-value-1234567890";

// --- Mock Repository ---

/// Canned store used by every integration test. Lookups behave like the SQL query:
/// exact match on `custom_slug`, truncated to `limit`.
#[derive(Default, Clone)]
pub struct MockRepo {
    pub profile: Option<Profile>,
    pub events: Vec<EventSlugRecord>,
    pub fail_lookup: bool,
    pub fail_ping: bool,
}

impl MockRepo {
    pub fn with_profile(role: &str) -> Self {
        Self {
            profile: Some(profile(role)),
            ..Self::default()
        }
    }

    pub fn with_events(events: Vec<EventSlugRecord>) -> Self {
        Self {
            events,
            ..Self::default()
        }
    }
}

#[async_trait]
impl Repository for MockRepo {
    async fn get_profile(&self, id: Uuid) -> Option<Profile> {
        self.profile.clone().filter(|p| p.id == id)
    }

    async fn find_events_by_custom_slug(
        &self,
        custom_slug: &str,
        limit: i64,
    ) -> Result<Vec<EventSlugRecord>, sqlx::Error> {
        if self.fail_lookup {
            return Err(sqlx::Error::PoolTimedOut);
        }
        Ok(self
            .events
            .iter()
            .filter(|e| e.custom_slug.as_deref() == Some(custom_slug))
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn ping(&self) -> Result<(), sqlx::Error> {
        if self.fail_ping {
            Err(sqlx::Error::PoolClosed)
        } else {
            Ok(())
        }
    }
}

// --- Fixtures ---

pub const TEST_USER_ID: Uuid = Uuid::from_u128(1);

pub fn profile(role: &str) -> Profile {
    Profile {
        id: TEST_USER_ID,
        email: format!("{}@example.com", role.to_lowercase()),
        role: role.to_string(),
    }
}

pub fn event(id: &str, slug: &str, custom_slug: &str) -> EventSlugRecord {
    EventSlugRecord {
        id: id.to_string(),
        slug: slug.to_string(),
        custom_slug: Some(custom_slug.to_string()),
    }
}

pub fn app_state(env: Env, repo: MockRepo) -> AppState {
    let config = AppConfig {
        env,
        jwt_secret: TEST_JWT_SECRET.to_string(),
        site_url: "https://tv.example.com".to_string(),
        ..AppConfig::default()
    };
    AppState::new(Arc::new(repo), config)
}

fn now() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

/// Token signed with the test secret, shaped like a Supabase access token.
pub fn create_token(user_id: Uuid, exp_offset: u64) -> String {
    let now = now();
    token_expiring_at(user_id, now as usize, (now + exp_offset) as usize)
}

/// Token whose `exp` lies `seconds_ago` in the past.
pub fn create_expired_token(user_id: Uuid, seconds_ago: u64) -> String {
    let now = now();
    token_expiring_at(user_id, (now - 2 * seconds_ago) as usize, (now - seconds_ago) as usize)
}

fn token_expiring_at(user_id: Uuid, iat: usize, exp: usize) -> String {
    let claims = Claims {
        sub: user_id,
        aud: SUPABASE_AUDIENCE.to_string(),
        iat,
        exp,
    };

    let key = EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes());
    encode(&Header::default(), &claims, &key).unwrap()
}

/// Signs an arbitrary claim set with the test secret.
pub fn sign_claims(claims: &serde_json::Value) -> String {
    let key = EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes());
    encode(&Header::default(), claims, &key).unwrap()
}

/// Adds the local-development session header to a request builder.
pub fn as_user(builder: axum::http::request::Builder) -> axum::http::request::Builder {
    builder.header("x-user-id", TEST_USER_ID.to_string())
}

pub fn bearer(request: &mut Request<axum::body::Body>, token: &str) {
    request.headers_mut().insert(
        header::AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    );
}
