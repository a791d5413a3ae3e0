use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::BTreeMap;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::roles::Role;

// --- Core Application Schemas (Mapped to Database) ---

/// Profile
///
/// A row of the `public.profiles` table, loaded for every authenticated request.
/// `role` is kept as stored; callers interpret it through `Role::from_lossy`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Profile {
    // Primary Key, also the Foreign Key to the external auth.users table.
    pub id: Uuid,
    pub email: String,
    pub role: String,
}

/// EventSlugRecord
///
/// The slice of an `events` row the short-link resolver needs. Written by the event
/// management side of the product; read-only here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct EventSlugRecord {
    // Internal identifier, rendered as text whatever the column type.
    pub id: String,
    // Stable slug used in canonical URLs.
    pub slug: String,
    // Optional human-shareable short link.
    pub custom_slug: Option<String>,
}

// --- Response Payloads (Output Schemas) ---

/// ShortLinkResponse
///
/// JSON form of a short-link resolution for client-rendered pages. `resolving` is the
/// "still resolving" signal; it is always `false` once the server answers.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct ShortLinkResponse {
    pub resolving: bool,
    pub redirect_to: Option<String>,
}

/// RoleDashboardResponse
///
/// Output of `GET /api/roles/{role}/dashboard`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct RoleDashboardResponse {
    // The input, echoed verbatim.
    pub role: String,
    pub valid: bool,
    pub dashboard_path: String,
}

/// LoginRedirectResponse
///
/// Where the frontend should send the current session after landing on `current_path`.
/// `None` means stay.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct LoginRedirectResponse {
    pub redirect_to: Option<String>,
}

/// DashboardPage
///
/// Payload rendered for an authorized visit to a guarded dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct DashboardPage {
    pub role: Role,
    pub dashboard_path: String,
    pub profile: Profile,
}

/// HealthCheck
///
/// Result of probing one dependency.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct HealthCheck {
    pub ok: bool,
    pub detail: Option<String>,
}

/// HealthReport
///
/// Body of `GET /health`. `status` is "ok" only when every check passed.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct HealthReport {
    pub status: String,
    pub checks: BTreeMap<String, HealthCheck>,
    #[ts(type = "string")]
    pub checked_at: DateTime<Utc>,
}

/// EnvVarStatus
///
/// One entry of the admin environment report. Values are never exposed.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct EnvVarStatus {
    pub name: String,
    pub set: bool,
}
