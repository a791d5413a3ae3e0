use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;
use ts_rs::TS;
use utoipa::ToSchema;

/// The literal path of the login page. Only a visit to this exact path triggers the
/// post-login redirect to a dashboard.
pub const LOGIN_PATH: &str = "/login";

/// Role
///
/// Closed set of user classifications stored in `profiles.role`. Each role owns exactly
/// one dashboard area.
///
/// *Parsing rules*:
/// 1. The input is lowercased, never trimmed: `"Admin"` is `Admin`, `" admin"` is not.
/// 2. `FromStr` is strict and returns `UnknownRole` for anything outside the set.
/// 3. `from_lossy` and every routing helper below map unknown input to `Client`
///    (least privilege), so a corrupt stored role can never reach a privileged page.
///
/// *Wire form*: lowercase in JSON (`serde`) and in the exported TypeScript union.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Role {
    Admin,
    Organizer,
    Partner,
    Provider,
    Client,
}

/// Returned by the strict `FromStr` parse. The lossy helpers never surface it.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Admin,
        Role::Organizer,
        Role::Partner,
        Role::Provider,
        Role::Client,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Organizer => "organizer",
            Role::Partner => "partner",
            Role::Provider => "provider",
            Role::Client => "client",
        }
    }

    /// The dashboard path owned by this role. The table is fixed at compile time.
    pub const fn dashboard_path(self) -> &'static str {
        match self {
            Role::Admin => "/admin/dashboard",
            Role::Organizer => "/organizer-dashboard",
            Role::Partner => "/partner-dashboard",
            Role::Provider => "/provider-dashboard",
            Role::Client => "/client-dashboard",
        }
    }

    /// Parses a role string, mapping anything unrecognized to `Role::Client`.
    pub fn from_lossy(role: &str) -> Role {
        role.parse().unwrap_or(Role::Client)
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.to_lowercase();
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == normalized)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// resolve_dashboard_path
///
/// Maps any role string to a dashboard path. Never fails: unknown roles get the client
/// dashboard.
pub fn resolve_dashboard_path(role: &str) -> &'static str {
    Role::from_lossy(role).dashboard_path()
}

/// is_valid_role
///
/// True iff the lowercased input names a member of the role set. Used to report whether
/// `resolve_dashboard_path` fell back to the client dashboard.
pub fn is_valid_role(role: &str) -> bool {
    role.parse::<Role>().is_ok()
}

/// should_redirect_after_login
///
/// A signed-in user sitting on the login page is sent to their dashboard.
///
/// - `role` is `None` for an anonymous visitor: always `false`, whatever the path.
/// - `current_path` must equal `LOGIN_PATH` exactly; `/login/` or `/login?next=..` stay.
pub fn should_redirect_after_login(role: Option<&str>, current_path: &str) -> bool {
    role.is_some() && current_path == LOGIN_PATH
}
