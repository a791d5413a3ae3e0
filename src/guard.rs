use crate::{
    auth::AuthUser,
    roles::{LOGIN_PATH, Role},
};

/// Access
///
/// The settled outcome of a page-level access check:
/// - `Authorized` always carries the session that earned it.
/// - `Unauthorized` names where the visitor is sent instead.
#[derive(Debug, Clone)]
pub enum Access {
    Authorized(AuthUser),
    Unauthorized { redirect_to: &'static str },
}

/// AccessState
///
/// What a guarded page shows: a loading indicator until the session is known, then the
/// settled `Access`.
#[derive(Debug, Clone, Copy)]
pub enum AccessState<'a> {
    Loading,
    Settled(&'a Access),
}

impl AccessState<'_> {
    pub fn is_settled(&self) -> bool {
        matches!(self, AccessState::Settled(_))
    }
}

/// AccessGuard
///
/// Guards one page that requires `required`. A fresh navigation builds a fresh guard; the
/// guard settles exactly once and keeps that outcome for the rest of the page load.
#[derive(Debug, Clone)]
pub struct AccessGuard {
    required: Role,
    settled: Option<Access>,
}

impl AccessGuard {
    pub fn new(required: Role) -> Self {
        Self {
            required,
            settled: None,
        }
    }

    pub fn required(&self) -> Role {
        self.required
    }

    pub fn state(&self) -> AccessState<'_> {
        match &self.settled {
            None => AccessState::Loading,
            Some(access) => AccessState::Settled(access),
        }
    }

    /// settle
    ///
    /// Applies the fetched session and returns the outcome. The first call decides; a
    /// settled guard ignores the session passed to later calls and returns the same
    /// outcome again.
    pub fn settle(&mut self, session: Option<AuthUser>) -> &Access {
        let required = self.required;
        self.settled.get_or_insert_with(|| decide(required, session))
    }
}

/// decide
///
/// 1. No session: the login page.
/// 2. Matching role: authorized with that session.
/// 3. Any other role: the viewer's own dashboard, which that role can always enter.
fn decide(required: Role, session: Option<AuthUser>) -> Access {
    match session {
        None => Access::Unauthorized {
            redirect_to: LOGIN_PATH,
        },
        Some(user) if user.role == required => Access::Authorized(user),
        Some(user) => {
            tracing::info!(
                user_id = %user.id,
                role = %user.role,
                %required,
                "access denied to dashboard"
            );
            Access::Unauthorized {
                redirect_to: user.role.dashboard_path(),
            }
        }
    }
}
