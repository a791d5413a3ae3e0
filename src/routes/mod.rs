/// Router Module Index
///
/// Routing split by access level, so protection is applied per module through Axum
/// layers rather than remembered per handler.

/// Routes open to anyone: health, role table, short links.
pub mod public;

/// Routes behind the `AuthUser` middleware. Require a validated session.
pub mod authenticated;

/// One guarded page per role dashboard. Unauthorized visitors are redirected, not
/// rejected.
pub mod dashboards;

/// JSON endpoints restricted to the admin role.
pub mod admin;
