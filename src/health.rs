use chrono::Utc;
use std::{collections::BTreeMap, time::Duration};

use crate::{
    AppState,
    models::{HealthCheck, HealthReport},
    repository::Repository,
};

const PROBE_TIMEOUT: Duration = Duration::from_secs(3);

impl HealthCheck {
    fn pass() -> Self {
        Self {
            ok: true,
            detail: None,
        }
    }

    fn fail(detail: impl Into<String>) -> Self {
        Self {
            ok: false,
            detail: Some(detail.into()),
        }
    }
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.checks.values().all(|check| check.ok)
    }
}

pub async fn check_database(repo: &dyn Repository) -> HealthCheck {
    match tokio::time::timeout(PROBE_TIMEOUT, repo.ping()).await {
        Ok(Ok(())) => HealthCheck::pass(),
        Ok(Err(e)) => {
            tracing::error!("health: database ping failed: {:?}", e);
            HealthCheck::fail("database unreachable")
        }
        Err(_) => {
            tracing::error!("health: database ping timed out");
            HealthCheck::fail("database ping timed out")
        }
    }
}

/// check_auth_provider
///
/// The Supabase auth service counts as reachable on any non-5xx answer; a 401 for a
/// missing api key still proves the service is up.
pub async fn check_auth_provider(client: &reqwest::Client, supabase_url: &str) -> HealthCheck {
    let url = format!("{}/auth/v1/health", supabase_url);
    match client.get(&url).timeout(PROBE_TIMEOUT).send().await {
        Ok(response) if !response.status().is_server_error() => HealthCheck::pass(),
        Ok(response) => {
            tracing::error!(status = %response.status(), "health: auth provider unhealthy");
            HealthCheck::fail(format!("auth provider returned {}", response.status()))
        }
        Err(e) => {
            tracing::error!("health: auth provider unreachable: {}", e);
            HealthCheck::fail("auth provider unreachable")
        }
    }
}

/// run_checks
///
/// Probes every configured dependency once. The auth provider is only checked when
/// `SUPABASE_URL` is set.
pub async fn run_checks(state: &AppState) -> HealthReport {
    let mut checks = BTreeMap::new();
    checks.insert("database".to_string(), check_database(state.repo.as_ref()).await);

    if let Some(supabase_url) = &state.config.supabase_url {
        checks.insert(
            "auth_provider".to_string(),
            check_auth_provider(&state.http, supabase_url).await,
        );
    }

    let status = if checks.values().all(|check| check.ok) {
        "ok"
    } else {
        "degraded"
    };

    HealthReport {
        status: status.to_string(),
        checks,
        checked_at: Utc::now(),
    }
}
