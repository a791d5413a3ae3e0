use thiserror::Error;

use crate::{models::EventSlugRecord, repository::Repository};

/// Where every failed resolution lands. The failure reason is only logged.
pub const FALLBACK_PATH: &str = "/";

/// SlugLookup
///
/// The lookup result as the resolver sees it. Backend faults and ambiguous matches are
/// folded into `NotFound` before they get here.
#[derive(Debug, Clone, PartialEq)]
pub enum SlugLookup {
    Found(EventSlugRecord),
    NotFound,
}

/// Why a lookup produced no record. Logged for operators, never shown to visitors.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("no event has custom_slug {0:?}")]
    NotFound(String),
    #[error("custom_slug {slug:?} matches {matches} events")]
    Ambiguous { slug: String, matches: usize },
    #[error("event lookup failed: {0}")]
    Backend(#[from] sqlx::Error),
}

/// ShortLinkState
///
/// Progress of one short-link visit. `Resolving` is the pending state a client-rendered
/// page holds (and shows a loading indicator for) until `/api/shortlinks/{short_slug}`
/// answers; the server itself only produces the settled `Redirect`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShortLinkState {
    Resolving,
    Redirect(String),
}

impl ShortLinkState {
    pub fn is_resolving(&self) -> bool {
        matches!(self, ShortLinkState::Resolving)
    }

    pub fn redirect_target(&self) -> Option<&str> {
        match self {
            ShortLinkState::Resolving => None,
            ShortLinkState::Redirect(target) => Some(target),
        }
    }
}

/// Canonical public path of an event.
pub fn event_path(record: &EventSlugRecord) -> String {
    format!("/boutique/{}/event/{}", record.slug, record.id)
}

/// redirect_target
///
/// Pure decision: a found record goes to its canonical path, anything else to the site
/// root.
pub fn redirect_target(lookup: &SlugLookup) -> String {
    match lookup {
        SlugLookup::Found(record) => event_path(record),
        SlugLookup::NotFound => FALLBACK_PATH.to_string(),
    }
}

/// Runs the single lookup attempt and keeps the detailed outcome for logging.
async fn fetch_unique(repo: &dyn Repository, segment: &str) -> Result<EventSlugRecord, LookupError> {
    // Two rows are enough to tell a unique match from an ambiguous one.
    let mut rows = repo.find_events_by_custom_slug(segment, 2).await?;
    match rows.len() {
        0 => Err(LookupError::NotFound(segment.to_string())),
        1 => Ok(rows.remove(0)),
        matches => Err(LookupError::Ambiguous {
            slug: segment.to_string(),
            matches,
        }),
    }
}

/// lookup
///
/// Boundary between the store and the resolver. No retries: one attempt, and every
/// failure collapses into `SlugLookup::NotFound`.
pub async fn lookup(repo: &dyn Repository, segment: &str) -> SlugLookup {
    match fetch_unique(repo, segment).await {
        Ok(record) => SlugLookup::Found(record),
        Err(LookupError::Backend(e)) => {
            tracing::error!(short_slug = %segment, "short link lookup failed: {}", e);
            SlugLookup::NotFound
        }
        Err(e) => {
            tracing::warn!(short_slug = %segment, "short link unresolved: {}", e);
            SlugLookup::NotFound
        }
    }
}

/// resolve
///
/// Runs the lookup for one visit and returns the settled redirect. The server never
/// answers with `Resolving`.
pub async fn resolve(repo: &dyn Repository, segment: &str) -> ShortLinkState {
    tracing::debug!(short_slug = %segment, "resolving short link");

    let target = redirect_target(&lookup(repo, segment).await);
    tracing::info!(short_slug = %segment, redirect_to = %target, "short link resolved");
    ShortLinkState::Redirect(target)
}
