use crate::models::{EventSlugRecord, Profile};
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

/// Repository Trait
///
/// Abstract contract for every persistence operation, so handlers and extractors never
/// see the concrete store (Postgres in production, mocks in tests).
///
/// **Send + Sync + async_trait** are required to share `Arc<dyn Repository>` across
/// Axum's task boundaries.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Auth ---
    // Loads the profile for an authenticated subject. `None` if missing or on error.
    async fn get_profile(&self, id: Uuid) -> Option<Profile>;

    // --- Short Links ---
    /// Fetches at most `limit` events whose `custom_slug` equals `custom_slug` exactly.
    /// Backend errors are returned, not swallowed: the resolver logs the reason.
    async fn find_events_by_custom_slug(
        &self,
        custom_slug: &str,
        limit: i64,
    ) -> Result<Vec<EventSlugRecord>, sqlx::Error>;

    // --- Diagnostics ---
    async fn ping(&self) -> Result<(), sqlx::Error>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the application state.
pub type RepositoryState = Arc<dyn Repository>;

/// PostgresRepository
///
/// The `Repository` implementation backed by the Supabase Postgres database.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    /// get_profile
    ///
    /// Reads the current role from `public.profiles` so a demoted or deleted user loses
    /// access even while holding a valid token.
    async fn get_profile(&self, id: Uuid) -> Option<Profile> {
        match sqlx::query_as::<_, Profile>("SELECT id, email, role FROM profiles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
        {
            Ok(profile) => profile,
            Err(e) => {
                tracing::error!(user_id = %id, "get_profile error: {:?}", e);
                None
            }
        }
    }

    /// find_events_by_custom_slug
    ///
    /// Exact, case-sensitive match on `custom_slug`. The id is cast to text so the
    /// record shape does not depend on the column type.
    async fn find_events_by_custom_slug(
        &self,
        custom_slug: &str,
        limit: i64,
    ) -> Result<Vec<EventSlugRecord>, sqlx::Error> {
        sqlx::query_as::<_, EventSlugRecord>(
            r#"
            SELECT id::text AS id, slug, custom_slug
            FROM events
            WHERE custom_slug = $1
            LIMIT $2
            "#,
        )
        .bind(custom_slug)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }

    async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await.map(|_| ())
    }
}
