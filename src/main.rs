use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use webtv_portal::{
    AppState,
    config::{AppConfig, Env},
    create_router,
    repository::{PostgresRepository, RepositoryState},
};

/// main
///
/// Initializes configuration, logging and the database pool, then serves HTTP.
///
/// *Startup contract*:
/// - Production refuses to start without `DATABASE_URL`, `SUPABASE_JWT_SECRET` and
///   `SITE_URL` (`AppConfig::load` panics with the missing variable's name).
/// - Local mode still needs `DATABASE_URL`; the JWT secret and site URL fall back to
///   development values, and the `x-user-id` bypass is enabled.
/// - The database is never contacted here; the first query opens the first connection.
#[tokio::main]
async fn main() {
    // 1. Configuration (fail-fast on missing production secrets)
    dotenv::dotenv().ok();
    let config = AppConfig::load();

    // 2. Logging: RUST_LOG wins, otherwise sensible local defaults.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "webtv_portal=debug,tower_http=info,axum=trace".into());

    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            // JSON lines for the log aggregator.
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Application starting in {:?} mode", config.env);

    // 3. Database. Lazy connect: an unreachable database degrades `/health` and makes
    //    short links fall back to `/` instead of preventing startup.
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect_lazy(&config.db_url)
        .expect("FATAL: DATABASE_URL is not a valid Postgres connection string.");

    let repo = Arc::new(PostgresRepository::new(pool)) as RepositoryState;

    // 4. State, router, server. The HTTP client for health checks is built inside
    //    `AppState::new` and shared by every request.
    let bind_addr = config.bind_addr.clone();
    let app = create_router(AppState::new(repo, config));

    let listener = TcpListener::bind(&bind_addr)
        .await
        .expect("FATAL: Failed to bind HTTP listener. Check BIND_ADDR.");

    tracing::info!("Listening on {}", bind_addr);
    tracing::info!("API Documentation (Swagger UI) available at /swagger-ui");

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("server error: {}", e);
    }
}
