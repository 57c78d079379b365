//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but request-level
//! errors should use `registration::RegistrationError`.

use axum::{
    Router, http,
    http::{Method, header},
};
use pow::PowConfig;
use registration::domain::repository::TenantRegistrationRepository;
use registration::{
    InMemoryTenantRepository, RegistrationConfig, RegistrationManager, registration_router,
    store::RegistrationStore,
};
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_PORT: u16 = 3000;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "admission_api=info,pow=info,registration=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = load_config()?;

    let port = match env::var("SERVER_PORT") {
        Ok(port) => port.parse()?,
        Err(_) => DEFAULT_PORT,
    };
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    match env::var("DATABASE_URL") {
        Ok(database_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(&database_url)
                .await?;

            tracing::info!("Connected to database");

            // Run migrations
            sqlx::migrate!("../../../database/migrations")
                .run(&pool)
                .await?;

            tracing::info!("Migrations completed");

            serve(RegistrationStore::new(pool), config, addr).await
        }
        Err(_) => {
            tracing::warn!("DATABASE_URL not set, registrations are kept in memory only");
            serve(InMemoryTenantRepository::new(), config, addr).await
        }
    }
}

/// Registration configuration from the environment
fn load_config() -> anyhow::Result<RegistrationConfig> {
    let mut pow = PowConfig::default();

    if let Ok(hex) = env::var("POW_INITIAL_MAXIMUM_ALLOWED_HASH_VALUE") {
        pow = pow.with_initial_maximum_allowed_hash_value(hex.trim())?;
    }
    if let Ok(rate) = env::var("POW_DESIRED_SOLVE_RATE_PER_MINUTE") {
        pow.desired_solve_rate_per_minute = rate.trim().parse()?;
    }

    let mut config = RegistrationConfig {
        pow,
        ..RegistrationConfig::default()
    };

    match env::var("TERMS_OF_SERVICE_FILE_PATH") {
        Ok(path) => {
            let text = std::fs::read_to_string(&path)?;
            tracing::info!(path = %path, "Loaded terms of service");
            config = config.with_terms_of_service(text);
        }
        Err(_) => {
            tracing::warn!("TERMS_OF_SERVICE_FILE_PATH not set, terms of service are not enforced");
        }
    }

    Ok(config)
}

async fn serve<R>(repo: R, config: RegistrationConfig, addr: SocketAddr) -> anyhow::Result<()>
where
    R: TenantRegistrationRepository + Send + Sync + 'static,
{
    let manager = Arc::new(RegistrationManager::create(Arc::new(repo), config)?);
    manager.start().await;

    tracing::info!(
        maximum_allowed_hash_value = %manager.proof_of_work().difficulty().current_maximum_allowed_hash_value(),
        "PoW background tasks started"
    );

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([header::CONTENT_TYPE, header::ACCEPT]));

    // Build router
    let app = Router::new()
        .merge(registration_router(manager.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    let result = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    manager.stop().await;
    tracing::info!("PoW background tasks stopped");

    result?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received. Shutting down...");
}
