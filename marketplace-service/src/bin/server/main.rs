use std::sync::Arc;
use std::time::Duration;

use auth::TokenManager;
use marketplace_service::config::Config;
use marketplace_service::domain::listing::service::ListingService;
use marketplace_service::domain::user::service::AuthService;
use marketplace_service::inbound::http::router::create_router;
use marketplace_service::outbound::repositories::PostgresListingRepository;
use marketplace_service::outbound::repositories::PostgresUserRepository;
use sqlx::postgres::PgPoolOptions;
use tokio::sync::oneshot;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "marketplace_service=debug,auth=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "marketplace-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        max_connections = config.database.max_connections,
        token_ttl_minutes = config.jwt.ttl_minutes,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let token_manager = Arc::new(TokenManager::new(
        config.jwt.secret.as_bytes(),
        config.jwt.ttl()?,
    ));
    let user_repository = Arc::new(PostgresUserRepository::new(pg_pool.clone()));
    let listing_repository = Arc::new(PostgresListingRepository::new(pg_pool.clone()));

    let auth_service = Arc::new(AuthService::new(user_repository, token_manager));
    let listing_service = Arc::new(ListingService::new(listing_repository));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(auth_service, listing_service);

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let mut http_server = tokio::spawn(async move {
        axum::serve(http_listener, http_application)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
    });

    tokio::select! {
        result = &mut http_server => {
            result??;
            tracing::warn!("Http server exited before a shutdown signal");
        }
        _ = shutdown_signal() => {
            tracing::info!("Starting graceful shutdown");
            let _ = shutdown_tx.send(());

            let timeout = Duration::from_secs(config.server.shutdown_timeout_secs);
            match tokio::time::timeout(timeout, &mut http_server).await {
                Ok(result) => result??,
                Err(_) => {
                    tracing::warn!(
                        timeout_secs = config.server.shutdown_timeout_secs,
                        "In-flight requests did not finish in time, aborting"
                    );
                    http_server.abort();
                }
            }
        }
    }

    pg_pool.close().await;
    tracing::info!("Database pool closed");
    tracing::info!("Graceful shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C signal"),
        _ = terminate => tracing::info!("Received SIGTERM signal"),
    }
}
