//! Movie Accounts Backend
//!
//! Account service of the movie catalog site: registration, login, session
//! tokens and the per-user favorites and watchlist.
//!
//! Layers, outermost first: routes (status mapping), the account store
//! (validation, hashing, duplicates), repositories (`AccountRepository`
//! over Postgres).

use anyhow::Result;
use movie_accounts_backend::config::AppConfig;
use movie_accounts_backend::{db, routes, state::AppState, telemetry};
use tokio::signal;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    let production = AppConfig::is_production();
    telemetry::init(&config.logging, production)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        production,
        "Starting movie accounts service"
    );

    if production {
        let problems = config.production_problems();
        if !problems.is_empty() {
            for problem in &problems {
                error!(problem, "Refusing production configuration");
            }
            anyhow::bail!("invalid production configuration");
        }
        if config.database.url.contains("localhost") {
            warn!("Production database URL points at localhost");
        }
    }

    let pool = db::create_pool(&config.database).await?;
    // Production schema changes run as a separate deploy step.
    if !production {
        db::run_migrations(&pool).await?;
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let app = routes::create_router(AppState::new(pool, config));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(address = %addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shut down cleanly");
    Ok(())
}

/// Resolves on Ctrl+C or, on unix, SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!(error = %err, "Ctrl+C handler unavailable");
            std::future::pending::<()>().await
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "SIGTERM handler unavailable");
                std::future::pending::<()>().await
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!(signal = "SIGINT", "Draining connections"),
        _ = terminate => info!(signal = "SIGTERM", "Draining connections"),
    }
}
