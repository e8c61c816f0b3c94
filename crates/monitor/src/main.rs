//! `thermo-monitor` -- simulated temperature sensor monitor.
//!
//! Starts one polling cycle per configured sensor. Each cycle takes a
//! simulated reading, stores it, and stops reading once its record is
//! flagged alarmed (see `thermo-rearm` to clear the flag). Runs until
//! SIGINT/SIGTERM.
//!
//! # Environment variables
//!
//! | Variable                | Required | Default                       | Description                        |
//! |-------------------------|----------|-------------------------------|------------------------------------|
//! | `SENSOR_NAMES`          | no       | `Quintal,Quarto,Sala,Cozinha` | Comma-separated sensor names       |
//! | `DATABASE_URL`          | no       | --                            | Postgres URL; in-memory if unset   |
//! | `DB_MAX_CONNECTIONS`    | no       | `5`                           | Connection pool size               |
//! | `CYCLE_TICK_MILLIS`     | no       | `1000`                        | Length of one cycle time unit      |
//! | `SHUTDOWN_TIMEOUT_SECS` | no       | `5`                           | Grace period for cycles on exit    |

use std::sync::Arc;

use thermo_db::store::{MemoryStore, PgSensorStore, SensorStore};
use thermo_monitor::config::MonitorConfig;
use thermo_monitor::dispatcher;
use thermo_monitor::generator::RandomTemperature;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "thermo_monitor=info,thermo_db=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = MonitorConfig::from_env().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Invalid configuration");
        std::process::exit(1);
    });

    tracing::info!(
        sensors = ?config.sensor_names,
        tick = ?config.tick,
        "Starting sensor monitor",
    );

    match config.database_url.as_deref() {
        Some(database_url) => {
            let pool = thermo_db::create_pool(database_url, config.db_max_connections)
                .await
                .unwrap_or_else(|e| {
                    tracing::error!(error = %e, "Failed to connect to database");
                    std::process::exit(1);
                });
            tracing::info!("Database connection pool created");

            if let Err(e) = thermo_db::health_check(&pool).await {
                tracing::error!(error = %e, "Database health check failed");
                std::process::exit(1);
            }

            if let Err(e) = thermo_db::run_migrations(&pool).await {
                tracing::error!(error = %e, "Failed to run database migrations");
                std::process::exit(1);
            }
            tracing::info!("Database migrations applied");

            run(PgSensorStore::new(pool), &config).await;
        }
        None => {
            tracing::warn!("DATABASE_URL not set -- readings are kept in memory only");
            run(MemoryStore::new(), &config).await;
        }
    }
}

/// Dispatch the sensor cycles and block until a termination signal.
async fn run<S: SensorStore + 'static>(store: S, config: &MonitorConfig) {
    let fleet = dispatcher::dispatch(
        &config.sensor_names,
        Arc::new(store),
        Arc::new(RandomTemperature),
        config.timing(),
    );

    shutdown_signal().await;

    let total = fleet.len();
    let stopped = fleet.shutdown(config.shutdown_timeout).await;
    tracing::info!(stopped, total, "Sensor cycles stopped, shutdown complete");
}

/// Wait for SIGINT (Ctrl-C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
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
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
