//! `thermo-rearm` -- clear the alarm flag on one or more sensors.
//!
//! Usage: `thermo-rearm <sensor> [<sensor> ...]`
//!
//! Requires `DATABASE_URL`. Exits with status 1 if any sensor could not be
//! re-armed.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use thermo_db::store::PgSensorStore;
use thermo_monitor::rearm;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "thermo_monitor=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let names: Vec<String> = std::env::args().skip(1).collect();
    if names.is_empty() {
        eprintln!("usage: thermo-rearm <sensor> [<sensor> ...]");
        std::process::exit(2);
    }

    let database_url = std::env::var("DATABASE_URL").unwrap_or_else(|_| {
        tracing::error!("DATABASE_URL environment variable is required");
        std::process::exit(1);
    });

    let pool = thermo_db::create_pool(&database_url, 1)
        .await
        .unwrap_or_else(|e| {
            tracing::error!(error = %e, "Failed to connect to database");
            std::process::exit(1);
        });
    let store = PgSensorStore::new(pool);

    let mut failures = 0;
    for name in &names {
        let result = rearm::rearm(&store, name).await;
        println!("{}", result.message);
        if !result.success {
            failures += 1;
        }
    }

    if failures > 0 {
        std::process::exit(1);
    }
}
