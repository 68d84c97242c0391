use axum_helpers::{create_production_app, create_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use database::common::{RetryConfig, retry_with_backoff};
use database::postgres::{self, run_migrations};
use domain_users::notifier;
use migration::Migrator;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    let config = Config::from_env()?;

    init_tracing(&config.environment);

    info!(
        app = config.app.name,
        version = config.app.version,
        "Starting directory API"
    );

    // Connect PostgreSQL and NATS concurrently, both with backoff
    let postgres_future = async {
        postgres::connect_from_config_with_retry(config.database.clone(), None)
            .await
            .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))
    };

    let nats_future = async {
        retry_with_backoff(
            || notifier::connect(&config.nats),
            RetryConfig::new().named("nats"),
        )
        .await
        .map_err(|e| eyre::eyre!("NATS connection failed: {}", e))
    };

    let (db, nats) = tokio::try_join!(postgres_future, nats_future)?;
    info!(url = %config.nats.url, "NATS connected");

    run_migrations::<Migrator>(&db, config.app.name)
        .await
        .map_err(|e| eyre::eyre!("Migrations failed: {}", e))?;

    let state = AppState {
        app: config.app,
        db,
        nats,
    };

    let api_routes = api::routes(&state, config.nats.publish_timeout);
    let router = create_router::<openapi::ApiDoc>(api_routes);

    let AppState { db, nats, .. } = state;

    create_production_app(router, &config.server, async move {
        info!("Shutting down: closing connections");

        tokio::join!(
            async {
                match db.close().await {
                    Ok(_) => info!("PostgreSQL connection closed successfully"),
                    Err(e) => tracing::error!("Error closing PostgreSQL: {}", e),
                }
            },
            async {
                match nats.drain().await {
                    Ok(_) => info!("NATS client drained successfully"),
                    Err(e) => tracing::error!("Error draining NATS: {}", e),
                }
            }
        );
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Directory API shutdown complete");
    Ok(())
}
