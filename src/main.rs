use anyhow::Context;
use dotenv::dotenv;
use std::sync::Arc;
use tracing::{info, warn};

use driver_onboarding::address::{AddressLookup, ViaCepClient};
use driver_onboarding::db::{self, InMemoryProfileStore, PgProfileStore, ProfileStore};
use driver_onboarding::telemetry::{init_telemetry, TelemetryConfig};
use driver_onboarding::{config, create_router, i18n, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let env = config::init().context("Failed to load configuration")?;
    let telemetry = init_telemetry(TelemetryConfig::from_config(env)).await?;

    let store: Arc<dyn ProfileStore> = match &env.database {
        Some(database) => {
            let pool = db::init_pool(database).await?;
            info!("Connected to Postgres");
            Arc::new(PgProfileStore::new(pool))
        }
        None => {
            warn!("DATABASE_URL is not set, profiles are kept in memory only");
            Arc::new(InMemoryProfileStore::new())
        }
    };

    let localizer = i18n::init_i18n(&env.app.locales_dir).context("Failed to load locales")?;

    let address_lookup: Option<Arc<dyn AddressLookup>> = if env.address_lookup.enabled {
        let client = ViaCepClient::new(
            env.address_lookup.base_url.clone(),
            env.address_lookup.timeout(),
        )
        .context("Failed to build address lookup client")?;
        Some(Arc::new(client))
    } else {
        info!("Address lookup disabled");
        None
    };

    let state = AppState::new(env.clone(), store, Arc::new(localizer), address_lookup);
    let app = create_router(state);

    let addr = env.server_addr();
    info!("{} listening on {}", env.app.name, addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Failed to serve application")?;

    telemetry.shutdown().await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutting down");
}
