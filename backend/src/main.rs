//! WanderLust API entry-point.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{AppConfig, create_server};
use wanderlust::inbound::http::health::HealthState;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = AppConfig::load()?;
    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config).await?;
    server.await?;

    health_state.mark_unhealthy();
    info!("server stopped");
    Ok(())
}
