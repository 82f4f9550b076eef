//! Komodo Hub entry-point: loads settings, prepares storage and serves the
//! REST API.

mod server;

use actix_web::web;
use color_eyre::eyre::WrapErr;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use komodo_hub::inbound::http::health::HealthState;
use server::{AppSettings, create_server, prepare};

#[actix_web::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().wrap_err("failed to load settings")?;
    let config = prepare(&settings).await?;
    info!(bind_addr = %config.bind_addr(), "starting Komodo Hub");

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    let result = server.await;
    health_state.mark_draining();
    result.wrap_err("server terminated abnormally")
}
