//! Account console server entry point.

mod server;

use actix_web::web;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use account_console::inbound::http::health::HealthState;
use account_console::services::ConsoleServices;
use account_console::settings::ConsoleSettings;
use server::{ServerConfig, create_server};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings =
        ConsoleSettings::load_without_args("account-console").map_err(std::io::Error::other)?;
    let services = ConsoleServices::from_settings(&settings).map_err(std::io::Error::other)?;
    let bind_addr = settings.bind_address().map_err(std::io::Error::other)?;

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(
        health_state.clone(),
        ServerConfig::new(bind_addr, services.http_state()),
    )?;
    info!(%bind_addr, "account console listening");

    let result = server.await;
    health_state.mark_draining();
    result
}
