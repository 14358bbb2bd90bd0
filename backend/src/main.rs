//! Backend entry-point: wires REST endpoints, WebSocket entry, and OpenAPI docs.

mod server;

use std::io;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use gacha_backend::inbound::http::health::HealthState;
use gacha_backend::settings::GachaSettings;
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(error) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %error, "tracing init failed");
    }

    let settings = GachaSettings::load_from_iter(std::env::args_os())
        .map_err(|error| io::Error::other(format!("failed to load settings: {error}")))?;
    let config = ServerConfig::from_settings(&settings).map_err(io::Error::other)?;

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), &config)?;
    let result = server.await;
    health_state.begin_draining();
    result
}
