//! Builders wiring the domain service into adapter state.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;
use tracing::info;

use gacha_backend::domain::ports::{GachaCommand, GachaQuery};
use gacha_backend::domain::{Catalogue, DrawEngine, GachaService};
use gacha_backend::inbound::http::state::HttpState;
use gacha_backend::inbound::ws::state::WsState;
use gacha_backend::outbound::memory::InMemoryUserStore;

use super::ServerConfig;

/// Shared service behind both the HTTP and WebSocket adapters.
pub(super) fn build_gacha_service(config: &ServerConfig) -> Arc<GachaService<InMemoryUserStore>> {
    let store = Arc::new(InMemoryUserStore::new(config.balances));
    let engine = DrawEngine::new(Arc::new(Catalogue::standard()), config.rules);
    let unseeded = GachaService::new(store, engine, config.costs, Arc::new(DefaultClock));
    let Some(seed) = config.rng_seed else {
        return Arc::new(unseeded);
    };
    info!(seed, "using fixed draw seed");
    Arc::new(unseeded.with_seed(seed))
}

pub(super) fn build_http_state(
    gacha: Arc<dyn GachaCommand>,
    gacha_query: Arc<dyn GachaQuery>,
) -> web::Data<HttpState> {
    web::Data::new(HttpState::new(gacha, gacha_query))
}

pub(super) fn build_ws_state(
    config: &ServerConfig,
    gacha: Arc<dyn GachaCommand>,
    gacha_query: Arc<dyn GachaQuery>,
) -> web::Data<WsState> {
    web::Data::new(
        WsState::new(gacha, gacha_query)
            .with_allowed_origins(config.allowed_origins.clone())
            .with_queue_capacity(config.queue_capacity),
    )
}
