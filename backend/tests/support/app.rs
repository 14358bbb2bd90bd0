//! Shared setup for integration tests.
//!
//! Integration tests compile as separate crates, so the service and adapter
//! wiring lives here once instead of drifting between files.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;

use gacha_backend::domain::{Catalogue, DrawCosts, DrawEngine, DrawRules, GachaService};
use gacha_backend::inbound::http::state::HttpState;
use gacha_backend::inbound::ws::state::WsState;
use gacha_backend::outbound::memory::{InMemoryUserStore, StartingBalances};

pub type Service = GachaService<InMemoryUserStore>;

/// Seeded service over a fresh store.
pub fn service_with(balances: StartingBalances, seed: u64) -> Arc<Service> {
    Arc::new(
        GachaService::new(
            Arc::new(InMemoryUserStore::new(balances)),
            DrawEngine::new(Arc::new(Catalogue::standard()), DrawRules::default()),
            DrawCosts::default(),
            Arc::new(DefaultClock),
        )
        .with_seed(seed),
    )
}

pub fn http_state(service: &Arc<Service>) -> web::Data<HttpState> {
    web::Data::new(HttpState::new(service.clone(), service.clone()))
}

pub fn ws_state(service: &Arc<Service>) -> WsState {
    WsState::new(service.clone(), service.clone())
}
