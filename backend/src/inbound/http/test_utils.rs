//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;

use crate::domain::ports::{GachaCommand, GachaQuery};
use crate::domain::{Catalogue, DrawCosts, DrawEngine, DrawRules, GachaService};
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::{InMemoryUserStore, StartingBalances};

/// Seed shared by handler tests so draws are reproducible.
pub const TEST_SEED: u64 = 0x00c0_ffee;

/// Real service over a fresh in-memory store with the given balances.
#[must_use]
pub fn seeded_service(balances: StartingBalances) -> Arc<GachaService<InMemoryUserStore>> {
    Arc::new(
        GachaService::new(
            Arc::new(InMemoryUserStore::new(balances)),
            DrawEngine::new(Arc::new(Catalogue::standard()), DrawRules::default()),
            DrawCosts::default(),
            Arc::new(DefaultClock),
        )
        .with_seed(TEST_SEED),
    )
}

/// HTTP state over [`seeded_service`].
#[must_use]
pub fn seeded_state(balances: StartingBalances) -> web::Data<HttpState> {
    let service = seeded_service(balances);
    web::Data::new(HttpState::new(service.clone(), service))
}

/// HTTP state over explicit port doubles.
#[must_use]
pub fn state_with(
    command: impl GachaCommand + 'static,
    query: impl GachaQuery + 'static,
) -> web::Data<HttpState> {
    web::Data::new(HttpState::new(Arc::new(command), Arc::new(query)))
}
