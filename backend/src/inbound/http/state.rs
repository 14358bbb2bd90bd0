//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and only see the driving ports,
//! so tests can swap in mocks without touching any storage.

use std::sync::Arc;

use crate::domain::ports::{GachaCommand, GachaQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// State-changing use-cases.
    pub gacha: Arc<dyn GachaCommand>,
    /// Read-only use-cases.
    pub gacha_query: Arc<dyn GachaQuery>,
}

impl HttpState {
    /// Construct state from explicit port implementations.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use gacha_backend::domain::ports::{GachaCommand, GachaQuery};
    /// use gacha_backend::domain::{Catalogue, DrawCosts, DrawEngine, DrawRules, GachaService};
    /// use gacha_backend::inbound::http::state::HttpState;
    /// use gacha_backend::outbound::memory::InMemoryUserStore;
    /// use mockable::DefaultClock;
    ///
    /// let service = Arc::new(GachaService::new(
    ///     Arc::new(InMemoryUserStore::default()),
    ///     DrawEngine::new(Arc::new(Catalogue::standard()), DrawRules::default()),
    ///     DrawCosts::default(),
    ///     Arc::new(DefaultClock),
    /// ));
    /// let state = HttpState::new(service.clone(), service);
    /// assert_eq!(state.gacha_query.pool_info().characters.len(), 11);
    /// ```
    #[must_use]
    pub fn new(gacha: Arc<dyn GachaCommand>, gacha_query: Arc<dyn GachaQuery>) -> Self {
        Self { gacha, gacha_query }
    }
}
