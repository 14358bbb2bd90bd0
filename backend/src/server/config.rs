//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use gacha_backend::domain::{DrawCosts, DrawRules, TEN_DRAW_SIZE};
use gacha_backend::inbound::ws::state::AllowedOrigins;
use gacha_backend::outbound::memory::StartingBalances;
use gacha_backend::settings::{GachaSettings, SettingsError};

/// Resolved configuration for creating the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) allowed_origins: AllowedOrigins,
    pub(crate) costs: DrawCosts,
    pub(crate) rules: DrawRules,
    pub(crate) balances: StartingBalances,
    pub(crate) queue_capacity: usize,
    pub(crate) rng_seed: Option<u64>,
}

impl ServerConfig {
    /// Resolve loaded settings into concrete values.
    ///
    /// # Errors
    /// Returns [`SettingsError`] when the bind address or pity threshold is
    /// invalid.
    pub fn from_settings(settings: &GachaSettings) -> Result<Self, SettingsError> {
        Ok(Self {
            bind_addr: settings.bind_addr()?,
            allowed_origins: AllowedOrigins::from_entries(settings.allowed_origins()),
            costs: DrawCosts {
                single: settings.single_draw_cost(),
                ten: settings.ten_draw_cost(),
            },
            rules: DrawRules {
                pity_threshold: settings.pity_threshold()?,
                batch_size: TEN_DRAW_SIZE,
            },
            balances: StartingBalances {
                default_user: settings.default_starting_currency(),
                new_user: settings.new_user_starting_currency(),
            },
            queue_capacity: settings.outbound_queue_capacity(),
            rng_seed: settings.rng_seed,
        })
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
