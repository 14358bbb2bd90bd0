//! Service configuration loaded via OrthoConfig.
//!
//! Values come from CLI flags, `GACHA_*` environment variables or a config
//! file. Every field is optional; accessors fall back to the documented
//! defaults.

use std::net::SocketAddr;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::{DEFAULT_PITY_THRESHOLD, DEFAULT_SINGLE_DRAW_COST, DEFAULT_TEN_DRAW_COST};
use crate::inbound::ws::outbound_queue::DEFAULT_QUEUE_CAPACITY;
use crate::outbound::memory::{DEFAULT_USER_STARTING_CURRENCY, NEW_USER_STARTING_CURRENCY};

/// Listen address used when none is configured.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const ANY_ORIGIN: &str = "*";

/// Invalid configuration values.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The bind address is not a socket address.
    #[error("invalid bind address {value:?}: {source}")]
    InvalidBindAddr {
        /// Configured value.
        value: String,
        /// Parse failure.
        #[source]
        source: std::net::AddrParseError,
    },
    /// Pity must trigger after at least one draw.
    #[error("pity threshold must be at least 1")]
    ZeroPityThreshold,
}

/// Runtime settings for the gacha service.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "GACHA")]
pub struct GachaSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// Comma separated WebSocket origins; `*` allows any.
    pub allowed_origins: Option<String>,
    /// Price of one draw.
    pub single_draw_cost: Option<u64>,
    /// Price of a ten-draw batch.
    pub ten_draw_cost: Option<u64>,
    /// Draws without a super-rare before one is forced.
    pub pity_threshold: Option<u32>,
    /// Opening balance of the default player.
    pub default_starting_currency: Option<u64>,
    /// Opening balance of registered players.
    pub new_user_starting_currency: Option<u64>,
    /// Messages buffered per WebSocket session before drops.
    pub outbound_queue_capacity: Option<usize>,
    /// Fixed generator seed for reproducible runs.
    pub rng_seed: Option<u64>,
}

impl GachaSettings {
    /// Parsed listen address.
    ///
    /// # Errors
    /// Returns [`SettingsError::InvalidBindAddr`] when the value is not a
    /// socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value
            .parse()
            .map_err(|source| SettingsError::InvalidBindAddr {
                value: value.to_owned(),
                source,
            })
    }

    /// Allow-list entries, split on commas.
    #[must_use]
    pub fn allowed_origins(&self) -> Vec<String> {
        self.allowed_origins
            .as_deref()
            .unwrap_or(ANY_ORIGIN)
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(str::to_owned)
            .collect()
    }

    /// Configured single-draw price.
    #[must_use]
    pub fn single_draw_cost(&self) -> u64 {
        self.single_draw_cost.unwrap_or(DEFAULT_SINGLE_DRAW_COST)
    }

    /// Configured ten-draw price.
    #[must_use]
    pub fn ten_draw_cost(&self) -> u64 {
        self.ten_draw_cost.unwrap_or(DEFAULT_TEN_DRAW_COST)
    }

    /// Draws without a super-rare before one is forced.
    ///
    /// # Errors
    /// Returns [`SettingsError::ZeroPityThreshold`] for a configured zero.
    pub fn pity_threshold(&self) -> Result<u32, SettingsError> {
        match self.pity_threshold.unwrap_or(DEFAULT_PITY_THRESHOLD) {
            0 => Err(SettingsError::ZeroPityThreshold),
            threshold => Ok(threshold),
        }
    }

    /// Opening balance of the default player.
    #[must_use]
    pub fn default_starting_currency(&self) -> u64 {
        self.default_starting_currency
            .unwrap_or(DEFAULT_USER_STARTING_CURRENCY)
    }

    /// Opening balance of registered players.
    #[must_use]
    pub fn new_user_starting_currency(&self) -> u64 {
        self.new_user_starting_currency
            .unwrap_or(NEW_USER_STARTING_CURRENCY)
    }

    /// Per-session queue capacity, at least one.
    #[must_use]
    pub fn outbound_queue_capacity(&self) -> usize {
        self.outbound_queue_capacity
            .unwrap_or(DEFAULT_QUEUE_CAPACITY)
            .max(1)
    }
}
