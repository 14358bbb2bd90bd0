//! Driving port for state-changing gacha use-cases.
//!
//! Commands are synchronous in-memory computation under a player lock and
//! must not perform I/O.

use crate::domain::{CurrencyBalance, Error, GachaResult, Player, UserInfo};

/// Draws, currency grants and registration.
#[cfg_attr(test, mockall::automock)]
pub trait GachaCommand: Send + Sync {
    /// Spend the single-draw cost and draw one character.
    fn single_draw(&self, player: &Player) -> Result<GachaResult, Error>;

    /// Spend the ten-draw cost and draw a guaranteed batch.
    fn ten_draw(&self, player: &Player) -> Result<GachaResult, Error>;

    /// Credit a strictly positive `amount`.
    fn add_currency(&self, player: &Player, amount: i64) -> Result<CurrencyBalance, Error>;

    /// Create a player, or return the existing one unchanged.
    fn register(&self, username: &str) -> Result<UserInfo, Error>;
}
