//! Driving port for read-only gacha use-cases.

use crate::domain::{Error, InventoryView, Player, PoolInfo, UserInfo};

/// Catalogue and player snapshots.
#[cfg_attr(test, mockall::automock)]
pub trait GachaQuery: Send + Sync {
    /// The drawable pool with per-tier rates.
    fn pool_info(&self) -> PoolInfo;

    /// Balance and pity progress.
    fn user_info(&self, player: &Player) -> Result<UserInfo, Error>;

    /// Owned characters in acquisition order.
    fn inventory(&self, player: &Player) -> Result<InventoryView, Error>;
}
