//! Read models returned by the gacha use-cases.
//!
//! These are snapshots taken while the player's lock is held, so every field
//! reflects one consistent state of the player.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::catalogue::Catalogue;
use crate::domain::character::Character;
use crate::domain::user::User;

/// Outcome of a single or ten draw.
///
/// ## Invariants
/// - `is_new` has exactly one flag per entry of `characters`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GachaResult {
    /// Drawn characters in draw order.
    pub characters: Vec<Character>,
    /// Whether each drawn character was newly added to the inventory.
    pub is_new: Vec<bool>,
    /// Unix timestamp, in seconds, of the draw.
    #[schema(example = 1_700_000_000)]
    pub timestamp: i64,
}

impl GachaResult {
    /// Pair draws with their ownership flags.
    #[must_use]
    pub fn new(drawn: Vec<(Character, bool)>, timestamp: i64) -> Self {
        let (characters, is_new) = drawn.into_iter().unzip();
        Self {
            characters,
            is_new,
            timestamp,
        }
    }
}

/// Catalogue listing with per-tier rates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PoolInfo {
    /// Every drawable character in walk order.
    pub characters: Vec<Character>,
    /// Tier label (`ssr`, `sr`, `r`) to percentage string.
    pub rates: BTreeMap<String, String>,
    /// Description of the pity guarantee.
    #[schema(example = "Guaranteed SSR at 90 pulls")]
    pub pity_system: String,
}

impl PoolInfo {
    /// Describe `catalogue` under a guarantee at `pity_threshold` draws.
    #[must_use]
    pub fn from_catalogue(catalogue: &Catalogue, pity_threshold: u32) -> Self {
        Self {
            characters: catalogue.characters().to_vec(),
            rates: catalogue.rate_summary(),
            pity_system: format!("Guaranteed SSR at {pity_threshold} pulls"),
        }
    }
}

/// Player balance and pity progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    /// Player key.
    #[schema(example = "default")]
    pub username: String,
    /// Current balance.
    #[schema(example = 10_000)]
    pub currency: u64,
    /// Draws since the last super-rare.
    #[schema(example = 0)]
    pub pity_count: u32,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            username: user.username().to_string(),
            currency: user.currency(),
            pity_count: user.pity_count(),
        }
    }
}

/// Owned characters in acquisition order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InventoryView {
    /// Owned characters.
    pub inventory: Vec<Character>,
    /// Number of owned characters.
    pub count: usize,
}

impl From<&User> for InventoryView {
    fn from(user: &User) -> Self {
        let inventory = user.inventory().characters().to_vec();
        Self {
            count: inventory.len(),
            inventory,
        }
    }
}

/// Balance after a currency change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyBalance {
    /// Balance after the change.
    #[schema(example = 11_000)]
    pub currency: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::character::{CharacterId, Rarity};
    use crate::domain::user::{UserId, Username};
    use serde_json::json;

    #[test]
    fn gacha_result_keeps_flags_parallel() {
        let catalogue = Catalogue::standard();
        let first = catalogue.characters()[0].clone();
        let second = catalogue.characters()[7].clone();

        let result = GachaResult::new(vec![(first, true), (second, false)], 42);

        assert_eq!(result.characters.len(), result.is_new.len());
        assert_eq!(result.is_new, vec![true, false]);
        let value = serde_json::to_value(&result).expect("result serialises");
        assert_eq!(value["isNew"], json!([true, false]));
        assert_eq!(value["timestamp"], 42);
    }

    #[test]
    fn pool_info_describes_the_guarantee() {
        let pool = PoolInfo::from_catalogue(&Catalogue::standard(), 90);
        assert_eq!(pool.pity_system, "Guaranteed SSR at 90 pulls");
        assert_eq!(pool.characters.len(), 11);
        let value = serde_json::to_value(&pool).expect("pool serialises");
        assert_eq!(value["pitySystem"], "Guaranteed SSR at 90 pulls");
        assert_eq!(value["rates"], json!({"r": "88%", "sr": "10%", "ssr": "2%"}));
    }

    #[test]
    fn user_views_snapshot_player_state() {
        let mut user = User::new(UserId::new(1), Username::default_user(), 500);
        user.increment_pity();
        user.add_character(&Character::new(
            CharacterId::new(5),
            "Annie",
            Rarity::Rare,
            "annie.jpg",
            2.5,
        ));

        let info = UserInfo::from(&user);
        let inventory = InventoryView::from(&user);

        assert_eq!(
            serde_json::to_value(&info).expect("info serialises"),
            json!({"username": "default", "currency": 500, "pityCount": 1})
        );
        assert_eq!(inventory.count, 1);
        assert_eq!(inventory.inventory[0].name(), "Annie");
    }
}
