//! Drawable characters and their rarity tiers.
//!
//! Characters are immutable catalogue entries. The pull weight is relative:
//! the draw engine sums the weights of the whole catalogue and normalises at
//! draw time, so weights need not add up to any particular total.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Rarity tier of a character, ordered from most to least common.
///
/// The derived ordering is significant: `Common < Rare < SuperRare`, which is
/// what the ten-draw floor relies on when it checks for "rare or above".
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    /// Three-star tier.
    Common,
    /// Four-star tier.
    Rare,
    /// Five-star tier; the pity guarantee always lands here.
    SuperRare,
}

impl Rarity {
    /// All tiers from highest to lowest.
    pub const DESCENDING: [Self; 3] = [Self::SuperRare, Self::Rare, Self::Common];

    /// Short label used in the pool rate summary.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::SuperRare => "ssr",
            Self::Rare => "sr",
            Self::Common => "r",
        }
    }

    /// Whether this tier satisfies the ten-draw floor.
    #[must_use]
    pub const fn is_rare_or_above(self) -> bool {
        matches!(self, Self::Rare | Self::SuperRare)
    }
}

/// Stable catalogue identifier of a character.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
#[schema(value_type = u32, example = 1)]
pub struct CharacterId(u32);

impl CharacterId {
    /// Wrap a raw identifier.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw identifier value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CharacterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Immutable catalogue entry.
///
/// ## Invariants
/// - `weight` is finite and nonnegative; [`crate::domain::Catalogue::new`]
///   enforces this for every entry it accepts.
///
/// # Examples
/// ```
/// use gacha_backend::domain::{Character, CharacterId, Rarity};
///
/// let sona = Character::new(CharacterId::new(1), "Sona", Rarity::SuperRare, "sona.jpg", 0.6);
/// assert!(sona.rarity().is_rare_or_above());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    id: CharacterId,
    #[schema(example = "Sona")]
    name: String,
    rarity: Rarity,
    #[schema(example = "https://ddragon.leagueoflegends.com/cdn/img/champion/splash/Sona_0.jpg")]
    image_url: String,
    #[schema(example = 0.6)]
    weight: f64,
}

impl Character {
    /// Build a catalogue entry.
    #[must_use]
    pub fn new(
        id: CharacterId,
        name: impl Into<String>,
        rarity: Rarity,
        image_url: impl Into<String>,
        weight: f64,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            rarity,
            image_url: image_url.into(),
            weight,
        }
    }

    /// Catalogue identifier.
    #[must_use]
    pub const fn id(&self) -> CharacterId {
        self.id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rarity tier.
    #[must_use]
    pub const fn rarity(&self) -> Rarity {
        self.rarity
    }

    /// Opaque display reference; never interpreted by the service.
    #[must_use]
    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    /// Relative pull weight.
    #[must_use]
    pub const fn weight(&self) -> f64 {
        self.weight
    }
}
