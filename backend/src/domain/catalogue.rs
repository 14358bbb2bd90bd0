//! The process-wide character catalogue.
//!
//! The catalogue is validated once at construction and is read-only
//! afterwards, so the draw engine can share it freely across request
//! handlers behind an `Arc`.

use std::collections::{BTreeMap, HashSet};

use thiserror::Error;

use crate::domain::character::{Character, CharacterId, Rarity};

const SPLASH_BASE_URL: &str = "https://ddragon.leagueoflegends.com/cdn/img/champion/splash";

/// Reasons a catalogue definition is rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogueValidationError {
    /// No characters were supplied.
    #[error("catalogue must contain at least one character")]
    Empty,
    /// Two entries share an identifier.
    #[error("character id {id} appears more than once")]
    DuplicateId {
        /// The repeated identifier.
        id: CharacterId,
    },
    /// A weight is negative, NaN or infinite.
    #[error("character {id} has an invalid weight {weight}; weights must be finite and nonnegative")]
    InvalidWeight {
        /// The offending entry.
        id: CharacterId,
        /// The rejected weight.
        weight: f64,
    },
}

/// Validated, ordered set of drawable characters.
///
/// Order is significant: the weighted roll walks entries in this order.
///
/// # Examples
/// ```
/// use gacha_backend::domain::{Catalogue, Rarity};
///
/// let catalogue = Catalogue::standard();
/// assert_eq!(catalogue.characters().len(), 11);
/// assert_eq!(catalogue.of_rarity(Rarity::SuperRare).len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Catalogue {
    characters: Vec<Character>,
    fallback: Character,
}

impl Catalogue {
    /// Validate and build a catalogue.
    ///
    /// # Errors
    /// Returns [`CatalogueValidationError`] when the list is empty, an id is
    /// duplicated, or a weight is negative or not finite.
    pub fn new(characters: Vec<Character>) -> Result<Self, CatalogueValidationError> {
        let mut seen = HashSet::with_capacity(characters.len());
        for character in &characters {
            if !seen.insert(character.id()) {
                return Err(CatalogueValidationError::DuplicateId { id: character.id() });
            }
            let weight = character.weight();
            if !weight.is_finite() || weight < 0.0 {
                return Err(CatalogueValidationError::InvalidWeight {
                    id: character.id(),
                    weight,
                });
            }
        }
        let fallback = characters
            .first()
            .cloned()
            .ok_or(CatalogueValidationError::Empty)?;
        Ok(Self {
            characters,
            fallback,
        })
    }

    /// The shipped pool: three super-rare, four rare and four common
    /// champions weighted for a 2% / 10% / 88% split.
    #[must_use]
    pub fn standard() -> Self {
        let entry = |id: u32, name: &str, rarity: Rarity, weight: f64| {
            Character::new(
                CharacterId::new(id),
                name,
                rarity,
                format!("{SPLASH_BASE_URL}/{name}_0.jpg"),
                weight,
            )
        };
        let sona = entry(1, "Sona", Rarity::SuperRare, 0.6);
        let fallback = sona.clone();
        let characters = vec![
            sona,
            entry(2, "Soraka", Rarity::SuperRare, 0.6),
            entry(3, "Syndra", Rarity::SuperRare, 0.8),
            entry(4, "Anivia", Rarity::Rare, 2.5),
            entry(5, "Annie", Rarity::Rare, 2.5),
            entry(6, "Ashe", Rarity::Rare, 2.5),
            entry(7, "Azir", Rarity::Rare, 2.5),
            entry(8, "Bard", Rarity::Common, 22.0),
            entry(9, "Braum", Rarity::Common, 22.0),
            entry(10, "Briar", Rarity::Common, 22.0),
            entry(11, "Blitzcrank", Rarity::Common, 22.0),
        ];
        Self {
            characters,
            fallback,
        }
    }

    /// Entries in walk order.
    #[must_use]
    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    /// Deterministic fallback entry (the first character).
    #[must_use]
    pub const fn fallback(&self) -> &Character {
        &self.fallback
    }

    /// Last entry in walk order; the weighted roll's rounding fallback.
    #[must_use]
    pub fn last(&self) -> &Character {
        self.characters.last().unwrap_or(&self.fallback)
    }

    /// Look up a character by id.
    #[must_use]
    pub fn get(&self, id: CharacterId) -> Option<&Character> {
        self.characters.iter().find(|character| character.id() == id)
    }

    /// Entries of one tier, in catalogue order.
    #[must_use]
    pub fn of_rarity(&self, rarity: Rarity) -> Vec<&Character> {
        self.characters
            .iter()
            .filter(|character| character.rarity() == rarity)
            .collect()
    }

    /// Sum of all pull weights.
    #[must_use]
    pub fn total_weight(&self) -> f64 {
        self.characters.iter().map(Character::weight).sum()
    }

    /// Human-readable per-tier drop share, keyed by tier label.
    ///
    /// Shares are derived from the same weights the engine rolls against.
    #[expect(clippy::float_arithmetic, reason = "tier share is a ratio of weights")]
    #[must_use]
    pub fn rate_summary(&self) -> BTreeMap<String, String> {
        let total = self.total_weight();
        Rarity::DESCENDING
            .iter()
            .map(|&rarity| {
                let tier_weight: f64 = self
                    .characters
                    .iter()
                    .filter(|character| character.rarity() == rarity)
                    .map(Character::weight)
                    .sum();
                let share = if total > 0.0 {
                    tier_weight / total * 100.0
                } else {
                    0.0
                };
                (rarity.label().to_owned(), format_percent(share))
            })
            .collect()
    }
}

impl Default for Catalogue {
    fn default() -> Self {
        Self::standard()
    }
}

fn format_percent(share: f64) -> String {
    let rendered = format!("{share:.1}");
    let trimmed = rendered.strip_suffix(".0").unwrap_or(&rendered);
    format!("{trimmed}%")
}
