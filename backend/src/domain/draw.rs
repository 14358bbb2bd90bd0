//! Weighted draw engine with pity and ten-draw guarantees.
//!
//! The engine is pure computation over a shared [`Catalogue`] and a
//! caller-supplied `&mut User`; it never locks, blocks, or fails. Randomness
//! is injected as any [`rand::Rng`] so callers choose between an entropy
//! seeded generator in production and a seeded one in tests.
//!
//! Two guarantees apply independently:
//! - **pity**: the draw that brings the counter to the threshold returns a
//!   uniformly chosen super-rare character and resets the counter;
//! - **ten-draw floor**: the last draw of a batch is swapped for a uniformly
//!   chosen rare character when nothing earlier in the batch, nor the draw
//!   itself, was rare or above.

use std::sync::Arc;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::domain::catalogue::Catalogue;
use crate::domain::character::{Character, Rarity};
use crate::domain::user::User;

/// Draws without a super-rare result before the guarantee fires.
pub const DEFAULT_PITY_THRESHOLD: u32 = 90;

/// Number of characters in a multi-draw batch.
pub const TEN_DRAW_SIZE: usize = 10;

/// Tunable guarantee parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawRules {
    /// Pity counter value at which a super-rare is forced.
    pub pity_threshold: u32,
    /// Characters produced by [`DrawEngine::ten_draw`].
    pub batch_size: usize,
}

impl Default for DrawRules {
    fn default() -> Self {
        Self {
            pity_threshold: DEFAULT_PITY_THRESHOLD,
            batch_size: TEN_DRAW_SIZE,
        }
    }
}

/// Stateless draw engine over a shared catalogue.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use gacha_backend::domain::{Catalogue, DrawEngine, DrawRules, User, UserId, Username};
/// use rand::SeedableRng;
/// use rand::rngs::SmallRng;
///
/// let engine = DrawEngine::new(Arc::new(Catalogue::standard()), DrawRules::default());
/// let mut user = User::new(UserId::new(1), Username::default_user(), 0);
/// let mut rng = SmallRng::seed_from_u64(42);
/// let batch = engine.ten_draw(&mut user, &mut rng);
/// assert_eq!(batch.len(), 10);
/// assert!(batch.iter().any(|c| c.rarity().is_rare_or_above()));
/// ```
#[derive(Debug, Clone)]
pub struct DrawEngine {
    catalogue: Arc<Catalogue>,
    rules: DrawRules,
}

impl DrawEngine {
    /// Build an engine over `catalogue` with the given guarantee rules.
    #[must_use]
    pub const fn new(catalogue: Arc<Catalogue>, rules: DrawRules) -> Self {
        Self { catalogue, rules }
    }

    /// The catalogue every roll walks.
    #[must_use]
    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    /// Active guarantee rules.
    #[must_use]
    pub const fn rules(&self) -> DrawRules {
        self.rules
    }

    /// Draw one character, advancing and possibly resetting the pity counter.
    pub fn single_draw<R>(&self, user: &mut User, rng: &mut R) -> Character
    where
        R: Rng + ?Sized,
    {
        let pity = user.increment_pity();
        if pity >= self.rules.pity_threshold {
            user.reset_pity();
            return self.pick_uniform(Rarity::SuperRare, rng).clone();
        }

        let drawn = self.weighted_roll(rng);
        if drawn.rarity() == Rarity::SuperRare {
            user.reset_pity();
        }
        drawn.clone()
    }

    /// Draw a full batch in order, applying the rare-or-above floor to the
    /// final slot.
    ///
    /// The floor only swaps the returned character; the pity side effects of
    /// the final [`Self::single_draw`] have already happened and are kept.
    pub fn ten_draw<R>(&self, user: &mut User, rng: &mut R) -> Vec<Character>
    where
        R: Rng + ?Sized,
    {
        let size = self.rules.batch_size;
        let mut batch = Vec::with_capacity(size);
        let mut has_rare_or_above = false;

        for index in 0..size {
            let mut drawn = self.single_draw(user, rng);
            let is_last = index + 1 == size;
            if is_last && !has_rare_or_above && !drawn.rarity().is_rare_or_above() {
                drawn = self.pick_uniform(Rarity::Rare, rng).clone();
            }
            has_rare_or_above |= drawn.rarity().is_rare_or_above();
            batch.push(drawn);
        }

        batch
    }

    fn weighted_roll<R>(&self, rng: &mut R) -> &Character
    where
        R: Rng + ?Sized,
    {
        let total = self.catalogue.total_weight();
        if !total.is_finite() || total <= 0.0 {
            return self.catalogue.fallback();
        }
        self.select_by_roll(rng.gen_range(0.0..total))
    }

    /// Walk the catalogue accumulating weights and return the first entry
    /// whose running sum reaches `roll`. A roll past the accumulated total
    /// yields the last entry.
    #[expect(clippy::float_arithmetic, reason = "running sum of pull weights")]
    fn select_by_roll(&self, roll: f64) -> &Character {
        let mut cumulative = 0.0;
        for character in self.catalogue.characters() {
            cumulative += character.weight();
            if cumulative >= roll {
                return character;
            }
        }
        self.catalogue.last()
    }

    fn pick_uniform<R>(&self, rarity: Rarity, rng: &mut R) -> &Character
    where
        R: Rng + ?Sized,
    {
        self.catalogue
            .of_rarity(rarity)
            .choose(rng)
            .copied()
            .unwrap_or_else(|| self.catalogue.fallback())
    }
}

#[cfg(test)]
#[path = "draw_tests.rs"]
mod tests;
