//! Player state: identity, currency, inventory and pity counter.
//!
//! A `User` is a plain value with no interior locking. Callers reach it
//! through a [`crate::domain::ports::UserHandle`], whose exclusive lock must
//! be held across any compound operation (deduct, draw, insert) so two
//! requests for the same player cannot interleave.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::domain::character::{Character, CharacterId};

/// Username of the always-present fallback player.
pub const DEFAULT_USERNAME: &str = "default";

/// Minimum allowed characters in a username.
pub const USERNAME_MIN: usize = 1;
/// Maximum allowed characters in a username.
pub const USERNAME_MAX: usize = 32;

/// Validation errors returned by [`Username::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UserValidationError {
    /// Nothing left after trimming.
    #[error("username must not be empty")]
    EmptyUsername,
    /// Longer than [`USERNAME_MAX`] characters.
    #[error("username must be at most {max} characters")]
    UsernameTooLong {
        /// The enforced maximum.
        max: usize,
    },
    /// Contains a character outside `[A-Za-z0-9_.-]`.
    #[error("username may only contain letters, digits, '_', '-' and '.'")]
    UsernameInvalidCharacters,
}

impl UserValidationError {
    /// Stable machine-readable code for error details.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::EmptyUsername => "empty_username",
            Self::UsernameTooLong { .. } => "username_too_long",
            Self::UsernameInvalidCharacters => "invalid_chars",
        }
    }
}

/// Validated unique key of a player.
///
/// # Examples
/// ```
/// use gacha_backend::domain::Username;
///
/// let name = Username::new("  ada_l  ").expect("valid username");
/// assert_eq!(name.as_ref(), "ada_l");
/// assert!(Username::new("bad name").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    /// Trim and validate a username.
    ///
    /// # Errors
    /// Returns [`UserValidationError`] when the trimmed value is empty, too
    /// long, or contains characters outside `[A-Za-z0-9_.-]`.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = raw.as_ref().trim();
        let length = trimmed.chars().count();
        if length < USERNAME_MIN {
            return Err(UserValidationError::EmptyUsername);
        }
        if length > USERNAME_MAX {
            return Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX });
        }
        if !trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
        {
            return Err(UserValidationError::UsernameInvalidCharacters);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// The well-known fallback player.
    #[must_use]
    pub fn default_user() -> Self {
        Self(DEFAULT_USERNAME.to_owned())
    }

    /// Whether this names the well-known fallback player.
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.0 == DEFAULT_USERNAME
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Username {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Username {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

/// Which player an operation targets.
///
/// HTTP callers always act as [`Player::Default`], which resolves by
/// get-or-create and therefore cannot be missing. WebSocket sessions bind to
/// a [`Player::Named`] username that must already exist.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Player {
    /// The always-present default player.
    Default,
    /// An explicitly addressed player.
    Named(Username),
}

impl Player {
    /// Bind to `username`, collapsing the well-known default name.
    #[must_use]
    pub fn named(username: Username) -> Self {
        if username.is_default() {
            Self::Default
        } else {
            Self::Named(username)
        }
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Default => f.write_str(DEFAULT_USERNAME),
            Self::Named(username) => std::fmt::Display::fmt(username, f),
        }
    }
}

/// Sequential player identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = u64, example = 1)]
pub struct UserId(u64);

impl UserId {
    /// Wrap a raw identifier.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw identifier value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Currency mutations that were refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CurrencyError {
    /// The balance does not cover the cost.
    #[error("insufficient currency: balance {balance}, cost {cost}")]
    Insufficient {
        /// Balance at the time of the attempt.
        balance: u64,
        /// Requested debit.
        cost: u64,
    },
    /// The credit would exceed `u64::MAX`.
    #[error("adding {amount} to balance {balance} would overflow")]
    Overflow {
        /// Balance at the time of the attempt.
        balance: u64,
        /// Requested credit.
        amount: u64,
    },
}

/// Owned characters in acquisition order, without duplicates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inventory {
    characters: Vec<Character>,
}

impl Inventory {
    /// Insert `character` unless an entry with the same id is present.
    ///
    /// Returns `true` when the character was newly added.
    pub fn insert(&mut self, character: &Character) -> bool {
        if self.contains(character.id()) {
            return false;
        }
        self.characters.push(character.clone());
        true
    }

    /// Whether a character with `id` is owned.
    #[must_use]
    pub fn contains(&self, id: CharacterId) -> bool {
        self.characters.iter().any(|owned| owned.id() == id)
    }

    /// Number of distinct owned characters.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.characters.len()
    }

    /// Whether nothing is owned yet.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    /// Owned characters in acquisition order.
    #[must_use]
    pub fn characters(&self) -> &[Character] {
        &self.characters
    }
}

/// Mutable per-player state.
///
/// ## Invariants
/// - `currency` never goes negative; refused deductions leave it untouched.
/// - `pity_count` only moves through [`User::increment_pity`] and
///   [`User::reset_pity`].
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    id: UserId,
    username: Username,
    currency: u64,
    inventory: Inventory,
    pity_count: u32,
}

impl User {
    /// New player with an empty inventory and zero pity.
    #[must_use]
    pub fn new(id: UserId, username: Username, currency: u64) -> Self {
        Self {
            id,
            username,
            currency,
            inventory: Inventory::default(),
            pity_count: 0,
        }
    }

    /// Sequential identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Unique key.
    #[must_use]
    pub const fn username(&self) -> &Username {
        &self.username
    }

    /// Current balance.
    #[must_use]
    pub const fn currency(&self) -> u64 {
        self.currency
    }

    /// Owned characters.
    #[must_use]
    pub const fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Draws since the last super-rare.
    #[must_use]
    pub const fn pity_count(&self) -> u32 {
        self.pity_count
    }

    /// Debit `cost`, refusing without mutation when the balance is short.
    ///
    /// # Errors
    /// Returns [`CurrencyError::Insufficient`] when `cost` exceeds the balance.
    pub fn deduct_currency(&mut self, cost: u64) -> Result<(), CurrencyError> {
        self.currency = self
            .currency
            .checked_sub(cost)
            .ok_or(CurrencyError::Insufficient {
                balance: self.currency,
                cost,
            })?;
        Ok(())
    }

    /// Credit `amount` and return the new balance.
    ///
    /// # Errors
    /// Returns [`CurrencyError::Overflow`] when the balance would exceed
    /// `u64::MAX`; the balance is left untouched.
    pub fn add_currency(&mut self, amount: u64) -> Result<u64, CurrencyError> {
        self.currency = self
            .currency
            .checked_add(amount)
            .ok_or(CurrencyError::Overflow {
                balance: self.currency,
                amount,
            })?;
        Ok(self.currency)
    }

    /// Add a character to the inventory if absent; `true` when newly owned.
    pub fn add_character(&mut self, character: &Character) -> bool {
        self.inventory.insert(character)
    }

    /// Whether a character with `id` is owned.
    #[must_use]
    pub fn has_character(&self, id: CharacterId) -> bool {
        self.inventory.contains(id)
    }

    /// Advance the pity counter by one draw and return the new value.
    pub const fn increment_pity(&mut self) -> u32 {
        self.pity_count = self.pity_count.saturating_add(1);
        self.pity_count
    }

    /// Return the pity counter to zero.
    pub const fn reset_pity(&mut self) {
        self.pity_count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::character::Rarity;
    use rstest::{fixture, rstest};

    #[fixture]
    fn user() -> User {
        User::new(UserId::new(1), Username::default_user(), 100)
    }

    fn bard() -> Character {
        Character::new(CharacterId::new(8), "Bard", Rarity::Common, "bard.jpg", 22.0)
    }

    #[rstest]
    fn refused_deduction_leaves_balance_untouched(mut user: User) {
        let error = user.deduct_currency(160).expect_err("balance too low");
        assert_eq!(
            error,
            CurrencyError::Insufficient {
                balance: 100,
                cost: 160
            }
        );
        assert_eq!(user.currency(), 100);
    }

    #[rstest]
    fn deduction_of_exact_balance_reaches_zero(mut user: User) {
        user.deduct_currency(100).expect("exact balance");
        assert_eq!(user.currency(), 0);
    }

    #[rstest]
    fn add_currency_returns_new_balance(mut user: User) {
        assert_eq!(user.add_currency(60), Ok(160));
    }

    #[rstest]
    fn add_currency_refuses_overflow(mut user: User) {
        let error = user.add_currency(u64::MAX).expect_err("overflow");
        assert!(matches!(error, CurrencyError::Overflow { .. }));
        assert_eq!(user.currency(), 100);
    }

    #[rstest]
    fn add_character_is_idempotent(mut user: User) {
        assert!(user.add_character(&bard()));
        assert!(!user.add_character(&bard()));
        assert_eq!(user.inventory().len(), 1);
        assert!(user.has_character(CharacterId::new(8)));
    }

    #[rstest]
    fn pity_increments_and_resets(mut user: User) {
        assert_eq!(user.increment_pity(), 1);
        assert_eq!(user.increment_pity(), 2);
        user.reset_pity();
        assert_eq!(user.pity_count(), 0);
    }

    #[rstest]
    #[case("ada", Ok("ada"))]
    #[case("  spaced  ", Ok("spaced"))]
    #[case("a.b-c_d9", Ok("a.b-c_d9"))]
    #[case("   ", Err(UserValidationError::EmptyUsername))]
    #[case("bad name", Err(UserValidationError::UsernameInvalidCharacters))]
    #[case("emoji🙂", Err(UserValidationError::UsernameInvalidCharacters))]
    fn username_validation(#[case] raw: &str, #[case] expected: Result<&str, UserValidationError>) {
        let result = Username::new(raw).map(|name| name.to_string());
        assert_eq!(result, expected.map(str::to_owned));
    }

    #[test]
    fn username_rejects_overlong_values() {
        let raw = "a".repeat(USERNAME_MAX + 1);
        assert_eq!(
            Username::new(raw),
            Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX })
        );
    }

    #[rstest]
    #[case("default", Player::Default)]
    #[case("alice", Player::Named(Username::new("alice").expect("valid username")))]
    fn player_binding_collapses_default_name(#[case] raw: &str, #[case] expected: Player) {
        let username = Username::new(raw).expect("valid username");
        let player = Player::named(username);
        assert_eq!(player.to_string(), raw);
        assert_eq!(player, expected);
    }

    #[test]
    fn username_deserialisation_validates() {
        let ok: Username = serde_json::from_str("\"alice\"").expect("valid username");
        assert_eq!(ok.as_ref(), "alice");
        assert!(serde_json::from_str::<Username>("\"no way\"").is_err());
    }
}
