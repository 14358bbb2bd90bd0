//! Gacha use-cases implementing the driving ports.
//!
//! Every compound operation resolves the player, then holds that player's
//! lock for the whole "check, deduct, draw, insert, snapshot" sequence. The
//! generator mutex is only ever taken while a player lock is held, never the
//! other way round.

use std::sync::Arc;

use mockable::Clock;
use parking_lot::Mutex;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde_json::json;
use tracing::{debug, info};

use crate::domain::ports::{GachaCommand, GachaQuery, UserHandle, UserStore};
use crate::domain::{
    Character, CurrencyBalance, DrawEngine, Error, GachaResult, InventoryView, Player, PoolInfo,
    User, UserInfo, Username,
};

/// Default cost of one draw.
pub const DEFAULT_SINGLE_DRAW_COST: u64 = 160;
/// Default cost of a ten draw.
pub const DEFAULT_TEN_DRAW_COST: u64 = 1600;

/// Currency debited per draw kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawCosts {
    /// Cost of one draw.
    pub single: u64,
    /// Cost of a ten draw.
    pub ten: u64,
}

impl Default for DrawCosts {
    fn default() -> Self {
        Self {
            single: DEFAULT_SINGLE_DRAW_COST,
            ten: DEFAULT_TEN_DRAW_COST,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum DrawKind {
    Single,
    Ten,
}

/// Domain service backing both [`GachaCommand`] and [`GachaQuery`].
pub struct GachaService<S> {
    store: Arc<S>,
    engine: DrawEngine,
    costs: DrawCosts,
    clock: Arc<dyn Clock>,
    rng: Mutex<SmallRng>,
}

impl<S> GachaService<S> {
    /// Create a service drawing from an entropy-seeded generator.
    #[must_use]
    pub fn new(store: Arc<S>, engine: DrawEngine, costs: DrawCosts, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            engine,
            costs,
            clock,
            rng: Mutex::new(SmallRng::from_entropy()),
        }
    }

    /// Replace the generator with one seeded from `seed` for reproducible
    /// draw sequences.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(SmallRng::seed_from_u64(seed));
        self
    }

    /// Currency debited per draw kind.
    #[must_use]
    pub const fn costs(&self) -> DrawCosts {
        self.costs
    }
}

impl<S> GachaService<S>
where
    S: UserStore,
{
    fn resolve(&self, player: &Player) -> Result<UserHandle, Error> {
        match player {
            Player::Default => Ok(self.store.get_or_create_default()),
            Player::Named(username) => self.store.get(username).ok_or_else(|| {
                debug!(username = %username, "draw request for unknown player");
                Error::user_not_found()
            }),
        }
    }

    fn draw(&self, player: &Player, kind: DrawKind) -> Result<GachaResult, Error> {
        let cost = match kind {
            DrawKind::Single => self.costs.single,
            DrawKind::Ten => self.costs.ten,
        };
        let handle = self.resolve(player)?;
        let mut user = handle.lock();

        if let Err(error) = user.deduct_currency(cost) {
            debug!(player = %player, %error, "draw refused");
            return Err(error.into());
        }

        let drawn = {
            let mut rng = self.rng.lock();
            match kind {
                DrawKind::Single => vec![self.engine.single_draw(&mut *user, &mut *rng)],
                DrawKind::Ten => self.engine.ten_draw(&mut *user, &mut *rng),
            }
        };
        let result = GachaResult::new(
            record_ownership(&mut *user, drawn),
            self.clock.utc().timestamp(),
        );

        info!(
            player = %player,
            cost,
            draws = result.characters.len(),
            currency = user.currency(),
            pity = user.pity_count(),
            "draw completed"
        );
        Ok(result)
    }

    fn snapshot<T>(&self, player: &Player, view: impl FnOnce(&User) -> T) -> Result<T, Error> {
        let handle = self.resolve(player)?;
        let user = handle.lock();
        Ok(view(&*user))
    }
}

fn record_ownership(user: &mut User, drawn: Vec<Character>) -> Vec<(Character, bool)> {
    drawn
        .into_iter()
        .map(|character| {
            let is_new = user.add_character(&character);
            (character, is_new)
        })
        .collect()
}

fn positive_amount(amount: i64) -> Result<u64, Error> {
    u64::try_from(amount)
        .ok()
        .filter(|value| *value > 0)
        .ok_or_else(|| {
            Error::invalid_request("amount must be a positive integer")
                .with_details(json!({ "field": "amount", "value": amount }))
        })
}

impl<S> GachaCommand for GachaService<S>
where
    S: UserStore,
{
    fn single_draw(&self, player: &Player) -> Result<GachaResult, Error> {
        self.draw(player, DrawKind::Single)
    }

    fn ten_draw(&self, player: &Player) -> Result<GachaResult, Error> {
        self.draw(player, DrawKind::Ten)
    }

    fn add_currency(&self, player: &Player, amount: i64) -> Result<CurrencyBalance, Error> {
        let credit = positive_amount(amount)?;
        let handle = self.resolve(player)?;
        let currency = handle.lock().add_currency(credit)?;
        info!(player = %player, amount = credit, currency, "currency added");
        Ok(CurrencyBalance { currency })
    }

    fn register(&self, username: &str) -> Result<UserInfo, Error> {
        let name = Username::new(username)?;
        let handle = self.store.create(name);
        let info = UserInfo::from(&*handle.lock());
        info!(username = %info.username, "player registered");
        Ok(info)
    }
}

impl<S> GachaQuery for GachaService<S>
where
    S: UserStore,
{
    fn pool_info(&self) -> PoolInfo {
        PoolInfo::from_catalogue(self.engine.catalogue(), self.engine.rules().pity_threshold)
    }

    fn user_info(&self, player: &Player) -> Result<UserInfo, Error> {
        self.snapshot(player, |user| UserInfo::from(user))
    }

    fn inventory(&self, player: &Player) -> Result<InventoryView, Error> {
        self.snapshot(player, |user| InventoryView::from(user))
    }
}

#[cfg(test)]
#[path = "gacha_service_tests.rs"]
mod tests;
