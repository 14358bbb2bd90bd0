//! Domain ports for the hexagonal boundary.

mod gacha_command;
mod gacha_query;
mod user_store;

#[cfg(test)]
pub use gacha_command::MockGachaCommand;
pub use gacha_command::GachaCommand;
#[cfg(test)]
pub use gacha_query::MockGachaQuery;
pub use gacha_query::GachaQuery;
#[cfg(test)]
pub use user_store::MockUserStore;
pub use user_store::{UserHandle, UserStore};
