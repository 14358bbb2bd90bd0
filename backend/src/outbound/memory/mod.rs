//! In-memory adapters. State lives for the lifetime of the process.

mod user_store;

pub use user_store::{
    DEFAULT_USER_STARTING_CURRENCY, InMemoryUserStore, NEW_USER_STARTING_CURRENCY, StartingBalances,
};
