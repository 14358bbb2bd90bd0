//! Domain primitives, aggregates and use-cases.
//!
//! Purpose: define the gacha rules (catalogue, draw engine, player state)
//! and the services implementing the driving ports, free of transport
//! concerns. Adapters in `inbound` and `outbound` depend on this module,
//! never the other way round.
//!
//! Public surface:
//! - `Catalogue`, `Character`, `Rarity`: the drawable pool.
//! - `DrawEngine`, `DrawRules`: weighted draws with pity and ten-draw floor.
//! - `User`, `Username`, `Player`: per-player state and addressing.
//! - `GachaService`: implementation of `ports::GachaCommand` and
//!   `ports::GachaQuery`.
//! - `Error`, `ErrorCode`: the transport-agnostic failure payload.

pub mod catalogue;
pub mod character;
pub mod draw;
pub mod error;
pub mod gacha_result;
pub mod gacha_service;
pub mod ports;
pub mod trace_id;
pub mod user;

pub use self::catalogue::{Catalogue, CatalogueValidationError};
pub use self::character::{Character, CharacterId, Rarity};
pub use self::draw::{DEFAULT_PITY_THRESHOLD, DrawEngine, DrawRules, TEN_DRAW_SIZE};
pub use self::error::{
    Error, ErrorCode, ErrorValidationError, INSUFFICIENT_CURRENCY_MESSAGE, TRACE_ID_HEADER,
    USER_NOT_FOUND_MESSAGE,
};
pub use self::gacha_result::{CurrencyBalance, GachaResult, InventoryView, PoolInfo, UserInfo};
pub use self::gacha_service::{
    DEFAULT_SINGLE_DRAW_COST, DEFAULT_TEN_DRAW_COST, DrawCosts, GachaService,
};
pub use self::trace_id::TraceId;
pub use self::user::{
    CurrencyError, DEFAULT_USERNAME, Inventory, Player, User, UserId, UserValidationError,
    Username,
};
