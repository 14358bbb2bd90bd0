//! HTTP inbound adapter exposing REST endpoints.

use actix_web::web;

pub mod error;
pub mod gacha;
pub mod health;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;

pub use error::ApiResult;

use self::error::json_error_handler;

/// JSON extractor config reporting malformed bodies as `invalid_request`.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(json_error_handler)
}
