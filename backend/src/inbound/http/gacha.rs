//! Gacha HTTP handlers. Every request acts as the default player.
//!
//! ```text
//! POST /api/gacha/pull
//! POST /api/gacha/pull-ten
//! GET  /api/gacha/pool
//! ```

use actix_web::{get, post, web};

use crate::domain::{Error, GachaResult, Player, PoolInfo};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Spend the single-draw cost and draw one character.
#[utoipa::path(
    post,
    path = "/api/gacha/pull",
    responses(
        (status = 200, description = "Drawn character", body = GachaResult),
        (status = 400, description = "Insufficient currency", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["gacha"],
    operation_id = "singlePull"
)]
#[post("/gacha/pull")]
pub async fn single_pull(state: web::Data<HttpState>) -> ApiResult<web::Json<GachaResult>> {
    let result = state.gacha.single_draw(&Player::Default)?;
    Ok(web::Json(result))
}

/// Spend the ten-draw cost and draw ten characters, at least one rare or
/// above.
#[utoipa::path(
    post,
    path = "/api/gacha/pull-ten",
    responses(
        (status = 200, description = "Ten drawn characters", body = GachaResult),
        (status = 400, description = "Insufficient currency", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["gacha"],
    operation_id = "tenPull"
)]
#[post("/gacha/pull-ten")]
pub async fn ten_pull(state: web::Data<HttpState>) -> ApiResult<web::Json<GachaResult>> {
    let result = state.gacha.ten_draw(&Player::Default)?;
    Ok(web::Json(result))
}

/// Drawable characters with per-tier rates.
#[utoipa::path(
    get,
    path = "/api/gacha/pool",
    responses((status = 200, description = "Pool listing", body = PoolInfo)),
    tags = ["gacha"],
    operation_id = "getPool"
)]
#[get("/gacha/pool")]
pub async fn get_pool(state: web::Data<HttpState>) -> web::Json<PoolInfo> {
    web::Json(state.gacha_query.pool_info())
}

#[cfg(test)]
#[path = "gacha_tests.rs"]
mod tests;
