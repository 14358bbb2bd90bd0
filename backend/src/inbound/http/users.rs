//! Player HTTP handlers.
//!
//! ```text
//! GET  /api/user/info
//! GET  /api/user/inventory
//! POST /api/user/add-currency {"amount":500}
//! POST /api/user/register {"username":"alice"}
//! ```
//!
//! Everything except registration acts as the default player.

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::{CurrencyBalance, Error, InventoryView, Player, UserInfo};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Request body for `POST /api/user/add-currency`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddCurrencyRequest {
    /// Amount to credit; must be positive.
    pub amount: Option<i64>,
}

/// Request body for `POST /api/user/register`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Requested username; trimmed before validation.
    pub username: Option<String>,
}

fn missing_field(field: &str) -> Error {
    Error::invalid_request(format!("{field} is required"))
        .with_details(json!({ "field": field, "code": "missing" }))
}

/// Balance and pity progress of the default player.
#[utoipa::path(
    get,
    path = "/api/user/info",
    responses(
        (status = 200, description = "Player summary", body = UserInfo),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "getUserInfo"
)]
#[get("/user/info")]
pub async fn user_info(state: web::Data<HttpState>) -> ApiResult<web::Json<UserInfo>> {
    Ok(web::Json(state.gacha_query.user_info(&Player::Default)?))
}

/// Characters owned by the default player, oldest first.
#[utoipa::path(
    get,
    path = "/api/user/inventory",
    responses(
        (status = 200, description = "Owned characters", body = InventoryView),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "getInventory"
)]
#[get("/user/inventory")]
pub async fn inventory(state: web::Data<HttpState>) -> ApiResult<web::Json<InventoryView>> {
    Ok(web::Json(state.gacha_query.inventory(&Player::Default)?))
}

/// Credit the default player with a positive amount.
#[utoipa::path(
    post,
    path = "/api/user/add-currency",
    request_body = AddCurrencyRequest,
    responses(
        (status = 200, description = "New balance", body = CurrencyBalance),
        (status = 400, description = "Invalid amount", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "addCurrency"
)]
#[post("/user/add-currency")]
pub async fn add_currency(
    state: web::Data<HttpState>,
    payload: web::Json<AddCurrencyRequest>,
) -> ApiResult<web::Json<CurrencyBalance>> {
    let amount = payload
        .into_inner()
        .amount
        .ok_or_else(|| missing_field("amount"))?;
    let balance = state.gacha.add_currency(&Player::Default, amount)?;
    Ok(web::Json(balance))
}

/// Create a named player, or return the existing one unchanged.
#[utoipa::path(
    post,
    path = "/api/user/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Registered player", body = UserInfo),
        (status = 400, description = "Invalid username", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "register"
)]
#[post("/user/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<web::Json<UserInfo>> {
    let username = payload
        .into_inner()
        .username
        .ok_or_else(|| missing_field("username"))?;
    Ok(web::Json(state.gacha.register(&username)?))
}
