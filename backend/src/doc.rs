//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every REST endpoint from the inbound HTTP layer
//! together with the payload schemas they reference. The document backs
//! Swagger UI in debug builds and is exported by the `openapi-dump` binary.

use utoipa::OpenApi;

use crate::domain::{
    Character, CharacterId, CurrencyBalance, Error, ErrorCode, GachaResult, InventoryView,
    PoolInfo, Rarity, UserInfo,
};
use crate::inbound::http::health::{HealthReport, ServiceStatus};
use crate::inbound::http::users::{AddCurrencyRequest, RegisterRequest};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Gacha backend API",
        description = "Weighted character draws with pity guarantees, player balances and health probes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::gacha::single_pull,
        crate::inbound::http::gacha::ten_pull,
        crate::inbound::http::gacha::get_pool,
        crate::inbound::http::users::user_info,
        crate::inbound::http::users::inventory,
        crate::inbound::http::users::add_currency,
        crate::inbound::http::users::register,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Character,
        CharacterId,
        Rarity,
        GachaResult,
        PoolInfo,
        UserInfo,
        InventoryView,
        CurrencyBalance,
        AddCurrencyRequest,
        RegisterRequest,
        Error,
        ErrorCode,
        HealthReport,
        ServiceStatus
    )),
    tags(
        (name = "gacha", description = "Draws and the drawable pool"),
        (name = "users", description = "Player balance, inventory and registration"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
