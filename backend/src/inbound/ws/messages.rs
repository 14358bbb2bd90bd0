//! Wire-level message definitions for the WebSocket adapter.
//!
//! Clients send `{"type": ..., "data": {...}}` envelopes. The server answers
//! with the same envelope shape, or with `{"type":"error","error":...,
//! "code":...}` when a request cannot be served.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{
    CurrencyBalance, Error, ErrorCode, GachaResult, InventoryView, PoolInfo, UserInfo,
};

/// Frame is not a JSON envelope.
pub const INVALID_MESSAGE_FORMAT: &str = "Invalid message format";
/// Envelope `type` is not recognised.
pub const UNKNOWN_MESSAGE_TYPE: &str = "Unknown message type";
/// `add_currency` body lacks an integer `amount`.
pub const INVALID_CURRENCY_REQUEST: &str = "Invalid currency request";
/// `register` body lacks a `username`.
pub const INVALID_REGISTER_REQUEST: &str = "Invalid register request";

/// Raw inbound envelope before the `type` is interpreted.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: Value,
}

#[derive(Debug, Deserialize)]
struct AddCurrencyData {
    amount: i64,
}

#[derive(Debug, Deserialize)]
struct RegisterData {
    username: String,
}

/// A request the session knows how to serve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientRequest {
    /// `single_pull`.
    SinglePull,
    /// `ten_pull`.
    TenPull,
    /// `get_user_info`.
    GetUserInfo,
    /// `get_inventory`.
    GetInventory,
    /// `get_pool`.
    GetPool,
    /// `add_currency`.
    AddCurrency {
        /// Requested credit; validated by the service.
        amount: i64,
    },
    /// `register`.
    Register {
        /// Raw username; validated by the service.
        username: String,
    },
    /// `ping`.
    Ping,
}

impl ClientRequest {
    /// Interpret one text frame.
    ///
    /// # Errors
    /// Returns an `invalid_request` [`Error`] carrying the client-facing
    /// message for malformed envelopes, unknown types and bad bodies.
    ///
    /// # Examples
    /// ```
    /// use gacha_backend::inbound::ws::messages::ClientRequest;
    ///
    /// let request = ClientRequest::parse(r#"{"type":"add_currency","data":{"amount":5}}"#)
    ///     .expect("valid request");
    /// assert_eq!(request, ClientRequest::AddCurrency { amount: 5 });
    /// ```
    pub fn parse(text: &str) -> Result<Self, Error> {
        let envelope: Envelope =
            serde_json::from_str(text).map_err(|_| Error::invalid_request(INVALID_MESSAGE_FORMAT))?;

        let request = match envelope.kind.as_str() {
            "single_pull" => Self::SinglePull,
            "ten_pull" => Self::TenPull,
            "get_user_info" => Self::GetUserInfo,
            "get_inventory" => Self::GetInventory,
            "get_pool" => Self::GetPool,
            "ping" => Self::Ping,
            "add_currency" => {
                let data: AddCurrencyData = serde_json::from_value(envelope.data)
                    .map_err(|_| Error::invalid_request(INVALID_CURRENCY_REQUEST))?;
                Self::AddCurrency {
                    amount: data.amount,
                }
            }
            "register" => {
                let data: RegisterData = serde_json::from_value(envelope.data)
                    .map_err(|_| Error::invalid_request(INVALID_REGISTER_REQUEST))?;
                Self::Register {
                    username: data.username,
                }
            }
            _ => return Err(Error::invalid_request(UNKNOWN_MESSAGE_TYPE)),
        };
        Ok(request)
    }

    /// Whether a successful response should be followed by a fresh
    /// `user_info` push.
    #[must_use]
    pub const fn changes_balance(&self) -> bool {
        matches!(
            self,
            Self::SinglePull | Self::TenPull | Self::AddCurrency { .. }
        )
    }
}

/// Successful outbound events.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    /// Outcome of a single or ten pull.
    GachaResult(GachaResult),
    /// Balance and pity snapshot.
    UserInfo(UserInfo),
    /// Owned characters.
    Inventory(InventoryView),
    /// Catalogue and rates.
    PoolInfo(PoolInfo),
    /// Balance after `add_currency`.
    CurrencyUpdate(CurrencyBalance),
    /// Reply to `ping`.
    Pong,
}

/// Outbound rejection of a single request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEvent {
    #[serde(rename = "type")]
    kind: &'static str,
    error: String,
    code: ErrorCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    trace_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl From<&Error> for ErrorEvent {
    fn from(value: &Error) -> Self {
        let internal = value.code() == ErrorCode::InternalError;
        let (error, details) = if internal {
            ("Internal server error".to_owned(), None)
        } else {
            (value.message().to_owned(), value.details().cloned())
        };
        Self {
            kind: "error",
            error,
            code: value.code(),
            trace_id: value.trace_id().map(str::to_owned),
            details,
        }
    }
}

/// Anything the session writes to the socket.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Outbound {
    /// A successful response or push.
    Event(ServerEvent),
    /// A rejected request.
    Error(ErrorEvent),
}

impl From<ServerEvent> for Outbound {
    fn from(value: ServerEvent) -> Self {
        Self::Event(value)
    }
}

impl From<Error> for Outbound {
    fn from(value: Error) -> Self {
        Self::Error(ErrorEvent::from(&value))
    }
}
