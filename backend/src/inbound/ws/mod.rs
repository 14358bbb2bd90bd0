//! WebSocket inbound adapter.
//!
//! Responsibilities:
//! - validate upgrade requests (origin allow-list, `?username=` binding)
//! - spawn the per-connection session task
//! - keep WebSocket-specific concerns at the edge of the system

use actix_web::web::{self, Payload};
use actix_web::{
    HttpRequest, HttpResponse, get,
    http::header::{HeaderValue, ORIGIN},
};
use serde::Deserialize;
use tracing::{debug, error, warn};
use url::Url;

use crate::domain::{DEFAULT_USERNAME, Player, Username};

pub mod messages;
pub mod outbound_queue;
mod session;
pub mod state;

use self::state::{AllowedOrigins, WsState};

#[derive(Debug, Deserialize)]
struct ConnectQuery {
    username: Option<String>,
}

/// Handle the WebSocket upgrade for the `/ws` endpoint.
#[get("/ws")]
pub async fn ws_entry(
    state: web::Data<WsState>,
    req: HttpRequest,
    stream: Payload,
) -> actix_web::Result<HttpResponse> {
    check_origin(&state.allowed_origins, &req)?;
    let player = player_from_query(req.query_string())?;

    let (response, session, messages) = actix_ws::handle(&req, stream).map_err(|error| {
        error!(error = %error, "WebSocket upgrade failed");
        actix_web::error::ErrorBadRequest("WebSocket upgrade failed")
    })?;

    debug!(player = %player, "WebSocket session opened");
    actix_web::rt::spawn(session::handle_ws_session(
        state.get_ref().clone(),
        player,
        session,
        messages,
    ));
    Ok(response)
}

fn player_from_query(query: &str) -> actix_web::Result<Player> {
    let parsed = web::Query::<ConnectQuery>::from_query(query).map_err(|error| {
        warn!(error = %error, "Rejected WS upgrade with malformed query");
        actix_web::error::ErrorBadRequest("Invalid query string")
    })?;
    let raw = parsed
        .into_inner()
        .username
        .unwrap_or_else(|| DEFAULT_USERNAME.to_owned());
    let username = Username::new(&raw).map_err(|error| {
        warn!(error = %error, "Rejected WS upgrade with invalid username");
        actix_web::error::ErrorBadRequest("Invalid username")
    })?;
    Ok(Player::named(username))
}

fn check_origin(allowed: &AllowedOrigins, req: &HttpRequest) -> actix_web::Result<()> {
    let AllowedOrigins::List(origins) = allowed else {
        return Ok(());
    };

    let mut origin_iter = req.headers().get_all(ORIGIN);
    let origin_header = origin_iter.next().ok_or_else(|| {
        warn!("Missing Origin header on WebSocket upgrade");
        actix_web::error::ErrorForbidden("Origin not allowed")
    })?;
    if origin_iter.next().is_some() {
        warn!("Multiple Origin headers on WebSocket upgrade");
        return Err(actix_web::error::ErrorBadRequest("Invalid Origin header"));
    }

    validate_origin(origins, origin_header)
}

fn validate_origin(origins: &[String], origin_header: &HeaderValue) -> actix_web::Result<()> {
    let origin_value = match origin_header.to_str() {
        Ok(value) => value,
        Err(error) => {
            warn!(error = %error, "Failed to parse Origin header as string");
            return Err(actix_web::error::ErrorBadRequest("Invalid Origin header"));
        }
    };

    let origin = Url::parse(origin_value).map_err(|error| {
        warn!(error = %error, "Failed to parse Origin header as URL");
        actix_web::error::ErrorBadRequest("Invalid Origin header")
    })?;

    if is_allowed_origin(origins, &origin) {
        Ok(())
    } else {
        warn!(
            origin = origin_value,
            "Rejected WS upgrade due to disallowed Origin"
        );
        Err(actix_web::error::ErrorForbidden("Origin not allowed"))
    }
}

/// Compare the serialised `scheme://host[:port]` of `origin` against the
/// allow-list. Default ports are elided by `Url`, so `https://a:443` matches
/// `https://a`.
fn is_allowed_origin(origins: &[String], origin: &Url) -> bool {
    if origin.host_str().is_none() {
        return false;
    }
    let serialised = origin.origin().ascii_serialization();
    origins.iter().any(|allowed| {
        Url::parse(allowed)
            .is_ok_and(|entry| entry.origin().ascii_serialization() == serialised)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test::TestRequest;
    use rstest::rstest;

    fn allow_list() -> Vec<String> {
        vec![
            "http://localhost:3000".to_owned(),
            "https://play.example".to_owned(),
        ]
    }

    fn header(value: &str) -> HeaderValue {
        HeaderValue::from_str(value).expect("valid header value")
    }

    #[rstest]
    #[case("http://localhost:3000")]
    #[case("https://play.example")]
    #[case("https://play.example:443")]
    fn accepts_configured_origins(#[case] origin: &str) {
        assert!(validate_origin(&allow_list(), &header(origin)).is_ok());
    }

    #[rstest]
    #[case("http://localhost")]
    #[case("http://localhost:4000")]
    #[case("https://example.com")]
    #[case("http://play.example")]
    #[case("https://play.example.evil.com")]
    fn rejects_disallowed_origins(#[case] origin: &str) {
        let error = validate_origin(&allow_list(), &header(origin))
            .expect_err("origin should be rejected");
        assert_eq!(
            error.as_response_error().status_code(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn rejects_non_utf8_origin_header() {
        let header = HeaderValue::from_bytes(&[0x80]).expect("opaque header value");
        let error = validate_origin(&allow_list(), &header).expect_err("origin should be rejected");
        assert_eq!(
            error.as_response_error().status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn rejects_unparsable_origin_header() {
        let header = HeaderValue::from_static("not a url");
        let error = validate_origin(&allow_list(), &header).expect_err("origin should be rejected");
        assert_eq!(
            error.as_response_error().status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn wildcard_allows_missing_origin() {
        let req = TestRequest::get().uri("/ws").to_http_request();
        assert!(check_origin(&AllowedOrigins::Any, &req).is_ok());
    }

    #[test]
    fn allow_list_requires_origin_header() {
        let req = TestRequest::get().uri("/ws").to_http_request();
        let error = check_origin(&AllowedOrigins::List(allow_list()), &req)
            .expect_err("missing origin should be rejected");
        assert_eq!(
            error.as_response_error().status_code(),
            StatusCode::FORBIDDEN
        );
    }

    #[rstest]
    #[case("", Player::Default)]
    #[case("username=default", Player::Default)]
    #[case(
        "username=alice",
        Player::Named(Username::new("alice").expect("valid username"))
    )]
    fn binds_player_from_query(#[case] query: &str, #[case] expected: Player) {
        assert_eq!(player_from_query(query).expect("valid query"), expected);
    }

    #[rstest]
    #[case("username=")]
    #[case("username=bad%20name")]
    fn rejects_invalid_usernames(#[case] query: &str) {
        let error = player_from_query(query).expect_err("username should be rejected");
        assert_eq!(
            error.as_response_error().status_code(),
            StatusCode::BAD_REQUEST
        );
    }
}
