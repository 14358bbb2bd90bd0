//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;

use state_builders::{build_gacha_service, build_http_state, build_ws_state};

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::info;

use gacha_backend::Trace;
#[cfg(debug_assertions)]
use gacha_backend::doc::ApiDoc;
use gacha_backend::inbound::http::gacha::{get_pool, single_pull, ten_pull};
use gacha_backend::inbound::http::health::{HealthState, live, ready};
use gacha_backend::inbound::http::json_config;
use gacha_backend::inbound::http::state::HttpState;
use gacha_backend::inbound::http::users::{add_currency, inventory, register, user_info};
use gacha_backend::inbound::ws;
use gacha_backend::inbound::ws::state::WsState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    ws_state: web::Data<WsState>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        ws_state,
    } = deps;

    let api = web::scope("/api")
        .app_data(json_config())
        .service(single_pull)
        .service(ten_pull)
        .service(get_pool)
        .service(user_info)
        .service(inventory)
        .service(add_currency)
        .service(register);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(ws_state)
        .wrap(Trace)
        .service(api)
        .service(ws::ws_entry)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// The gacha service is attached to `health_state` once the socket is bound,
/// which turns the readiness probe green.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: &ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let service = build_gacha_service(config);
    let http_state = build_http_state(service.clone(), service.clone());
    let ws_state = build_ws_state(config, service.clone(), service.clone());

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            ws_state: ws_state.clone(),
        })
    })
    .bind(config.bind_addr())?
    .run();

    info!(bind_addr = %config.bind_addr(), "gacha server listening");
    health_state.attach(service);
    Ok(server)
}
