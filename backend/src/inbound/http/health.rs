//! Readiness and liveness endpoints for the gacha service.
//!
//! Readiness stays red until the shared service has been attached and can
//! serve a non-empty pool. Liveness only fails once shutdown has begun.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use actix_web::http::{StatusCode, header};
use actix_web::{HttpResponse, get, web};
use serde::Serialize;
use tracing::warn;
use utoipa::ToSchema;

use crate::domain::ports::GachaQuery;

/// Coarse lifecycle state of the gacha service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ServiceStatus {
    /// No service attached yet, or its pool is empty.
    Starting,
    /// Draws can be served.
    Ready,
    /// Shutdown has begun.
    Draining,
}

/// Body returned by both probes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    /// Current lifecycle state.
    pub status: ServiceStatus,
    /// Characters in the draw pool; zero until a service is attached.
    pub pool_size: usize,
}

/// Health view over the gacha service built at startup.
#[derive(Default)]
pub struct HealthState {
    service: OnceLock<Arc<dyn GachaQuery>>,
    draining: AtomicBool,
}

impl HealthState {
    /// Nothing attached and not draining.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the service once it has been built. Later calls keep the first.
    pub fn attach(&self, service: Arc<dyn GachaQuery>) {
        if self.service.set(service).is_err() {
            warn!("gacha service already attached to health state");
        }
    }

    /// Report draining from now on; both probes fail afterwards.
    pub fn begin_draining(&self) {
        self.draining.store(true, Ordering::Release);
    }

    /// Snapshot of the current health.
    #[must_use]
    pub fn report(&self) -> HealthReport {
        let pool_size = self
            .service
            .get()
            .map_or(0, |service| service.pool_info().characters.len());
        let status = if self.draining.load(Ordering::Acquire) {
            ServiceStatus::Draining
        } else if pool_size == 0 {
            ServiceStatus::Starting
        } else {
            ServiceStatus::Ready
        };
        HealthReport { status, pool_size }
    }

    fn respond(healthy: bool, report: &HealthReport) -> HttpResponse {
        let status = if healthy {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        };
        HttpResponse::build(status)
            .insert_header((header::CACHE_CONTROL, "no-store"))
            .json(report)
    }
}

/// Readiness probe: 200 once draws can be served, 503 otherwise.
#[utoipa::path(
    get,
    path = "/health/ready",
    tags = ["health"],
    responses(
        (status = 200, description = "Gacha service is serving draws", body = HealthReport),
        (status = 503, description = "Service not attached yet or draining", body = HealthReport)
    )
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    let report = state.report();
    HealthState::respond(report.status == ServiceStatus::Ready, &report)
}

/// Liveness probe: 200 until shutdown begins, 503 afterwards.
#[utoipa::path(
    get,
    path = "/health/live",
    tags = ["health"],
    responses(
        (status = 200, description = "Process is alive", body = HealthReport),
        (status = 503, description = "Server is draining", body = HealthReport)
    )
)]
#[get("/health/live")]
pub async fn live(state: web::Data<HealthState>) -> HttpResponse {
    let report = state.report();
    HealthState::respond(report.status != ServiceStatus::Draining, &report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::seeded_service;
    use crate::outbound::memory::StartingBalances;
    use actix_web::{App, test};
    use serde_json::{Value, json};

    async fn probe(state: web::Data<HealthState>, uri: &str) -> (StatusCode, Option<String>, Value) {
        let app = test::init_service(App::new().app_data(state).service(ready).service(live)).await;
        let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        let status = res.status();
        let cache = res
            .headers()
            .get(header::CACHE_CONTROL)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body: Value = test::read_body_json(res).await;
        (status, cache, body)
    }

    fn attached() -> web::Data<HealthState> {
        let state = web::Data::new(HealthState::new());
        state.attach(seeded_service(StartingBalances::default()));
        state
    }

    #[actix_web::test]
    async fn readiness_waits_for_an_attached_service() {
        let state = web::Data::new(HealthState::new());

        let (status, cache, body) = probe(state, "/health/ready").await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(cache.as_deref(), Some("no-store"));
        assert_eq!(body, json!({"status": "starting", "poolSize": 0}));
    }

    #[actix_web::test]
    async fn readiness_reports_the_standard_pool_once_attached() {
        let (status, cache, body) = probe(attached(), "/health/ready").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(cache.as_deref(), Some("no-store"));
        assert_eq!(body, json!({"status": "ready", "poolSize": 11}));
    }

    #[actix_web::test]
    async fn liveness_does_not_wait_for_the_service() {
        let state = web::Data::new(HealthState::new());

        let (status, _, body) = probe(state, "/health/live").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "starting");
    }

    #[actix_web::test]
    async fn draining_fails_both_probes() {
        let state = attached();
        state.begin_draining();

        let (ready_status, _, ready_body) = probe(state.clone(), "/health/ready").await;
        let (live_status, _, live_body) = probe(state, "/health/live").await;

        assert_eq!(ready_status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(live_status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(ready_body, json!({"status": "draining", "poolSize": 11}));
        assert_eq!(live_body, ready_body);
    }

    #[core::prelude::v1::test]
    fn second_attach_keeps_the_first_service() {
        let state = attached();
        state.attach(seeded_service(StartingBalances::default()));

        assert_eq!(state.report().status, ServiceStatus::Ready);
    }
}
