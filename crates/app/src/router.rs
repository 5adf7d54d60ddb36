use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use metrics::counter;
use metrics_exporter_prometheus::PrometheusHandle;
use tracing::warn;

use geo_backend_core::{DomainPool, DomainService, ProvisioningSummary};

use crate::access_log::access_log;
use crate::problem::ProblemResponse;
use crate::telemetry;

#[derive(Clone)]
pub struct AppState<P> {
    metrics: PrometheusHandle,
    service: DomainService<P>,
}

impl<P: DomainPool> AppState<P> {
    pub fn new(metrics: PrometheusHandle, service: DomainService<P>) -> Self {
        Self { metrics, service }
    }

    pub fn metrics(&self) -> &PrometheusHandle {
        &self.metrics
    }

    pub fn service(&self) -> &DomainService<P> {
        &self.service
    }
}

pub fn app_router<P>(state: AppState<P>) -> Router
where
    P: DomainPool + Clone + 'static,
{
    Router::new()
        .route("/healthz", get(healthz))
        .route("/metrics", get(metrics_handler::<P>))
        .route("/setup/domains", post(setup_domains::<P>))
        .layer(middleware::from_fn(access_log))
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

async fn metrics_handler<P>(State(state): State<AppState<P>>) -> impl IntoResponse
where
    P: DomainPool + Clone + 'static,
{
    let body = telemetry::render_metrics(state.metrics());
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/plain; version=0.0.4")
        .body(Body::from(body))
        .unwrap()
}

/// Re-runs catalog provisioning on demand.
///
/// The summary is fixed whenever the batch runs to completion; only a pool
/// acquisition failure surfaces as an error response, matching the service
/// contract.
async fn setup_domains<P>(
    State(state): State<AppState<P>>,
) -> Result<Json<ProvisioningSummary>, ProblemResponse>
where
    P: DomainPool + Clone + 'static,
{
    match state.service().create_domains().await {
        Ok(summary) => {
            counter!("setup_runs_total", "result" => "completed").increment(1);
            Ok(Json(summary))
        }
        Err(err) => {
            counter!("setup_runs_total", "result" => "acquire_failed").increment(1);
            warn!(stage = "setup", error = %err, "provisioning aborted before any statement ran");
            Err(ProblemResponse::service_unavailable(
                "pool_acquire_failed",
                err.to_string(),
            ))
        }
    }
}
