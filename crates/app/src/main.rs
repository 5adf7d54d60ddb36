mod access_log;
mod problem;
mod router;
mod telemetry;

use std::net::SocketAddr;

use tracing::info;

use geo_backend_core::DomainService;
use geo_backend_storage::Database;
use geo_backend_util::{load_env_file, AppConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    load_env_file();
    let config = AppConfig::from_env()?;

    telemetry::init_tracing(&config)?;
    let metrics = telemetry::init_metrics()?;

    let database = Database::connect(&config.database_url, config.db_max_connections).await?;
    let service = DomainService::new(database);

    // Bootstrap provisioning runs once before the server accepts traffic.
    // A pool acquisition failure here is fatal; individual domain failures
    // are absorbed by the service and do not block startup.
    let summary = service.create_domains().await?;
    info!(stage = "setup", message = summary.message, "domain provisioning finished");

    let state = router::AppState::new(metrics, service);

    let addr: SocketAddr = config.bind_addr;
    info!(stage = "app", %addr, env = %config.environment.as_str(), "starting HTTP server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        router::app_router(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .map_err(|err| err.into())
}
