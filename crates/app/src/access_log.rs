use std::net::SocketAddr;

use axum::{extract::ConnectInfo, extract::Request, middleware::Next, response::Response};
use metrics::counter;
use tracing::info;

/// Records method, URI and client address before delegating to the inner
/// handler.
///
/// The client address comes from the connect-info extension installed by the
/// server in `main`; router-level tests run without it, so its absence is
/// tolerated.
pub async fn access_log(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let client = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    info!(stage = "http", %method, %uri, client = %client, "request received");
    counter!("http_requests_total", "method" => method.to_string()).increment(1);

    next.run(request).await
}
