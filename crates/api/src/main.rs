use std::sync::Arc;

use anyhow::Result;
use api::{build_router, ApiState};
use axum::Router;
use common::{config::AppConfig, logging};
use gateway::{HttpUpstreamClient, UpstreamGateway};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_logging("api", "info");
    let config = AppConfig::load()?;

    let base = config.upstream.base_url()?;
    info!(upstream = %base, "proxying upstream api");
    let client = Arc::new(HttpUpstreamClient::new(
        base,
        config.upstream.user_agent.clone(),
    )?);
    let gateway = Arc::new(UpstreamGateway::new(client));
    let state = Arc::new(ApiState { gateway });
    let app: Router = build_router(state);

    let addr: std::net::SocketAddr = config.api.bind.parse()?;
    info!("api listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
