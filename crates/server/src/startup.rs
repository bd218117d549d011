use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use anyhow::Context;
use axum::Router;
use common::utils::logging::{init_logging, LogFormat};
use configs::{AppConfig, ServerConfig};
use dotenvy::dotenv;
use service::{
    console::HttpConsole,
    listing::{domain::Credentials, ListingService},
};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes::{self, AppState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Wire the console client, listing service and credentials from config.
pub fn build_state(cfg: &AppConfig) -> anyhow::Result<AppState> {
    let console = HttpConsole::from_config(&cfg.console).context("building console HTTP client")?;
    let listing = ListingService::new(Arc::new(console), cfg.console.servers.clone());
    let creds = Credentials::new(cfg.console.username.clone(), cfg.console.password.clone());
    Ok(AppState { listing: Arc::new(listing), creds: Arc::new(creds) })
}

pub fn build_app(state: AppState) -> Router {
    routes::build_router(state, build_cors())
}

fn bind_addr(server: &ServerConfig) -> anyhow::Result<SocketAddr> {
    let ip: IpAddr = server
        .host
        .parse()
        .with_context(|| format!("server.host `{}` is not an IP address", server.host))?;
    Ok(SocketAddr::new(ip, server.port))
}

/// Public entry: load config, build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    let cfg = AppConfig::load_and_validate()?;

    let format: LogFormat = cfg.server.log_format.parse().map_err(anyhow::Error::msg)?;
    init_logging(format);

    let app = build_app(build_state(&cfg)?);

    let addr = bind_addr(&cfg.server)?;
    info!(
        %addr,
        console_port = cfg.console.port,
        timeout_secs = cfg.console.timeout_secs,
        servers = cfg.console.servers.len(),
        "starting listing server"
    );
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
