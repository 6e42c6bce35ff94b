//! API Gateway Library
//!
//! This crate provides the HTTP API that turns signup and login requests
//! into `get_user`/`create_user` messages for the auth service.

pub mod clients;
pub mod config;
pub mod extractors;
pub mod handlers;
pub mod openapi;
pub mod routes;
pub mod service;
pub mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::trace::TraceLayer;
use tracing::info;

use crate::clients::AuthClient;
use crate::config::GatewayConfig;
use crate::routes::create_router;
use crate::service::AuthFacade;
use crate::state::AppState;

/// Run the gateway as an embedded component (for combined binary).
pub async fn run_embedded(
    host: &str,
    port: u16,
    auth_port: u16,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = GatewayConfig::from_env().with_bind(host, port);
    config.auth_service.endpoint = format!("{}:{}", connect_host(host), auth_port);

    run(config).await
}

/// Build the application state for a configuration.
pub fn build_state(config: GatewayConfig) -> AppState {
    let auth_client = AuthClient::connect(&config.auth_service.endpoint)
        .with_timeout(config.auth_service.request_timeout());
    let auth_service = Arc::new(AuthFacade::new(Arc::new(auth_client)));

    AppState::new(auth_service, config)
}

/// Run the HTTP server with the given configuration.
pub async fn run(config: GatewayConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr: SocketAddr = config.service.bind_addr().parse()?;
    info!(
        "Gateway forwarding auth requests to {}",
        config.auth_service.endpoint
    );

    let state = build_state(config);
    let app = create_router(state).layer(TraceLayer::new_for_http());

    info!("Gateway listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Wildcard bind addresses are not connectable targets everywhere.
fn connect_host(host: &str) -> &str {
    match host {
        "0.0.0.0" | "::" => "127.0.0.1",
        other => other,
    }
}
