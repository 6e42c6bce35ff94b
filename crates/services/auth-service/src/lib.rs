//! Auth Service Library
//!
//! This crate owns the user directory and answers `create_user` and
//! `get_user` messages over the message transport. It can run standalone
//! or embedded in the combined binary.

pub mod config;
pub mod dispatcher;
pub mod repository;
pub mod service;

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use crate::config::AuthServiceConfig;
use crate::dispatcher::AuthDispatcher;
use crate::repository::InMemoryDirectory;
use crate::service::AccountManager;

/// Wire an empty directory, the account service and the dispatcher.
pub fn build_dispatcher() -> Arc<AuthDispatcher> {
    let directory = Arc::new(InMemoryDirectory::new());
    let service = Arc::new(AccountManager::new(directory));
    Arc::new(AuthDispatcher::new(service))
}

/// Run the auth service as an embedded component (for combined binary).
pub async fn run_embedded(host: &str, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let config = AuthServiceConfig::from_env().with_bind(host, port);
    run_server_with_config(config).await
}

/// Run the transport server with the given configuration.
async fn run_server_with_config(
    config: AuthServiceConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let dispatcher = build_dispatcher();

    let listener = TcpListener::bind(config.service.bind_addr()).await?;
    info!(
        "{} listening on {}",
        config.service.service_name,
        listener.local_addr()?
    );

    transport::serve(listener, dispatcher).await?;

    Ok(())
}
