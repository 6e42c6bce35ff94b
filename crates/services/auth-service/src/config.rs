//! Auth service configuration.

use std::env;

use common::ServiceConfig;

/// Auth service configuration.
#[derive(Debug, Clone)]
pub struct AuthServiceConfig {
    /// Bind address for the message transport listener
    pub service: ServiceConfig,
}

impl AuthServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(host) = env::var("AUTH_SERVICE_HOST") {
            config.service.host = host;
        }
        if let Some(port) = env::var("AUTH_SERVICE_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
        {
            config.service.port = port;
        }

        config
    }

    /// Override host and port (e.g. from CLI flags).
    pub fn with_bind(mut self, host: &str, port: u16) -> Self {
        self.service.host = host.to_string();
        self.service.port = port;
        self
    }
}

impl Default for AuthServiceConfig {
    fn default() -> Self {
        Self {
            service: ServiceConfig {
                service_name: "auth-service".to_string(),
                host: "0.0.0.0".to_string(),
                port: 3001,
            },
        }
    }
}
