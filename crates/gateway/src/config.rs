//! Gateway configuration.

use std::env;

use common::{ServiceConfig, TransportClientConfig};

/// Gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// HTTP bind address
    pub service: ServiceConfig,
    /// Auth service transport endpoint and timeout
    pub auth_service: TransportClientConfig,
}

impl GatewayConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(host) = env::var("GATEWAY_HOST") {
            config.service.host = host;
        }
        if let Some(port) = env::var("GATEWAY_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
        {
            config.service.port = port;
        }
        if let Ok(url) = env::var("AUTH_SERVICE_URL") {
            config.auth_service.endpoint = url;
        }
        config.auth_service.request_timeout_ms = env::var("AUTH_SERVICE_TIMEOUT_MS")
            .ok()
            .and_then(|ms| ms.parse().ok());

        config
    }

    /// Override host and port (e.g. from CLI flags).
    pub fn with_bind(mut self, host: &str, port: u16) -> Self {
        self.service.host = host.to_string();
        self.service.port = port;
        self
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            service: ServiceConfig {
                service_name: "gateway".to_string(),
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            auth_service: TransportClientConfig::default(),
        }
    }
}
