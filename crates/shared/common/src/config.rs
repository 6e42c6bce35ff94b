//! Shared configuration structures.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Base service configuration shared by all services.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
    /// Service name for logging and tracing
    pub service_name: String,
    /// Host address to bind
    pub host: String,
    /// Port to listen on
    pub port: u16,
}

impl ServiceConfig {
    /// Socket address string in `host:port` form
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            service_name: "service".to_string(),
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

/// Message transport client configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TransportClientConfig {
    /// Remote service address (e.g., "127.0.0.1:3001")
    pub endpoint: String,
    /// Per-request timeout in milliseconds (None = wait indefinitely)
    pub request_timeout_ms: Option<u64>,
}

impl TransportClientConfig {
    /// Per-request timeout, if one is configured
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
    }
}

impl Default for TransportClientConfig {
    fn default() -> Self {
        Self {
            endpoint: "127.0.0.1:3001".to_string(),
            request_timeout_ms: None,
        }
    }
}
