//! Common utilities shared across the gateway and the auth service.
//!
//! This crate provides:
//! - Unified error handling for HTTP and the message transport
//! - Configuration structures

pub mod config;
pub mod error;

pub use config::*;
pub use error::{AppError, AppResult};
