//! Domain layer - Core business entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.
//! The types here travel over the message transport between the gateway
//! and the auth service.

pub mod account;
pub mod constants;
pub mod error;

pub use account::{Account, AccountResponse, SignupRequest};
pub use constants::*;
pub use error::{DomainError, DomainResult};
