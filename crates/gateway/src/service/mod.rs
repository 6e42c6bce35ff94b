//! Gateway-side authentication rules.

mod auth_facade;

pub use auth_facade::{AuthFacade, AuthService};
