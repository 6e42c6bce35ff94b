//! Message transport clients for calling microservices.

mod auth_client;

pub use auth_client::AuthClient;
