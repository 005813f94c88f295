//! account-core: shared infrastructure for the account portal.
pub mod error;
pub mod middleware;
pub mod observability;

pub use axum;
pub use tracing;
