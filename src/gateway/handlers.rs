//! Gateway-level handlers. Domain handlers live next to their modules
//! (`user_auth::handlers`, `catalog::handlers`).

pub mod health;

pub use health::{HealthResponse, health_check};
