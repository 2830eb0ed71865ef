//! Food Randomizer - REST backend for picking somewhere to eat
//!
//! # Modules
//!
//! - [`config`] - YAML configuration with env/CLI overrides
//! - [`logging`] - tracing subscriber setup
//! - [`db`] - PostgreSQL pool, timeouts, shared storage errors
//! - [`memory`] - in-memory store backends
//! - [`user_auth`] - registration, login, tokens, bearer middleware
//! - [`catalog`] - places, categories, locations and the random picker
//! - [`gateway`] - axum router, shared state, response envelopes

pub mod catalog;
pub mod config;
pub mod db;
pub mod gateway;
pub mod logging;
pub mod memory;
pub mod user_auth;

// Convenient re-exports at crate root
pub use catalog::{Category, Entity, EntityRepository, Location, Place};
pub use config::{AppConfig, CliArgs};
pub use gateway::state::AppState;
pub use gateway::{build_router, run_server};
pub use user_auth::{AuthError, AuthService};
