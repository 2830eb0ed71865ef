//! User authentication: registration, login, logout and admin access requests
//!
//! - [`service::AuthService`] orchestrates the flows over the storage traits in [`repository`]
//! - [`token::TokenIssuer`] signs access/refresh tokens (HS256)
//! - [`password::CredentialVerifier`] hashes and checks passwords (bcrypt)
//! - [`middleware::bearer_auth_middleware`] guards routes with an access token

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod password;
pub mod repository;
pub mod service;
pub mod token;

pub use error::AuthError;
pub use service::{AuthService, AuthStores};
pub use token::{TokenError, TokenIssuer};
