//! HS256 access/refresh token issuance and access-token verification.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::models::Identity;
use crate::config::AuthConfig;

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("{0} signing secret is empty")]
    EmptySecret(&'static str),

    #[error("Failed to sign token: {0}")]
    Signing(jsonwebtoken::errors::Error),

    #[error("Invalid token: {0}")]
    Invalid(jsonwebtoken::errors::Error),

    #[error("Token subject is not a numeric user id")]
    InvalidSubject,
}

/// Access token claims
#[derive(Debug, Serialize, Deserialize)]
pub struct AccessClaims {
    pub id: i64,
    pub email: String,
    pub username: String,
    /// User ID as a decimal string
    pub sub: String,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

/// Refresh token claims; persisted server side, never verified by the API.
#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub id: i64,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

/// Claims the bearer check needs from a verified access token
#[derive(Debug, Clone, Deserialize)]
pub struct BearerClaims {
    pub sub: String,
    pub exp: i64,
    #[serde(default)]
    pub username: String,
}

impl BearerClaims {
    pub fn user_id(&self) -> Result<i64, TokenError> {
        self.sub.parse().map_err(|_| TokenError::InvalidSubject)
    }
}

/// Signed token plus its expiry instant
#[derive(Debug, Clone)]
pub struct SignedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

pub struct TokenIssuer {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    issuer: String,
    audience: String,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenIssuer {
    pub fn new(config: &AuthConfig) -> Result<Self, TokenError> {
        if config.jwt_access_secret.is_empty() {
            return Err(TokenError::EmptySecret("access"));
        }
        if config.jwt_refresh_secret.is_empty() {
            return Err(TokenError::EmptySecret("refresh"));
        }
        let access = config.jwt_access_secret.as_bytes();
        Ok(Self {
            access_encoding: EncodingKey::from_secret(access),
            access_decoding: DecodingKey::from_secret(access),
            refresh_encoding: EncodingKey::from_secret(config.jwt_refresh_secret.as_bytes()),
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            access_ttl: Duration::hours(config.access_ttl_hours),
            refresh_ttl: Duration::days(config.refresh_ttl_days),
        })
    }

    pub fn issue_access(&self, identity: &Identity) -> Result<SignedToken, TokenError> {
        let now = Utc::now();
        let expires_at = now + self.access_ttl;
        let claims = AccessClaims {
            id: identity.id,
            email: identity.email.clone(),
            username: identity.username.clone(),
            sub: identity.id.to_string(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            jti: new_jti(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.access_encoding)
            .map_err(TokenError::Signing)?;
        Ok(SignedToken { token, expires_at })
    }

    pub fn issue_refresh(&self, identity: &Identity) -> Result<SignedToken, TokenError> {
        let now = Utc::now();
        let expires_at = now + self.refresh_ttl;
        let claims = RefreshClaims {
            id: identity.id,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            jti: new_jti(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.refresh_encoding)
            .map_err(TokenError::Signing)?;
        Ok(SignedToken { token, expires_at })
    }

    /// Check signature, expiry, audience and issuer of an access token.
    pub fn verify_access(&self, token: &str) -> Result<BearerClaims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.audience]);
        validation.set_issuer(&[&self.issuer]);
        validation.set_required_spec_claims(&["exp", "sub", "aud", "iss"]);

        decode::<BearerClaims>(token, &self.access_decoding, &validation)
            .map(|data| data.claims)
            .map_err(TokenError::Invalid)
    }
}

fn new_jti() -> String {
    format!("{:032x}", rand::random::<u128>())
}
