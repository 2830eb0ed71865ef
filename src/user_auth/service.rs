use std::sync::Arc;

use super::error::AuthError;
use super::models::{
    AccessRequestDto, Identity, LoginRequest, LoginResponse, LogoutRequest, NewUser,
    RegisterRequest, roles,
};
use super::password::CredentialVerifier;
use super::repository::{AccessRequests, SessionStore, UserDirectory};
use super::token::TokenIssuer;
use crate::db::StoreError;

/// Storage handles the auth flows run against
#[derive(Clone)]
pub struct AuthStores {
    pub users: Arc<dyn UserDirectory>,
    pub sessions: Arc<dyn SessionStore>,
    pub requests: Arc<dyn AccessRequests>,
}

pub struct AuthService {
    stores: AuthStores,
    tokens: TokenIssuer,
    verifier: CredentialVerifier,
    secret_code: String,
}

impl AuthService {
    pub fn new(
        stores: AuthStores,
        tokens: TokenIssuer,
        verifier: CredentialVerifier,
        secret_code: String,
    ) -> Self {
        Self {
            stores,
            tokens,
            verifier,
            secret_code,
        }
    }

    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }

    /// Verify credentials and issue an access/refresh token pair.
    ///
    /// Unknown email, wrong password and an unreadable stored hash all
    /// produce the same [`AuthError::InvalidCredentials`].
    pub async fn login(&self, req: LoginRequest) -> Result<LoginResponse, AuthError> {
        let user = match self.stores.users.find_user_by_email(&req.email).await? {
            Some(user) => user,
            None => {
                tracing::warn!("Login failed: unknown email");
                return Err(AuthError::InvalidCredentials);
            }
        };

        match self
            .verifier
            .verify_blocking(user.password_hash.clone(), req.password)
            .await
        {
            Ok(true) => {}
            Ok(false) => {
                tracing::warn!(user_id = user.id, "Login failed: password mismatch");
                return Err(AuthError::InvalidCredentials);
            }
            Err(AuthError::Hash(e)) => {
                tracing::warn!(user_id = user.id, "Login failed: stored hash unreadable: {}", e);
                return Err(AuthError::InvalidCredentials);
            }
            Err(e) => return Err(e),
        }

        let identity = Identity::from(&user);
        let access = self.tokens.issue_access(&identity)?;
        let refresh = self.tokens.issue_refresh(&identity)?;

        self.stores
            .sessions
            .insert_refresh_token(user.id, &refresh.token, refresh.expires_at)
            .await?;

        tracing::info!(user_id = user.id, "User logged in");
        Ok(LoginResponse {
            access_token: access.token,
            refresh_token: refresh.token,
            expiry: access.expires_at,
            username: user.username,
        })
    }

    /// Create an account gated by the registration secret code.
    pub async fn register(&self, req: RegisterRequest) -> Result<i64, AuthError> {
        if req.secret_code != self.secret_code {
            return Err(AuthError::InvalidSecretCode);
        }
        if self.stores.users.username_exists(&req.username).await? {
            return Err(AuthError::UsernameTaken);
        }
        if self.stores.users.email_exists(&req.email).await? {
            return Err(AuthError::EmailTaken);
        }

        let password_hash = self.verifier.hash_blocking(req.password).await?;
        let user_id = self
            .stores
            .users
            .create_user(NewUser {
                username: req.username,
                email: req.email,
                password_hash,
                role: roles::MEMBER,
            })
            .await
            .map_err(|e| match e {
                StoreError::Conflict => AuthError::DuplicateUser,
                other => AuthError::Store(other),
            })?;

        tracing::info!(user_id, "User registered");
        Ok(user_id)
    }

    /// Drop a refresh token. Unknown tokens are not an error.
    pub async fn logout(&self, req: LogoutRequest) -> Result<(), AuthError> {
        let removed = self
            .stores
            .sessions
            .delete_refresh_token(&req.refresh_token)
            .await?;
        tracing::debug!(removed, "Refresh token revoked");
        Ok(())
    }

    /// Record an admin access request unless one is already pending.
    pub async fn request_access(&self, req: AccessRequestDto) -> Result<(), AuthError> {
        let pending = self
            .stores
            .requests
            .count_admin_requests(&req.telegram_id)
            .await?;
        if pending > 0 {
            return Err(AuthError::RequestPending);
        }
        self.stores
            .requests
            .create_admin_request(&req.telegram_id, &req.telegram_username)
            .await?;
        tracing::info!(telegram_id = %req.telegram_id, "Admin access request submitted");
        Ok(())
    }
}
