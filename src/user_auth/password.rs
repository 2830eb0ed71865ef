//! Credential verification backed by bcrypt.

use super::error::AuthError;

/// bcrypt hashing/verification with a fixed cost factor.
#[derive(Debug, Clone, Copy)]
pub struct CredentialVerifier {
    cost: u32,
}

impl Default for CredentialVerifier {
    fn default() -> Self {
        Self::new(Self::DEFAULT_COST)
    }
}

impl CredentialVerifier {
    pub const DEFAULT_COST: u32 = 10;
    /// Cost range bcrypt accepts
    pub const MIN_COST: u32 = 4;
    pub const MAX_COST: u32 = 31;

    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn hash(&self, password: &str) -> Result<String, bcrypt::BcryptError> {
        bcrypt::hash(password, self.cost)
    }

    /// `Ok(false)` on mismatch; `Err` only when `stored_hash` is not a valid bcrypt hash.
    pub fn verify(&self, stored_hash: &str, candidate: &str) -> Result<bool, bcrypt::BcryptError> {
        bcrypt::verify(candidate, stored_hash)
    }

    /// [`Self::hash`] on the blocking pool
    pub async fn hash_blocking(&self, password: String) -> Result<String, AuthError> {
        let verifier = *self;
        tokio::task::spawn_blocking(move || verifier.hash(&password))
            .await
            .map_err(|e| AuthError::Internal(format!("hash task failed: {}", e)))?
            .map_err(AuthError::Hash)
    }

    /// [`Self::verify`] on the blocking pool
    pub async fn verify_blocking(
        &self,
        stored_hash: String,
        candidate: String,
    ) -> Result<bool, AuthError> {
        let verifier = *self;
        tokio::task::spawn_blocking(move || verifier.verify(&stored_hash, &candidate))
            .await
            .map_err(|e| AuthError::Internal(format!("verify task failed: {}", e)))?
            .map_err(AuthError::Hash)
    }
}
