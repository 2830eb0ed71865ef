//! Storage seams for accounts, refresh tokens and admin access requests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::time::Duration;

use super::models::{NewUser, User};
use crate::db::{Database, StoreError, with_timeout};

#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn username_exists(&self, username: &str) -> Result<bool, StoreError>;
    async fn email_exists(&self, email: &str) -> Result<bool, StoreError>;
    /// Returns the new user ID. Duplicate username/email is [`StoreError::Conflict`].
    async fn create_user(&self, user: NewUser) -> Result<i64, StoreError>;
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn insert_refresh_token(
        &self,
        user_id: i64,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    /// Number of rows removed; zero is not an error.
    async fn delete_refresh_token(&self, token: &str) -> Result<u64, StoreError>;
}

#[async_trait]
pub trait AccessRequests: Send + Sync {
    async fn count_admin_requests(&self, telegram_id: &str) -> Result<i64, StoreError>;
    async fn create_admin_request(
        &self,
        telegram_id: &str,
        telegram_username: &str,
    ) -> Result<(), StoreError>;
}

/// PostgreSQL implementation of the three auth stores
pub struct PgAuthRepository {
    pool: PgPool,
    timeout: Duration,
}

impl PgAuthRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            pool: db.pool().clone(),
            timeout: db.query_timeout(),
        }
    }
}

#[async_trait]
impl UserDirectory for PgAuthRepository {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        with_timeout(
            self.timeout,
            sqlx::query_as::<_, User>(
                r#"
                SELECT id, username, email, password_hash, role, created_at, updated_at
                FROM users
                WHERE email = $1
                "#,
            )
            .bind(email)
            .fetch_optional(&self.pool),
        )
        .await
    }

    async fn username_exists(&self, username: &str) -> Result<bool, StoreError> {
        let count: i64 = with_timeout(
            self.timeout,
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = $1")
                .bind(username)
                .fetch_one(&self.pool),
        )
        .await?;
        Ok(count > 0)
    }

    async fn email_exists(&self, email: &str) -> Result<bool, StoreError> {
        let count: i64 = with_timeout(
            self.timeout,
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = $1")
                .bind(email)
                .fetch_one(&self.pool),
        )
        .await?;
        Ok(count > 0)
    }

    async fn create_user(&self, user: NewUser) -> Result<i64, StoreError> {
        let now = Utc::now();
        with_timeout(
            self.timeout,
            sqlx::query_scalar(
                r#"
                INSERT INTO users (username, email, password_hash, role, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING id
                "#,
            )
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.role)
            .bind(now)
            .bind(now)
            .fetch_one(&self.pool),
        )
        .await
    }
}

#[async_trait]
impl SessionStore for PgAuthRepository {
    async fn insert_refresh_token(
        &self,
        user_id: i64,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        with_timeout(
            self.timeout,
            sqlx::query(
                r#"
                INSERT INTO refresh_tokens (user_id, token, expires_at, created_at)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(user_id)
            .bind(token)
            .bind(expires_at)
            .bind(Utc::now())
            .execute(&self.pool),
        )
        .await
        .map(|_| ())
    }

    async fn delete_refresh_token(&self, token: &str) -> Result<u64, StoreError> {
        let result = with_timeout(
            self.timeout,
            sqlx::query("DELETE FROM refresh_tokens WHERE token = $1")
                .bind(token)
                .execute(&self.pool),
        )
        .await?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl AccessRequests for PgAuthRepository {
    async fn count_admin_requests(&self, telegram_id: &str) -> Result<i64, StoreError> {
        with_timeout(
            self.timeout,
            sqlx::query_scalar("SELECT COUNT(*) FROM admin_requests WHERE telegram_id = $1")
                .bind(telegram_id)
                .fetch_one(&self.pool),
        )
        .await
    }

    async fn create_admin_request(
        &self,
        telegram_id: &str,
        telegram_username: &str,
    ) -> Result<(), StoreError> {
        with_timeout(
            self.timeout,
            sqlx::query(
                r#"
                INSERT INTO admin_requests (telegram_id, telegram_username, created_at)
                VALUES ($1, $2, $3)
                "#,
            )
            .bind(telegram_id)
            .bind(telegram_username)
            .bind(Utc::now())
            .execute(&self.pool),
        )
        .await
        .map(|_| ())
    }
}
