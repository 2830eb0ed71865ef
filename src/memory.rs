//! In-memory store backends
//!
//! Used when no database URL is configured, and by the tests. Every
//! operation bumps a call counter so tests can assert which storage calls a
//! flow made.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::catalog::repository::{Entity, EntityRepository};
use crate::db::StoreError;
use crate::user_auth::AuthStores;
use crate::user_auth::models::{AdminRequest, NewUser, RefreshToken, User, roles};
use crate::user_auth::repository::{AccessRequests, SessionStore, UserDirectory};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn bump(counter: &AtomicUsize) {
    counter.fetch_add(1, Ordering::SeqCst);
}

// ============================================================================
// Auth
// ============================================================================

#[derive(Default)]
struct AuthCalls {
    find_by_email: AtomicUsize,
    username_checks: AtomicUsize,
    email_checks: AtomicUsize,
    user_inserts: AtomicUsize,
    token_inserts: AtomicUsize,
    token_deletes: AtomicUsize,
    request_counts: AtomicUsize,
    request_inserts: AtomicUsize,
}

/// Users, refresh tokens and admin requests held in process memory
pub struct InMemoryAuthStore {
    users: Mutex<Vec<User>>,
    tokens: Mutex<Vec<RefreshToken>>,
    requests: Mutex<Vec<AdminRequest>>,
    next_id: AtomicI64,
    calls: AuthCalls,
}

impl Default for InMemoryAuthStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryAuthStore {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(Vec::new()),
            tokens: Mutex::new(Vec::new()),
            requests: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
            calls: AuthCalls::default(),
        }
    }

    /// The same store behind all three auth traits
    pub fn stores(store: &Arc<Self>) -> AuthStores {
        AuthStores {
            users: store.clone(),
            sessions: store.clone(),
            requests: store.clone(),
        }
    }

    fn next_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    /// Seed a user without going through registration. Not counted as a call.
    pub fn add_user(&self, username: &str, email: &str, password_hash: &str) -> i64 {
        let id = self.next_id();
        let now = Utc::now();
        lock(&self.users).push(User {
            id,
            username: username.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            role: roles::MEMBER,
            created_at: now,
            updated_at: now,
        });
        id
    }

    pub fn user_by_id(&self, id: i64) -> Option<User> {
        lock(&self.users).iter().find(|u| u.id == id).cloned()
    }

    pub fn refresh_tokens(&self) -> Vec<RefreshToken> {
        lock(&self.tokens).clone()
    }

    pub fn admin_requests(&self) -> Vec<AdminRequest> {
        lock(&self.requests).clone()
    }

    pub fn email_checks(&self) -> usize {
        self.calls.email_checks.load(Ordering::SeqCst)
    }

    pub fn username_checks(&self) -> usize {
        self.calls.username_checks.load(Ordering::SeqCst)
    }

    pub fn user_inserts(&self) -> usize {
        self.calls.user_inserts.load(Ordering::SeqCst)
    }

    /// Storage calls of any kind
    pub fn total_calls(&self) -> usize {
        let c = &self.calls;
        [
            &c.find_by_email,
            &c.username_checks,
            &c.email_checks,
            &c.user_inserts,
            &c.token_inserts,
            &c.token_deletes,
            &c.request_counts,
            &c.request_inserts,
        ]
        .iter()
        .map(|counter| counter.load(Ordering::SeqCst))
        .sum()
    }
}

#[async_trait]
impl UserDirectory for InMemoryAuthStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        bump(&self.calls.find_by_email);
        Ok(lock(&self.users).iter().find(|u| u.email == email).cloned())
    }

    async fn username_exists(&self, username: &str) -> Result<bool, StoreError> {
        bump(&self.calls.username_checks);
        Ok(lock(&self.users).iter().any(|u| u.username == username))
    }

    async fn email_exists(&self, email: &str) -> Result<bool, StoreError> {
        bump(&self.calls.email_checks);
        Ok(lock(&self.users).iter().any(|u| u.email == email))
    }

    async fn create_user(&self, user: NewUser) -> Result<i64, StoreError> {
        bump(&self.calls.user_inserts);
        let mut users = lock(&self.users);
        if users
            .iter()
            .any(|u| u.username == user.username || u.email == user.email)
        {
            return Err(StoreError::Conflict);
        }
        let id = self.next_id();
        let now = Utc::now();
        users.push(User {
            id,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            created_at: now,
            updated_at: now,
        });
        Ok(id)
    }
}

#[async_trait]
impl SessionStore for InMemoryAuthStore {
    async fn insert_refresh_token(
        &self,
        user_id: i64,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        bump(&self.calls.token_inserts);
        let id = self.next_id();
        lock(&self.tokens).push(RefreshToken {
            id,
            user_id,
            token: token.to_string(),
            expires_at,
            created_at: Utc::now(),
        });
        Ok(())
    }

    async fn delete_refresh_token(&self, token: &str) -> Result<u64, StoreError> {
        bump(&self.calls.token_deletes);
        let mut tokens = lock(&self.tokens);
        let before = tokens.len();
        tokens.retain(|t| t.token != token);
        Ok((before - tokens.len()) as u64)
    }
}

#[async_trait]
impl AccessRequests for InMemoryAuthStore {
    async fn count_admin_requests(&self, telegram_id: &str) -> Result<i64, StoreError> {
        bump(&self.calls.request_counts);
        let count = lock(&self.requests)
            .iter()
            .filter(|r| r.telegram_id == telegram_id)
            .count();
        Ok(count as i64)
    }

    async fn create_admin_request(
        &self,
        telegram_id: &str,
        telegram_username: &str,
    ) -> Result<(), StoreError> {
        bump(&self.calls.request_inserts);
        let id = self.next_id();
        lock(&self.requests).push(AdminRequest {
            id,
            telegram_id: telegram_id.to_string(),
            telegram_username: telegram_username.to_string(),
            created_at: Utc::now(),
        });
        Ok(())
    }
}

// ============================================================================
// Catalog
// ============================================================================

#[derive(Default)]
struct RepoCalls {
    get: AtomicUsize,
    list: AtomicUsize,
    insert: AtomicUsize,
    update: AtomicUsize,
    delete: AtomicUsize,
    bulk_delete: AtomicUsize,
}

/// Rows keyed by id. Lists come back in id order.
pub struct InMemoryEntityRepository<E> {
    rows: Mutex<BTreeMap<i64, E>>,
    next_id: AtomicI64,
    calls: RepoCalls,
    bulk_ids: Mutex<Vec<Vec<i64>>>,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> Default for InMemoryEntityRepository<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> InMemoryEntityRepository<E> {
    pub fn new() -> Self {
        Self::with_rows(Vec::new())
    }

    /// Seed rows as stored. Ids assigned later continue after the largest seeded id.
    pub fn with_rows(rows: Vec<E>) -> Self {
        let next_id = rows.iter().map(Entity::id).max().unwrap_or(0) + 1;
        Self {
            rows: Mutex::new(rows.into_iter().map(|row| (row.id(), row)).collect()),
            next_id: AtomicI64::new(next_id),
            calls: RepoCalls::default(),
            bulk_ids: Mutex::new(Vec::new()),
            _entity: PhantomData,
        }
    }

    pub fn row(&self, id: i64) -> Option<E> {
        lock(&self.rows).get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        lock(&self.rows).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get_calls(&self) -> usize {
        self.calls.get.load(Ordering::SeqCst)
    }

    pub fn list_calls(&self) -> usize {
        self.calls.list.load(Ordering::SeqCst)
    }

    pub fn insert_calls(&self) -> usize {
        self.calls.insert.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> usize {
        self.calls.update.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.calls.delete.load(Ordering::SeqCst)
    }

    /// Bulk deletes that reached storage; empty id lists never do.
    pub fn bulk_delete_calls(&self) -> usize {
        self.calls.bulk_delete.load(Ordering::SeqCst)
    }

    /// Id list of every bulk delete, in call order
    pub fn bulk_delete_batches(&self) -> Vec<Vec<i64>> {
        lock(&self.bulk_ids).clone()
    }
}

#[async_trait]
impl<E: Entity> EntityRepository<E> for InMemoryEntityRepository<E> {
    async fn get_by_id(&self, id: i64) -> Result<Option<E>, StoreError> {
        bump(&self.calls.get);
        Ok(self.row(id))
    }

    async fn list_matching(&self, flags: &[&'static str]) -> Result<Vec<E>, StoreError> {
        bump(&self.calls.list);
        Ok(lock(&self.rows)
            .values()
            .filter(|row| flags.iter().all(|flag| row.flag(flag) == Some(true)))
            .cloned()
            .collect())
    }

    async fn insert(&self, entity: &E) -> Result<i64, StoreError> {
        bump(&self.calls.insert);
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let mut row = entity.clone();
        row.set_id(id);
        lock(&self.rows).insert(id, row);
        Ok(id)
    }

    async fn update(&self, entity: &E) -> Result<u64, StoreError> {
        bump(&self.calls.update);
        let mut rows = lock(&self.rows);
        match rows.get_mut(&entity.id()) {
            Some(row) => {
                // created_at is never written by an update
                let created_at = row.created_at();
                *row = entity.clone();
                row.set_created_at(created_at);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_by_id(&self, id: i64) -> Result<u64, StoreError> {
        bump(&self.calls.delete);
        Ok(lock(&self.rows).remove(&id).map_or(0, |_| 1))
    }

    async fn delete_by_ids(&self, ids: &[i64]) -> Result<u64, StoreError> {
        if ids.is_empty() {
            return Err(StoreError::EmptyIdList);
        }
        bump(&self.calls.bulk_delete);
        lock(&self.bulk_ids).push(ids.to_vec());
        let mut rows = lock(&self.rows);
        let removed = ids.iter().filter(|id| rows.remove(*id).is_some()).count();
        Ok(removed as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::models::{Category, Place};
    use chrono::Duration;

    #[tokio::test]
    async fn test_ids_continue_after_seeded_rows() {
        let repo = InMemoryEntityRepository::with_rows(vec![Category {
            id: 10,
            category_name: "Indian".to_string(),
            ..Default::default()
        }]);
        let id = repo.insert(&Category::default()).await.unwrap();
        assert_eq!(id, 11);
        assert_eq!(repo.len(), 2);
    }

    #[tokio::test]
    async fn test_update_never_writes_created_at() {
        let created = Utc::now() - Duration::days(1);
        let repo = InMemoryEntityRepository::with_rows(vec![Place {
            id: 1,
            created_at: created,
            updated_at: created,
            ..Default::default()
        }]);

        let now = Utc::now();
        let edited = Place {
            id: 1,
            name: "Renamed".to_string(),
            created_at: now,
            updated_at: now,
            ..Default::default()
        };
        assert_eq!(repo.update(&edited).await.unwrap(), 1);

        let row = repo.row(1).unwrap();
        assert_eq!(row.name, "Renamed");
        assert_eq!(row.created_at, created);
        assert_eq!(row.updated_at, now);

        assert_eq!(repo.update(&Place { id: 99, ..Default::default() }).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_bulk_delete_records_batches() {
        let repo = InMemoryEntityRepository::with_rows(
            (1..=4)
                .map(|id| Place {
                    id,
                    ..Default::default()
                })
                .collect(),
        );

        assert!(matches!(repo.delete_by_ids(&[]).await, Err(StoreError::EmptyIdList)));
        assert_eq!(repo.bulk_delete_calls(), 0);

        assert_eq!(repo.delete_by_ids(&[1, 2, 9]).await.unwrap(), 2);
        assert_eq!(repo.bulk_delete_calls(), 1);
        assert_eq!(repo.bulk_delete_batches(), vec![vec![1, 2, 9]]);
        assert_eq!(repo.len(), 2);
    }

    #[tokio::test]
    async fn test_auth_store_counts_calls() {
        let store = InMemoryAuthStore::new();
        store.add_user("alice", "alice@example.com", "hash");
        assert_eq!(store.total_calls(), 0);

        assert!(store.username_exists("alice").await.unwrap());
        assert!(!store.email_exists("bob@example.com").await.unwrap());
        assert_eq!(store.username_checks(), 1);
        assert_eq!(store.email_checks(), 1);
        assert_eq!(store.total_calls(), 2);

        let dup = store
            .create_user(NewUser {
                username: "alice".to_string(),
                email: "alice2@example.com".to_string(),
                password_hash: String::new(),
                role: roles::MEMBER,
            })
            .await;
        assert!(matches!(dup, Err(StoreError::Conflict)));
    }
}
