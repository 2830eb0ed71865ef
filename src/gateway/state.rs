use std::sync::Arc;

use crate::catalog::models::{Category, Location, Place};
use crate::catalog::repository::{EntityRepository, PgEntityRepository};
use crate::config::AuthConfig;
use crate::db::Database;
use crate::memory::{InMemoryAuthStore, InMemoryEntityRepository};
use crate::user_auth::password::CredentialVerifier;
use crate::user_auth::repository::PgAuthRepository;
use crate::user_auth::{AuthService, AuthStores, TokenError, TokenIssuer};

/// Gateway application state (shared, read-only)
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub places: Arc<dyn EntityRepository<Place>>,
    pub categories: Arc<dyn EntityRepository<Category>>,
    pub locations: Arc<dyn EntityRepository<Location>>,
    /// PostgreSQL pool; None when running on the in-memory stores
    pub pg_db: Option<Arc<Database>>,
}

/// Repository lookup by entity type, for the generic catalog handlers
pub trait HasRepository<E: crate::catalog::Entity> {
    fn repository(&self) -> &Arc<dyn EntityRepository<E>>;
}

impl HasRepository<Place> for AppState {
    fn repository(&self) -> &Arc<dyn EntityRepository<Place>> {
        &self.places
    }
}

impl HasRepository<Category> for AppState {
    fn repository(&self) -> &Arc<dyn EntityRepository<Category>> {
        &self.categories
    }
}

impl HasRepository<Location> for AppState {
    fn repository(&self) -> &Arc<dyn EntityRepository<Location>> {
        &self.locations
    }
}

impl AppState {
    pub fn new(
        auth: Arc<AuthService>,
        places: Arc<dyn EntityRepository<Place>>,
        categories: Arc<dyn EntityRepository<Category>>,
        locations: Arc<dyn EntityRepository<Location>>,
        pg_db: Option<Arc<Database>>,
    ) -> Self {
        Self {
            auth,
            places,
            categories,
            locations,
            pg_db,
        }
    }

    /// Every store backed by PostgreSQL
    pub fn with_postgres(db: Arc<Database>, config: &AuthConfig) -> Result<Self, TokenError> {
        let repo = Arc::new(PgAuthRepository::new(&db));
        let stores = AuthStores {
            users: repo.clone(),
            sessions: repo.clone(),
            requests: repo,
        };
        Ok(Self::new(
            Arc::new(auth_service(stores, config)?),
            Arc::new(PgEntityRepository::<Place>::new(&db)),
            Arc::new(PgEntityRepository::<Category>::new(&db)),
            Arc::new(PgEntityRepository::<Location>::new(&db)),
            Some(db),
        ))
    }

    /// Every store in process memory; nothing survives a restart.
    pub fn in_memory(config: &AuthConfig) -> Result<Self, TokenError> {
        let store = Arc::new(InMemoryAuthStore::new());
        Ok(Self::new(
            Arc::new(auth_service(InMemoryAuthStore::stores(&store), config)?),
            Arc::new(InMemoryEntityRepository::<Place>::new()),
            Arc::new(InMemoryEntityRepository::<Category>::new()),
            Arc::new(InMemoryEntityRepository::<Location>::new()),
            None,
        ))
    }
}

/// Build the auth orchestrator from configuration
pub fn auth_service(stores: AuthStores, config: &AuthConfig) -> Result<AuthService, TokenError> {
    Ok(AuthService::new(
        stores,
        TokenIssuer::new(config)?,
        CredentialVerifier::new(config.bcrypt_cost),
        config.secret_code.clone(),
    ))
}
