use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{NewUser, Page, User, UserChanges, UserFilter, UserPage};

/// Typed failures of the storage gateway
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,

    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("store unreachable: {0}")]
    Connectivity(String),

    #[error("query failed: {0}")]
    Query(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage gateway for users.
///
/// Takes already validated and normalized data; holds no business rules.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a row; timestamps are assigned by the store
    async fn insert(&self, user: NewUser) -> StoreResult<User>;

    /// One page of matches, ordered by creation time, plus the total match count
    async fn select(&self, filter: UserFilter, page: Page) -> StoreResult<UserPage>;

    async fn select_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;

    /// Overwrite every editable column and refresh `updated_at`
    async fn update(&self, id: Uuid, changes: UserChanges) -> StoreResult<User>;

    /// `StoreError::NotFound` when no row was removed
    async fn delete(&self, id: Uuid) -> StoreResult<()>;
}

/// In-memory implementation of UserRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn matches(user: &User, filter: &UserFilter) -> bool {
        let name_ok = filter.name.as_ref().is_none_or(|name| {
            let needle = name.to_lowercase();
            user.first_name.to_lowercase().contains(&needle)
                || user.last_name.to_lowercase().contains(&needle)
        });
        let country_ok = filter
            .country
            .as_ref()
            .is_none_or(|country| user.country.eq_ignore_ascii_case(country));

        name_ok && country_ok
    }

    fn nickname_taken(users: &HashMap<Uuid, User>, nickname: &str, except: Option<Uuid>) -> bool {
        users
            .values()
            .any(|u| u.nickname == nickname && Some(u.id) != except)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: NewUser) -> StoreResult<User> {
        let mut users = self.users.write().await;

        if users.contains_key(&user.id) {
            return Err(StoreError::ConstraintViolation("users_pkey".into()));
        }
        if Self::nickname_taken(&users, &user.nickname, None) {
            return Err(StoreError::ConstraintViolation("users_nickname_key".into()));
        }

        let now = Utc::now();
        let created = User {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            nickname: user.nickname,
            password_hash: user.password_hash,
            email: user.email,
            country: user.country,
            created_at: now,
            updated_at: now,
        };
        users.insert(created.id, created.clone());

        Ok(created)
    }

    async fn select(&self, filter: UserFilter, page: Page) -> StoreResult<UserPage> {
        let users = self.users.read().await;

        let mut matching: Vec<&User> = users
            .values()
            .filter(|u| Self::matches(u, &filter))
            .collect();
        matching.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        let total_count = matching.len() as u64;
        let users = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .cloned()
            .collect();

        Ok(UserPage { users, total_count })
    }

    async fn select_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn update(&self, id: Uuid, changes: UserChanges) -> StoreResult<User> {
        let mut users = self.users.write().await;

        if Self::nickname_taken(&users, &changes.nickname, Some(id)) {
            return Err(StoreError::ConstraintViolation("users_nickname_key".into()));
        }

        let user = users.get_mut(&id).ok_or(StoreError::NotFound)?;
        user.first_name = changes.first_name;
        user.last_name = changes.last_name;
        user.nickname = changes.nickname;
        user.password_hash = changes.password_hash;
        user.email = changes.email;
        user.country = changes.country;
        user.updated_at = Utc::now();

        Ok(user.clone())
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        self.users
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}
