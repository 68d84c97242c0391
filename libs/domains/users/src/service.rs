use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use axum_helpers::Operation;
use std::sync::Arc;
use tracing::{error, instrument};
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::{InputUser, NewUser, Page, User, UserChanges, UserFilter, UserPage};
use crate::notifier::{Notifier, UserEvent};
use crate::repository::UserRepository;

/// Business rules between the handlers, the storage gateway and the notifier.
///
/// Every successful mutation is followed by one notification attempt whose
/// failure is logged and otherwise ignored.
pub struct UserService<R: UserRepository, N: Notifier> {
    repository: Arc<R>,
    notifier: Arc<N>,
    password_params: Params,
}

/// Argon2id memory cost in KiB (64 MiB)
pub const HASH_MEMORY_KIB: u32 = 64 * 1024;
pub const HASH_ITERATIONS: u32 = 3;
pub const HASH_PARALLELISM: u32 = 1;

/// Cost parameters aiming at roughly 100ms per hash on commodity hardware.
pub fn default_password_params() -> Params {
    Params::new(HASH_MEMORY_KIB, HASH_ITERATIONS, HASH_PARALLELISM, None).unwrap_or_default()
}

impl<R: UserRepository, N: Notifier> UserService<R, N> {
    pub fn new(repository: R, notifier: N) -> Self {
        Self {
            repository: Arc::new(repository),
            notifier: Arc::new(notifier),
            password_params: default_password_params(),
        }
    }

    /// Override the hashing cost, e.g. to keep test suites fast.
    pub fn with_password_params(mut self, params: Params) -> Self {
        self.password_params = params;
        self
    }

    /// Create a user and return its new id
    #[instrument(skip(self, input), fields(nickname = %input.nickname))]
    pub async fn store(&self, input: InputUser) -> UserResult<Uuid> {
        let password_hash = hash_password(self.password_params.clone(), input.password).await?;

        let user = NewUser {
            id: Uuid::new_v4(),
            first_name: input.first_name,
            last_name: input.last_name,
            nickname: input.nickname,
            password_hash,
            email: input.email,
            country: input.country.to_uppercase(),
        };

        let created = self
            .repository
            .insert(user)
            .await
            .map_err(UserError::store(Operation::Create))?;

        self.publish(UserEvent::Created, created.id).await;
        Ok(created.id)
    }

    /// One page of users matching `filter`, plus the total number of matches
    #[instrument(skip(self))]
    pub async fn get(&self, filter: UserFilter, page: Page) -> UserResult<UserPage> {
        self.repository
            .select(filter, page)
            .await
            .map_err(UserError::store(Operation::Select))
    }

    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: Uuid) -> UserResult<User> {
        self.repository
            .select_by_id(id)
            .await
            .map_err(UserError::store(Operation::Select))?
            .ok_or(UserError::NotFound)
    }

    /// Overwrite every editable field of `id`
    #[instrument(skip(self, input), fields(user_id = %id))]
    pub async fn update(&self, id: Uuid, input: InputUser) -> UserResult<User> {
        let password_hash = hash_password(self.password_params.clone(), input.password).await?;

        let changes = UserChanges {
            first_name: input.first_name,
            last_name: input.last_name,
            nickname: input.nickname,
            password_hash,
            email: input.email,
            country: input.country.to_uppercase(),
        };

        let updated = self
            .repository
            .update(id, changes)
            .await
            .map_err(UserError::store(Operation::Update))?;

        self.publish(UserEvent::Updated, id).await;
        Ok(updated)
    }

    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn delete(&self, id: Uuid) -> UserResult<()> {
        self.repository
            .delete(id)
            .await
            .map_err(UserError::store(Operation::Delete))?;

        self.publish(UserEvent::Deleted, id).await;
        Ok(())
    }

    async fn publish(&self, event: UserEvent, id: Uuid) {
        if let Err(e) = self.notifier.notify(event, id).await {
            error!(
                subject = event.subject(),
                user_id = %id,
                "Notification dropped: {}",
                e
            );
        }
    }
}

/// Argon2id with a random salt, on the blocking pool
async fn hash_password(params: Params, password: String) -> UserResult<String> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| UserError::PasswordHash(e.to_string()))
    })
    .await
    .map_err(|e| UserError::PasswordHash(e.to_string()))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifier::{MockNotifier, NotifyError};
    use crate::repository::{MockUserRepository, StoreError};
    use argon2::{PasswordHash, PasswordVerifier};
    use chrono::Utc;
    use mockall::predicate::eq;
    use std::sync::Mutex;

    fn input() -> InputUser {
        InputUser {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            nickname: "ada".into(),
            password: "password1".into(),
            email: "ada@example.com".into(),
            country: "gb".into(),
        }
    }

    fn stored(user: NewUser) -> User {
        User {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            nickname: user.nickname,
            password_hash: user.password_hash,
            email: user.email,
            country: user.country,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_store_hashes_password_and_uppercases_country() {
        let inserted = Arc::new(Mutex::new(None));
        let captured = inserted.clone();

        let mut repo = MockUserRepository::new();
        repo.expect_insert().times(1).returning(move |user| {
            *captured.lock().unwrap() = Some(user.clone());
            Ok(stored(user))
        });

        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify()
            .withf(|event, _| *event == UserEvent::Created)
            .times(1)
            .returning(|_, _| Ok(()));

        let service = UserService::new(repo, notifier);
        let id = service.store(input()).await.unwrap();

        let user = inserted.lock().unwrap().clone().unwrap();
        assert_eq!(user.id, id);
        assert_eq!(user.country, "GB");
        assert_ne!(user.password_hash, "password1");

        let parsed = PasswordHash::new(&user.password_hash).unwrap();
        assert!(
            Argon2::default()
                .verify_password(b"password1", &parsed)
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_store_hashes_with_tuned_cost() {
        let inserted = Arc::new(Mutex::new(None));
        let captured = inserted.clone();

        let mut repo = MockUserRepository::new();
        repo.expect_insert().returning(move |user| {
            *captured.lock().unwrap() = Some(user.clone());
            Ok(stored(user))
        });
        let mut notifier = MockNotifier::new();
        notifier.expect_notify().returning(|_, _| Ok(()));

        UserService::new(repo, notifier)
            .store(input())
            .await
            .unwrap();

        let user = inserted.lock().unwrap().clone().unwrap();
        let parsed = PasswordHash::new(&user.password_hash).unwrap();
        assert_eq!(parsed.algorithm.as_str(), "argon2id");
        assert_eq!(parsed.params.get_decimal("m"), Some(HASH_MEMORY_KIB));
        assert_eq!(parsed.params.get_decimal("t"), Some(HASH_ITERATIONS));
        assert_eq!(parsed.params.get_decimal("p"), Some(HASH_PARALLELISM));
    }

    #[tokio::test]
    async fn test_store_skips_notification_on_persistence_failure() {
        let mut repo = MockUserRepository::new();
        repo.expect_insert()
            .returning(|_| Err(StoreError::ConstraintViolation("users_nickname_key".into())));

        let mut notifier = MockNotifier::new();
        notifier.expect_notify().never();

        let service = UserService::new(repo, notifier);
        let result = service.store(input()).await;

        assert!(matches!(
            result,
            Err(UserError::Store {
                operation: Operation::Create,
                source: StoreError::ConstraintViolation(_)
            })
        ));
    }

    #[tokio::test]
    async fn test_notification_failure_is_swallowed() {
        let mut repo = MockUserRepository::new();
        repo.expect_insert().returning(|user| Ok(stored(user)));

        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify()
            .times(1)
            .returning(|_, _| Err(NotifyError::Timeout(std::time::Duration::from_secs(5))));

        let service = UserService::new(repo, notifier);
        assert!(service.store(input()).await.is_ok());
    }

    #[tokio::test]
    async fn test_get_passes_page_through() {
        let filter = UserFilter::new(Some("ada".into()), None);
        let page = Page::new(3, 20);

        let mut repo = MockUserRepository::new();
        repo.expect_select()
            .with(eq(filter.clone()), eq(page))
            .times(1)
            .returning(|_, _| {
                Ok(UserPage {
                    users: vec![],
                    total_count: 42,
                })
            });

        let service = UserService::new(repo, MockNotifier::new());
        let result = service.get(filter, page).await.unwrap();

        assert_eq!(result.total_count, 42);
        assert_eq!(page.offset(), 40);
    }

    #[tokio::test]
    async fn test_get_by_id_missing_is_not_found() {
        let mut repo = MockUserRepository::new();
        repo.expect_select_by_id().returning(|_| Ok(None));

        let service = UserService::new(repo, MockNotifier::new());
        let result = service.get_by_id(Uuid::new_v4()).await;

        assert!(matches!(result, Err(UserError::NotFound)));
    }

    #[tokio::test]
    async fn test_update_publishes_with_id() {
        let id = Uuid::new_v4();

        let mut repo = MockUserRepository::new();
        repo.expect_update()
            .withf(move |uid, changes| *uid == id && changes.country == "GB")
            .returning(|id, changes| {
                Ok(stored(NewUser {
                    id,
                    first_name: changes.first_name,
                    last_name: changes.last_name,
                    nickname: changes.nickname,
                    password_hash: changes.password_hash,
                    email: changes.email,
                    country: changes.country,
                }))
            });

        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify()
            .with(eq(UserEvent::Updated), eq(id))
            .times(1)
            .returning(|_, _| Ok(()));

        let service = UserService::new(repo, notifier);
        let updated = service.update(id, input()).await.unwrap();
        assert_eq!(updated.nickname, "ada");
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found_without_notification() {
        let mut repo = MockUserRepository::new();
        repo.expect_delete().returning(|_| Err(StoreError::NotFound));

        let mut notifier = MockNotifier::new();
        notifier.expect_notify().never();

        let service = UserService::new(repo, notifier);
        let result = service.delete(Uuid::new_v4()).await;

        assert!(matches!(result, Err(UserError::NotFound)));
    }

    #[tokio::test]
    async fn test_delete_publishes_with_id() {
        let id = Uuid::new_v4();

        let mut repo = MockUserRepository::new();
        repo.expect_delete().with(eq(id)).returning(|_| Ok(()));

        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify()
            .with(eq(UserEvent::Deleted), eq(id))
            .times(1)
            .returning(|_, _| Ok(()));

        let service = UserService::new(repo, notifier);
        assert!(service.delete(id).await.is_ok());
    }
}
