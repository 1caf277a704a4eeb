//! User repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{NewUser, User, UserId};
use crate::domain::DomainError;

/// Repository trait for user storage
///
/// Implementations must enforce username uniqueness under the username
/// collation themselves and report a violation as `DomainError::Conflict`,
/// so concurrent writers that both passed the service-level check cannot
/// both succeed.
#[async_trait]
pub trait UserRepository: Send + Sync + Debug {
    /// Get a user by their ID
    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError>;

    /// Find a user whose username collides with `username` (case-insensitive)
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;

    /// Persist a new user and return it with its store-assigned id
    async fn create(&self, user: NewUser) -> Result<User, DomainError>;

    /// Overwrite an existing user
    async fn update(&self, user: &User) -> Result<User, DomainError>;

    /// Delete a user, returning whether a record was removed
    async fn delete(&self, id: &UserId) -> Result<bool, DomainError>;

    /// List all users in insertion order
    async fn list(&self) -> Result<Vec<User>, DomainError>;

    /// Count users
    async fn count(&self) -> Result<usize, DomainError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    use crate::domain::user::fold_username;

    /// Mock user repository for testing store faults
    ///
    /// Unlike the in-memory repository it does not check username
    /// uniqueness, which lets tests exercise the race where two writers pass
    /// the service check.
    #[derive(Debug, Default)]
    pub struct MockUserRepository {
        users: Arc<RwLock<Vec<User>>>,
        should_fail: Arc<RwLock<bool>>,
        reject_writes: Arc<RwLock<Option<DomainError>>>,
        reject_deletes: Arc<RwLock<Option<DomainError>>>,
        miss_deletes: Arc<RwLock<bool>>,
    }

    impl MockUserRepository {
        pub fn new() -> Self {
            Self::default()
        }

        /// Set whether every operation should fail with a storage error
        pub async fn set_should_fail(&self, fail: bool) {
            *self.should_fail.write().await = fail;
        }

        /// Make the next create/update fail with the given error
        pub async fn reject_next_write(&self, error: DomainError) {
            *self.reject_writes.write().await = Some(error);
        }

        /// Make the next delete fail with the given error
        pub async fn reject_next_delete(&self, error: DomainError) {
            *self.reject_deletes.write().await = Some(error);
        }

        /// Make the next delete find no record, as if another writer removed it first
        pub async fn miss_next_delete(&self) {
            *self.miss_deletes.write().await = true;
        }

        async fn check_should_fail(&self) -> Result<(), DomainError> {
            if *self.should_fail.read().await {
                return Err(DomainError::storage("Mock repository configured to fail"));
            }
            Ok(())
        }

        async fn check_rejected_write(&self) -> Result<(), DomainError> {
            match self.reject_writes.write().await.take() {
                Some(error) => Err(error),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl UserRepository for MockUserRepository {
        async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError> {
            self.check_should_fail().await?;
            let users = self.users.read().await;
            Ok(users.iter().find(|u| u.id() == id).cloned())
        }

        async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
            self.check_should_fail().await?;
            let key = fold_username(username);
            let users = self.users.read().await;
            Ok(users
                .iter()
                .find(|u| fold_username(u.username()) == key)
                .cloned())
        }

        async fn create(&self, user: NewUser) -> Result<User, DomainError> {
            self.check_should_fail().await?;
            self.check_rejected_write().await?;

            let user = User::from_new(UserId::generate(), user);
            self.users.write().await.push(user.clone());
            Ok(user)
        }

        async fn update(&self, user: &User) -> Result<User, DomainError> {
            self.check_should_fail().await?;
            self.check_rejected_write().await?;

            let mut users = self.users.write().await;
            match users.iter_mut().find(|u| u.id() == user.id()) {
                Some(existing) => {
                    *existing = user.clone();
                    Ok(user.clone())
                }
                None => Err(DomainError::not_found(format!(
                    "User '{}' not found",
                    user.id()
                ))),
            }
        }

        async fn delete(&self, id: &UserId) -> Result<bool, DomainError> {
            self.check_should_fail().await?;

            if let Some(error) = self.reject_deletes.write().await.take() {
                return Err(error);
            }

            if std::mem::take(&mut *self.miss_deletes.write().await) {
                return Ok(false);
            }

            let mut users = self.users.write().await;
            let before = users.len();
            users.retain(|u| u.id() != id);
            Ok(users.len() < before)
        }

        async fn list(&self) -> Result<Vec<User>, DomainError> {
            self.check_should_fail().await?;
            Ok(self.users.read().await.clone())
        }

        async fn count(&self) -> Result<usize, DomainError> {
            self.check_should_fail().await?;
            Ok(self.users.read().await.len())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn new_user(username: &str) -> NewUser {
            NewUser {
                username: username.to_string(),
                password_hash: "hashed_password".to_string(),
                roles: None,
            }
        }

        #[tokio::test]
        async fn test_create_and_get() {
            let repo = MockUserRepository::new();

            let user = repo.create(new_user("alice")).await.unwrap();

            let retrieved = repo.get(user.id()).await.unwrap();
            assert_eq!(retrieved.unwrap().username(), "alice");
        }

        #[tokio::test]
        async fn test_find_by_username_ignores_case() {
            let repo = MockUserRepository::new();
            repo.create(new_user("alice")).await.unwrap();

            assert!(repo.find_by_username("ALICE").await.unwrap().is_some());
        }

        #[tokio::test]
        async fn test_should_fail() {
            let repo = MockUserRepository::new();
            repo.set_should_fail(true).await;

            let result = repo.list().await;
            assert!(matches!(result, Err(DomainError::Storage { .. })));
        }

        #[tokio::test]
        async fn test_reject_next_write_is_one_shot() {
            let repo = MockUserRepository::new();
            repo.reject_next_write(DomainError::creation("rejected")).await;

            assert!(repo.create(new_user("alice")).await.is_err());
            assert!(repo.create(new_user("alice")).await.is_ok());
        }

        #[tokio::test]
        async fn test_delete_injections_are_one_shot() {
            let repo = MockUserRepository::new();
            let user = repo.create(new_user("alice")).await.unwrap();

            repo.reject_next_delete(DomainError::conflict("notes_user_id_fkey"))
                .await;
            let rejected = repo.delete(user.id()).await;
            assert!(matches!(rejected, Err(DomainError::Conflict { .. })));

            repo.miss_next_delete().await;
            assert!(!repo.delete(user.id()).await.unwrap());
            assert!(repo.get(user.id()).await.unwrap().is_some());

            assert!(repo.delete(user.id()).await.unwrap());
        }
    }
}
