//! In-memory user repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::user::{fold_username, NewUser, User, UserId, UserRepository};
use crate::domain::DomainError;

#[derive(Debug, Default)]
struct UserTable {
    /// Rows in insertion order
    rows: Vec<User>,
    /// Folded username -> user ID, the store-side uniqueness constraint
    username_index: HashMap<String, UserId>,
}

impl UserTable {
    fn position(&self, id: &UserId) -> Option<usize> {
        self.rows.iter().position(|u| u.id() == id)
    }
}

/// In-memory implementation of UserRepository
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    table: Arc<RwLock<UserTable>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let table = self.table.read().await;
        Ok(table.position(id).map(|i| table.rows[i].clone()))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let table = self.table.read().await;

        let user = table
            .username_index
            .get(&fold_username(username))
            .and_then(|id| table.position(id))
            .map(|i| table.rows[i].clone());

        Ok(user)
    }

    async fn create(&self, user: NewUser) -> Result<User, DomainError> {
        let mut table = self.table.write().await;
        let key = fold_username(&user.username);

        if table.username_index.contains_key(&key) {
            return Err(DomainError::conflict(format!(
                "Username '{}' already exists",
                user.username
            )));
        }

        let user = User::from_new(UserId::generate(), user);

        table.username_index.insert(key, user.id().clone());
        table.rows.push(user.clone());

        Ok(user)
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        let mut table = self.table.write().await;

        let index = table
            .position(user.id())
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", user.id())))?;

        let old_key = fold_username(table.rows[index].username());
        let new_key = fold_username(user.username());

        if old_key != new_key {
            if table.username_index.contains_key(&new_key) {
                return Err(DomainError::conflict(format!(
                    "Username '{}' already exists",
                    user.username()
                )));
            }

            table.username_index.remove(&old_key);
            table.username_index.insert(new_key, user.id().clone());
        }

        table.rows[index] = user.clone();

        Ok(user.clone())
    }

    async fn delete(&self, id: &UserId) -> Result<bool, DomainError> {
        let mut table = self.table.write().await;

        match table.position(id) {
            Some(index) => {
                let user = table.rows.remove(index);
                table.username_index.remove(&fold_username(user.username()));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list(&self) -> Result<Vec<User>, DomainError> {
        Ok(self.table.read().await.rows.clone())
    }

    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.table.read().await.rows.len())
    }
}
