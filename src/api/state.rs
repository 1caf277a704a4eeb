//! Application state for shared services

use std::sync::Arc;

use crate::domain::note::NoteRepository;
use crate::domain::user::UserRepository;
use crate::domain::{DomainError, User};
use crate::infrastructure::user::{
    CreateUserRequest, ListUsersOutcome, PasswordHasher, UpdateUserRequest, UserService,
};

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServiceTrait>,
}

impl AppState {
    pub fn new(user_service: Arc<dyn UserServiceTrait>) -> Self {
        Self { user_service }
    }
}

/// Trait for user lifecycle operations
#[async_trait::async_trait]
pub trait UserServiceTrait: Send + Sync {
    async fn list_users(&self) -> Result<ListUsersOutcome, DomainError>;
    async fn count_users(&self) -> Result<usize, DomainError>;
    async fn create_user(&self, request: CreateUserRequest) -> Result<User, DomainError>;
    async fn update_user(&self, request: UpdateUserRequest) -> Result<User, DomainError>;
    async fn delete_user(&self, id: &str) -> Result<User, DomainError>;
}

#[async_trait::async_trait]
impl<R, N, H> UserServiceTrait for UserService<R, N, H>
where
    R: UserRepository + 'static,
    N: NoteRepository + 'static,
    H: PasswordHasher + 'static,
{
    async fn list_users(&self) -> Result<ListUsersOutcome, DomainError> {
        UserService::list_users(self).await
    }

    async fn count_users(&self) -> Result<usize, DomainError> {
        UserService::count_users(self).await
    }

    async fn create_user(&self, request: CreateUserRequest) -> Result<User, DomainError> {
        UserService::create_user(self, request).await
    }

    async fn update_user(&self, request: UpdateUserRequest) -> Result<User, DomainError> {
        UserService::update_user(self, request).await
    }

    async fn delete_user(&self, id: &str) -> Result<User, DomainError> {
        UserService::delete_user(self, id).await
    }
}
