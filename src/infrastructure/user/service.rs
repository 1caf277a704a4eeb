//! User lifecycle service: listing, creation, update and deletion

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::note::NoteRepository;
use crate::domain::user::{
    validate_password, validate_roles, validate_username, NewUser, User, UserId, UserRepository,
};
use crate::domain::DomainError;

use super::password::PasswordHasher;

const ALL_FIELDS_REQUIRED: &str = "All fields are required";
const USER_EXISTS: &str = "User already exists";
const USERNAME_TAKEN: &str = "Username already taken";
const USER_NOT_FOUND: &str = "User not found";
const USER_ID_REQUIRED: &str = "User ID required";
const USER_HAS_NOTES: &str = "User has assigned notes";
const INVALID_USER_DATA: &str = "Invalid user data received";

/// Request for creating a new user
#[derive(Debug, Clone, Default)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    /// Only a non-empty list is stored; otherwise the user gets no roles
    pub roles: Option<Vec<String>>,
}

/// Request for replacing a user's mutable fields
#[derive(Debug, Clone, Default)]
pub struct UpdateUserRequest {
    pub id: String,
    pub username: String,
    /// Replaces the credential when present and non-empty
    pub password: Option<String>,
    pub roles: Vec<String>,
    pub active: bool,
}

/// Result of listing users
///
/// An empty store is reported as its own variant so the caller decides
/// whether that is an empty page or a "no users" response.
#[derive(Debug, Clone)]
pub enum ListUsersOutcome {
    Found(Vec<User>),
    NoUsers,
}

impl ListUsersOutcome {
    /// Collapse the outcome into a plain list
    pub fn into_users(self) -> Vec<User> {
        match self {
            Self::Found(users) => users,
            Self::NoUsers => Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::NoUsers)
    }
}

/// User lifecycle manager
///
/// Holds no state of its own; the stores and hasher are injected.
pub struct UserService<R: UserRepository, N: NoteRepository, H: PasswordHasher> {
    users: Arc<R>,
    notes: Arc<N>,
    hasher: Arc<H>,
}

impl<R, N, H> UserService<R, N, H>
where
    R: UserRepository,
    N: NoteRepository,
    H: PasswordHasher + 'static,
{
    pub fn new(users: Arc<R>, notes: Arc<N>, hasher: Arc<H>) -> Self {
        Self {
            users,
            notes,
            hasher,
        }
    }

    /// List all users in store order
    pub async fn list_users(&self) -> Result<ListUsersOutcome, DomainError> {
        let users = self.users.list().await?;

        if users.is_empty() {
            debug!("No users found");
            return Ok(ListUsersOutcome::NoUsers);
        }

        Ok(ListUsersOutcome::Found(users))
    }

    /// Count stored users
    pub async fn count_users(&self) -> Result<usize, DomainError> {
        self.users.count().await
    }

    /// Create a user with a hashed password
    pub async fn create_user(&self, request: CreateUserRequest) -> Result<User, DomainError> {
        if validate_username(&request.username).is_err()
            || validate_password(&request.password).is_err()
        {
            return Err(DomainError::validation(ALL_FIELDS_REQUIRED));
        }

        let roles = request.roles.filter(|roles| !roles.is_empty());

        if let Some(roles) = &roles {
            validate_roles(roles).map_err(|e| DomainError::validation(e.to_string()))?;
        }

        if self.users.find_by_username(&request.username).await?.is_some() {
            debug!(username = %request.username, "Rejected duplicate username on create");
            return Err(DomainError::conflict(USER_EXISTS));
        }

        let password_hash = self.hash_password(request.password).await?;

        let new_user = NewUser {
            username: request.username,
            password_hash,
            roles,
        };

        // The store re-checks uniqueness; a concurrent create that passed the
        // lookup above lands here as a conflict.
        let user = self.users.create(new_user).await.map_err(|e| match e {
            DomainError::Conflict { .. } => DomainError::conflict(USER_EXISTS),
            DomainError::Creation { message } => {
                warn!(error = %message, "Store rejected new user");
                DomainError::creation(INVALID_USER_DATA)
            }
            other => other,
        })?;

        info!(user_id = %user.id(), username = %user.username(), "User created");

        Ok(user)
    }

    /// Replace a user's username, roles, active flag and optionally password
    pub async fn update_user(&self, request: UpdateUserRequest) -> Result<User, DomainError> {
        if request.id.is_empty()
            || validate_username(&request.username).is_err()
            || validate_roles(&request.roles).is_err()
        {
            return Err(DomainError::validation(ALL_FIELDS_REQUIRED));
        }

        let user_id = UserId::new(request.id)
            .map_err(|e| DomainError::validation(format!("Invalid user ID: {}", e)))?;

        let mut user = self
            .users
            .get(&user_id)
            .await?
            .ok_or_else(|| DomainError::not_found(USER_NOT_FOUND))?;

        if let Some(existing) = self.users.find_by_username(&request.username).await? {
            if existing.id() != user.id() {
                debug!(
                    user_id = %user.id(),
                    username = %request.username,
                    "Rejected username taken by another user"
                );
                return Err(DomainError::conflict(USERNAME_TAKEN));
            }
        }

        let new_password_hash = match request.password.filter(|p| !p.is_empty()) {
            Some(password) => Some(self.hash_password(password).await?),
            None => None,
        };

        user.set_username(request.username);
        user.set_roles(request.roles);
        user.set_active(request.active);

        if let Some(hash) = new_password_hash {
            user.set_password_hash(hash);
        }

        let updated = self.users.update(&user).await.map_err(|e| match e {
            DomainError::Conflict { .. } => DomainError::conflict(USERNAME_TAKEN),
            DomainError::NotFound { .. } => DomainError::not_found(USER_NOT_FOUND),
            other => other,
        })?;

        info!(user_id = %updated.id(), username = %updated.username(), "User updated");

        Ok(updated)
    }

    /// Delete a user that owns no notes, returning the removed record
    pub async fn delete_user(&self, id: &str) -> Result<User, DomainError> {
        if id.is_empty() {
            return Err(DomainError::validation(USER_ID_REQUIRED));
        }

        let user_id = UserId::new(id)
            .map_err(|e| DomainError::validation(format!("Invalid user ID: {}", e)))?;

        if self.notes.find_one_by_owner(&user_id).await?.is_some() {
            debug!(user_id = %user_id, "Rejected delete of user with notes");
            return Err(DomainError::conflict(USER_HAS_NOTES));
        }

        let user = self
            .users
            .get(&user_id)
            .await?
            .ok_or_else(|| DomainError::not_found(USER_NOT_FOUND))?;

        let deleted = self.users.delete(&user_id).await.map_err(|e| match e {
            DomainError::Conflict { .. } => DomainError::conflict(USER_HAS_NOTES),
            other => other,
        })?;

        if !deleted {
            return Err(DomainError::not_found(USER_NOT_FOUND));
        }

        info!(user_id = %user.id(), username = %user.username(), "User deleted");

        Ok(user)
    }

    /// Argon2 is CPU-bound, so it runs off the async workers.
    async fn hash_password(&self, password: String) -> Result<String, DomainError> {
        let hasher = Arc::clone(&self.hasher);

        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| DomainError::internal(format!("Password hashing task failed: {}", e)))?
    }
}
