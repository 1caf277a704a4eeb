//! PostgreSQL user repository implementation
//!
//! Usernames live in a column collated with `username_ci` (see the storage
//! migrations), so both the lookup in `find_by_username` and the
//! `users_username_key` unique constraint compare case-insensitively.

use async_trait::async_trait;
use sqlx::error::ErrorKind;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::domain::user::{NewUser, User, UserId, UserRepository};
use crate::domain::DomainError;

const USER_COLUMNS: &str = "id, username, password_hash, roles, active, created_at, updated_at";

/// PostgreSQL implementation of UserRepository
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let query = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);

        let row = sqlx::query(&query)
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get user: {}", e)))?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let query = format!(
            "SELECT {} FROM users WHERE username = $1 ORDER BY seq LIMIT 1",
            USER_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get user by username: {}", e)))?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn create(&self, user: NewUser) -> Result<User, DomainError> {
        // Without roles the column default applies.
        let row = match &user.roles {
            Some(roles) => {
                let query = format!(
                    "INSERT INTO users (username, password_hash, roles) VALUES ($1, $2, $3) RETURNING {}",
                    USER_COLUMNS
                );

                sqlx::query(&query)
                    .bind(&user.username)
                    .bind(&user.password_hash)
                    .bind(roles)
                    .fetch_one(&self.pool)
                    .await
            }
            None => {
                let query = format!(
                    "INSERT INTO users (username, password_hash) VALUES ($1, $2) RETURNING {}",
                    USER_COLUMNS
                );

                sqlx::query(&query)
                    .bind(&user.username)
                    .bind(&user.password_hash)
                    .fetch_one(&self.pool)
                    .await
            }
        }
        .map_err(|e| match database_error_kind(&e) {
            Some(ErrorKind::UniqueViolation) => {
                DomainError::conflict(format!("Username '{}' already exists", user.username))
            }
            Some(ErrorKind::NotNullViolation) | Some(ErrorKind::CheckViolation) => {
                DomainError::creation(format!("Invalid user data received: {}", e))
            }
            _ => DomainError::storage(format!("Failed to create user: {}", e)),
        })?;

        row_to_user(&row)
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET username = $2, password_hash = $3, roles = $4, active = $5, updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(user.id().as_str())
        .bind(user.username())
        .bind(user.password_hash())
        .bind(user.roles().to_vec())
        .bind(user.is_active())
        .bind(user.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| match database_error_kind(&e) {
            Some(ErrorKind::UniqueViolation) => {
                DomainError::conflict(format!("Username '{}' already exists", user.username()))
            }
            _ => DomainError::storage(format!("Failed to update user: {}", e)),
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "User '{}' not found",
                user.id()
            )));
        }

        Ok(user.clone())
    }

    async fn delete(&self, id: &UserId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| match database_error_kind(&e) {
                // notes.user_id is ON DELETE RESTRICT
                Some(ErrorKind::ForeignKeyViolation) => {
                    DomainError::conflict(format!("User '{}' has assigned notes", id))
                }
                _ => DomainError::storage(format!("Failed to delete user: {}", e)),
            })?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self) -> Result<Vec<User>, DomainError> {
        let query = format!("SELECT {} FROM users ORDER BY seq", USER_COLUMNS);

        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to list users: {}", e)))?;

        rows.iter().map(row_to_user).collect()
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count users: {}", e)))?;

        Ok(count as usize)
    }
}

fn database_error_kind(error: &sqlx::Error) -> Option<ErrorKind> {
    error.as_database_error().map(|e| e.kind())
}

fn row_to_user(row: &PgRow) -> Result<User, DomainError> {
    let decode = |e: sqlx::Error| DomainError::storage(format!("Failed to decode user row: {}", e));

    let id: String = row.try_get("id").map_err(decode)?;
    let user_id = UserId::new(id)
        .map_err(|e| DomainError::storage(format!("Invalid user ID in database: {}", e)))?;

    Ok(User::restore(
        user_id,
        row.try_get("username").map_err(decode)?,
        row.try_get("password_hash").map_err(decode)?,
        row.try_get("roles").map_err(decode)?,
        row.try_get("active").map_err(decode)?,
        row.try_get("created_at").map_err(decode)?,
        row.try_get("updated_at").map_err(decode)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_never_include_seq() {
        assert!(!USER_COLUMNS.contains("seq"));
        assert!(USER_COLUMNS.contains("password_hash"));
    }

    #[test]
    fn test_non_database_errors_have_no_kind() {
        assert!(database_error_kind(&sqlx::Error::RowNotFound).is_none());
        assert!(database_error_kind(&sqlx::Error::PoolTimedOut).is_none());
    }
}
