//! PostgreSQL note repository implementation

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::domain::note::{Note, NoteId, NoteRepository};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// PostgreSQL implementation of NoteRepository
#[derive(Debug, Clone)]
pub struct PostgresNoteRepository {
    pool: PgPool,
}

impl PostgresNoteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NoteRepository for PostgresNoteRepository {
    async fn find_one_by_owner(&self, owner: &UserId) -> Result<Option<Note>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, title, text, completed, created_at, updated_at
            FROM notes
            WHERE user_id = $1
            ORDER BY created_at
            LIMIT 1
            "#,
        )
        .bind(owner.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to find note by owner: {}", e)))?;

        row.as_ref().map(row_to_note).transpose()
    }
}

fn row_to_note(row: &PgRow) -> Result<Note, DomainError> {
    let decode = |e: sqlx::Error| DomainError::storage(format!("Failed to decode note row: {}", e));

    let id: String = row.try_get("id").map_err(decode)?;
    let user_id: String = row.try_get("user_id").map_err(decode)?;
    let owner = UserId::new(user_id)
        .map_err(|e| DomainError::storage(format!("Invalid user ID in database: {}", e)))?;

    Ok(Note::restore(
        NoteId::new(id),
        owner,
        row.try_get("title").map_err(decode)?,
        row.try_get("text").map_err(decode)?,
        row.try_get("completed").map_err(decode)?,
        row.try_get("created_at").map_err(decode)?,
        row.try_get("updated_at").map_err(decode)?,
    ))
}
