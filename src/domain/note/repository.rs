//! Note ownership repository trait

use async_trait::async_trait;

use super::entity::Note;
use crate::domain::error::DomainError;
use crate::domain::user::UserId;

#[cfg(test)]
use mockall::automock;

/// Repository for notes, as far as user ownership is concerned
#[cfg_attr(test, automock)]
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// Finds any one note owned by the given user
    async fn find_one_by_owner(&self, owner: &UserId) -> Result<Option<Note>, DomainError>;
}
