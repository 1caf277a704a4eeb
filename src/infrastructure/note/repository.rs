//! In-memory note repository implementation

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::note::{Note, NoteRepository};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// In-memory implementation of NoteRepository
#[derive(Debug, Default)]
pub struct InMemoryNoteRepository {
    notes: Arc<RwLock<Vec<Note>>>,
}

impl InMemoryNoteRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a note owned by an existing user
    #[cfg(test)]
    pub async fn insert(&self, note: Note) {
        self.notes.write().await.push(note);
    }
}

#[async_trait]
impl NoteRepository for InMemoryNoteRepository {
    async fn find_one_by_owner(&self, owner: &UserId) -> Result<Option<Note>, DomainError> {
        let notes = self.notes.read().await;
        Ok(notes.iter().find(|n| n.user() == owner).cloned())
    }
}
