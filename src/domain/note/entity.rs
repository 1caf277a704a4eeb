//! Note entity

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::user::UserId;

/// Note identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NoteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A note assigned to a user
#[derive(Debug, Clone, Serialize)]
pub struct Note {
    id: NoteId,
    /// Owning user; a user cannot be deleted while this reference exists
    user: UserId,
    title: String,
    text: String,
    completed: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Note {
    /// Create an open note owned by `user`
    pub fn new(user: UserId, title: impl Into<String>, text: impl Into<String>) -> Self {
        let now = Utc::now();

        Self {
            id: NoteId::generate(),
            user,
            title: title.into(),
            text: text.into(),
            completed: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild a note exactly as it was stored
    pub fn restore(
        id: NoteId,
        user: UserId,
        title: String,
        text: String,
        completed: bool,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user,
            title,
            text,
            completed,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> &NoteId {
        &self.id
    }

    pub fn user(&self) -> &UserId {
        &self.user
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
