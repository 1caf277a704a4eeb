//! Note domain
//!
//! Notes belong to users. The user lifecycle only reads them to keep
//! owners from being deleted.

mod entity;
mod repository;

pub use entity::{Note, NoteId};
pub use repository::NoteRepository;

#[cfg(test)]
pub use repository::MockNoteRepository;
