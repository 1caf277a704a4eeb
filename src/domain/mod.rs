//! Domain layer - Core business rules and entities

pub mod error;
pub mod note;
pub mod user;

pub use error::DomainError;
pub use note::{Note, NoteId, NoteRepository};
pub use user::{NewUser, User, UserId, UserRepository};
