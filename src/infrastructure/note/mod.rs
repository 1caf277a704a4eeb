//! Note infrastructure module

mod postgres_repository;
mod repository;

pub use postgres_repository::PostgresNoteRepository;
pub use repository::InMemoryNoteRepository;
