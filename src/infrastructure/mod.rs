//! Infrastructure layer - storage, hashing, logging and metrics

pub mod logging;
pub mod note;
pub mod observability;
pub mod storage;
pub mod user;
