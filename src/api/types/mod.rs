//! Shared HTTP types

pub mod error;
pub mod json;

pub use error::{ApiError, MessageResponse};
pub use json::Json;
