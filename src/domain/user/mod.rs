//! User domain
//!
//! This module provides domain types and traits for user management,
//! including user entities, username collation, validation, and the
//! repository trait.

mod collation;
mod entity;
mod repository;
mod validation;

pub use collation::fold_username;
pub use entity::{NewUser, User, UserId};
pub use repository::UserRepository;
pub use validation::{
    validate_password, validate_roles, validate_user_id, validate_username, UserValidationError,
};

#[cfg(test)]
pub use repository::mock::MockUserRepository;
