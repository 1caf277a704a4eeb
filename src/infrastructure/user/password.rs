//! Credential hashing
//!
//! Hashes are PHC strings (`$argon2id$v=19$m=...,t=...,p=...$salt$hash`), so
//! verification reads the cost parameters back from the stored value and
//! keeps working if the configured parameters change later.

use std::fmt::Debug;

use argon2::{
    password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::rngs::OsRng;

use crate::domain::DomainError;

/// One-way credential transform
pub trait PasswordHasher: Send + Sync + Debug {
    /// Hash with a fresh random salt; equal inputs give different outputs
    fn hash(&self, password: &str) -> Result<String, DomainError>;

    /// Whether `password` matches a hash produced by `hash`
    fn verify(&self, password: &str, hash: &str) -> bool;
}

/// Argon2id with fixed cost parameters
#[derive(Debug, Clone)]
pub struct Argon2Hasher {
    params: Params,
}

impl Default for Argon2Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Argon2Hasher {
    /// Hasher using the argon2 crate's recommended parameters
    pub fn new() -> Self {
        Self {
            params: Params::DEFAULT,
        }
    }

    /// Hasher with explicit memory (KiB), iteration and lane counts
    pub fn with_params(memory_kib: u32, iterations: u32, lanes: u32) -> Result<Self, DomainError> {
        let params = Params::new(memory_kib, iterations, lanes, None)
            .map_err(|e| DomainError::configuration(format!("Invalid Argon2 parameters: {}", e)))?;

        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, DomainError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| DomainError::internal(format!("Failed to hash password: {}", e)))
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(hash) else {
            return false;
        };

        self.argon2()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap_hasher() -> Argon2Hasher {
        Argon2Hasher::with_params(8, 1, 1).unwrap()
    }

    #[test]
    fn test_hash_is_phc_argon2id() {
        let hash = Argon2Hasher::new().hash("pw123").unwrap();

        assert_ne!(hash, "pw123");
        assert!(hash.starts_with("$argon2id$v=19$"));
    }

    #[test]
    fn test_verify_roundtrip() {
        let hasher = cheap_hasher();
        let hash = hasher.hash("pw123").unwrap();

        assert!(hasher.verify("pw123", &hash));
        assert!(!hasher.verify("pw456", &hash));
        assert!(!hasher.verify("PW123", &hash));
    }

    #[test]
    fn test_same_password_twice_gives_distinct_hashes() {
        let hasher = Argon2Hasher::new();

        let first = hasher.hash("pw123").unwrap();
        let second = hasher.hash("pw123").unwrap();

        assert_ne!(first, second);
        assert!(hasher.verify("pw123", &first));
        assert!(hasher.verify("pw123", &second));
    }

    #[test]
    fn test_verify_uses_parameters_stored_in_hash() {
        let hash = cheap_hasher().hash("pw123").unwrap();

        assert!(Argon2Hasher::new().verify("pw123", &hash));
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        let hasher = Argon2Hasher::new();

        assert!(!hasher.verify("pw123", "pw123"));
        assert!(!hasher.verify("pw123", ""));
    }

    #[test]
    fn test_invalid_params_are_configuration_errors() {
        let result = Argon2Hasher::with_params(0, 0, 0);
        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }
}
