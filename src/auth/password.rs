use argon2::{
    password_hash::{PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::error;

use crate::auth::error::AuthError;

/// A salted argon2 hash in PHC string form. Only [`hash`] produces one, so a
/// plaintext password can never reach the repo layer, and a value read back
/// from storage is never hashed a second time.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::Type)]
#[sqlx(transparent)]
pub struct PasswordHash(String);

impl PasswordHash {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Hash a plaintext password with a fresh random salt. The cost parameters
/// are the argon2 defaults, fixed at compile time.
pub fn hash(plain: &str) -> Result<PasswordHash, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            AuthError::BadHash(e.to_string())
        })?
        .to_string();
    Ok(PasswordHash(hash))
}

/// Constant-time comparison of a plaintext against a stored hash. A hash that
/// fails to parse is an error, never a mismatch.
pub fn matches(plain: &str, hash: &PasswordHash) -> Result<bool, AuthError> {
    let parsed = argon2::PasswordHash::new(hash.as_str()).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        AuthError::BadHash(e.to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let password = "Secur3P@ssw0rd!";
        let hash = hash(password).expect("hashing should succeed");
        assert!(matches(password, &hash).expect("verify should succeed"));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let password = "correct-horse-battery-staple";
        let hash = hash(password).expect("hashing should succeed");
        assert!(!matches("wrong-password", &hash).expect("verify should not error"));
    }

    #[test]
    fn verify_errors_on_malformed_hash() {
        let stored = PasswordHash("not-a-valid-hash".to_string());
        let err = matches("anything", &stored).unwrap_err();
        assert!(matches!(err, AuthError::BadHash(_)));
    }

    #[test]
    fn hash_never_equals_plaintext() {
        let password = "secret123";
        let hash = hash(password).expect("hashing should succeed");
        assert_ne!(hash.as_str(), password);
    }

    #[test]
    fn same_plaintext_hashes_differently() {
        let a = hash("secret123").expect("hashing should succeed");
        let b = hash("secret123").expect("hashing should succeed");
        // fresh salt per hash
        assert_ne!(a, b);
    }
}
