//! Port abstraction for password hashing and verification.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Failures raised by password hashing adapters.
    pub enum PasswordHashError {
        /// The password could not be hashed.
        Hash => "password hashing failed: {message}",
        /// The stored hash could not be parsed.
        InvalidHash => "stored password hash is invalid: {message}",
    }
}

/// Hashes passwords at registration and checks them at login.
///
/// Verification distinguishes a mismatch (`Ok(false)`) from a corrupt
/// stored hash (`Err`).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password for storage.
    async fn hash(&self, password: &str) -> Result<String, PasswordHashError>;

    /// Check a plaintext password against a stored hash.
    async fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHashError>;
}
