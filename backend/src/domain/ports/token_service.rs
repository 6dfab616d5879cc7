//! Port abstraction for bearer token issuance and verification.

use async_trait::async_trait;

use crate::domain::user::UserId;

use super::define_port_error;

define_port_error! {
    /// Failures raised by token service adapters.
    pub enum TokenError {
        /// Token could not be signed.
        Issue => "token issuance failed: {message}",
        /// Token was missing, malformed, expired, or signed with another key.
        Verify => "token verification failed: {message}",
    }
}

/// Issues and verifies the bearer tokens carried by API clients.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenService: Send + Sync {
    /// Issue a signed token identifying `user`.
    async fn issue(&self, user: UserId) -> Result<String, TokenError>;

    /// Verify a token and return the user it identifies.
    async fn verify(&self, token: &str) -> Result<UserId, TokenError>;
}
