//! JWT-backed implementation of the bearer token port.
//!
//! Tokens are HS256-signed with the user id in the `sub` claim. Expiry is
//! enforced on verification by `jsonwebtoken`'s default validation.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::domain::ports::{TokenError, TokenService};
use crate::domain::user::UserId;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
}

/// Issues and verifies HS256-signed bearer tokens.
#[derive(Clone)]
pub struct JwtTokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl JwtTokenService {
    /// Create a service signing with `secret`; issued tokens expire after
    /// `ttl_secs` seconds.
    pub fn new(secret: &[u8], ttl_secs: u64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl: Duration::seconds(ttl_secs as i64),
        }
    }
}

#[async_trait]
impl TokenService for JwtTokenService {
    async fn issue(&self, user: UserId) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|err| TokenError::issue(err.to_string()))
    }

    async fn verify(&self, token: &str) -> Result<UserId, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())
            .map_err(|err| TokenError::verify(err.to_string()))?;
        data.claims
            .sub
            .parse()
            .map_err(|_| TokenError::verify("subject is not a valid user id"))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    #[tokio::test]
    async fn issued_tokens_verify_to_the_same_user() {
        let service = JwtTokenService::new(b"test-secret", 3600);
        let user = UserId::random();

        let token = service.issue(user).await.expect("issuance succeeds");
        let verified = service.verify(&token).await.expect("verification succeeds");
        assert_eq!(verified, user);
    }

    #[tokio::test]
    async fn tokens_signed_with_another_key_are_rejected() {
        let issuer = JwtTokenService::new(b"key-one", 3600);
        let verifier = JwtTokenService::new(b"key-two", 3600);

        let token = issuer.issue(UserId::random()).await.expect("issuance succeeds");
        let err = verifier
            .verify(&token)
            .await
            .expect_err("cross-key verification fails");
        assert!(matches!(err, TokenError::Verify { .. }));
    }

    #[tokio::test]
    async fn expired_tokens_are_rejected() {
        let service = JwtTokenService::new(b"test-secret", 3600);
        let issued_at = Utc::now() - Duration::hours(3);
        let claims = Claims {
            sub: UserId::random().to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + Duration::hours(1)).timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .expect("encoding succeeds");

        let err = service.verify(&token).await.expect_err("expired token fails");
        assert!(matches!(err, TokenError::Verify { .. }));
    }

    #[tokio::test]
    async fn garbage_tokens_are_rejected() {
        let service = JwtTokenService::new(b"test-secret", 3600);
        let err = service
            .verify("definitely.not.a-jwt")
            .await
            .expect_err("malformed token fails");
        assert!(matches!(err, TokenError::Verify { .. }));
    }
}
