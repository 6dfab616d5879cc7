//! Bearer-token authentication for protected routes.
//!
//! Handlers declare an [`Identity`] parameter instead of touching headers:
//! the extractor reads `Authorization: Bearer <token>`, resolves the token
//! through the auth service, and hands the handler a fresh [`User`] record.

use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;

use crate::domain::{Error, User};
use crate::inbound::http::state::HttpState;

/// Authenticated actor resolved from the request's bearer token.
pub struct Identity(User);

impl Identity {
    /// The resolved user record.
    pub fn user(&self) -> &User {
        &self.0
    }

    /// Consume the extractor, yielding the user record.
    pub fn into_user(self) -> User {
        self.0
    }
}

fn bearer_token(req: &HttpRequest) -> Result<String, Error> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| Error::unauthorized("Not authorized, no token"))
}

impl FromRequest for Identity {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = bearer_token(req);
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        Box::pin(async move {
            let state = state.ok_or_else(|| Error::internal("HTTP state is not configured"))?;
            let user = state.auth.authenticate(&token?).await?;
            Ok(Identity(user))
        })
    }
}
