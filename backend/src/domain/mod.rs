//! Domain primitives, aggregates, and the services that govern them.
//!
//! Purpose: Define strongly typed domain entities used by the API and
//! persistence layers, the authorization guards that protect them, and the
//! ports through which adapters reach them. Serialisation contracts (serde)
//! are documented in each type's Rustdoc.

pub mod auth;
pub mod error;
pub mod event;
pub mod guard;
pub mod job;
pub mod mentorship;
pub mod ports;
pub mod post;
pub mod services;
pub mod user;

pub use self::auth::{CredentialValidationError, Credentials};
pub use self::error::{Error, ErrorCode};
pub use self::user::{Profile, PublicUser, Role, User, UserId};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
