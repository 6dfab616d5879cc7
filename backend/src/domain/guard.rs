//! Authorization guard predicates.
//!
//! Pure checks over `(actor, resource, action)` evaluated by the lifecycle
//! services before any store mutation. A deny short-circuits the operation
//! entirely; there is no partial application.
//!
//! Status mapping follows the wire contract: role denials are `Forbidden`
//! (403), ownership denials are `Unauthorized` (401), and unverified-account
//! denials are `Forbidden` (403).

use crate::domain::error::Error;
use crate::domain::user::{Role, User, UserId};

/// Require the actor to hold exactly `role`.
pub fn require_role(actor: &User, role: Role) -> Result<(), Error> {
    if actor.role == role {
        Ok(())
    } else {
        Err(Error::forbidden(format!(
            "Not authorized as {}",
            role.denied_label()
        )))
    }
}

/// Require the actor to own the resource.
///
/// `message` is the denial text surfaced to the client; callers keep the
/// per-resource wording ("Not authorized", "Not authorized to delete this
/// job").
pub fn require_owner(actor: &User, owner: UserId, message: &str) -> Result<(), Error> {
    if actor.id == owner {
        Ok(())
    } else {
        Err(Error::unauthorized(message))
    }
}

/// Require the actor to own the resource, with an Institute Admin override.
///
/// Post deletion is the only operation carrying this override; job deletion
/// and event mutation use [`require_owner`].
pub fn require_owner_or_admin(actor: &User, owner: UserId, message: &str) -> Result<(), Error> {
    if actor.id == owner || actor.role == Role::InstituteAdmin {
        Ok(())
    } else {
        Err(Error::unauthorized(message))
    }
}

/// Require the actor's account to be verified.
///
/// Institute Admin and Super Admin accounts are exempt; they administer the
/// verification queue itself. Everyone else is held out of dashboard
/// operations until an Institute Admin flips their flag.
pub fn require_verified(actor: &User) -> Result<(), Error> {
    let exempt = matches!(actor.role, Role::InstituteAdmin | Role::SuperAdmin);
    if exempt || actor.is_verified {
        Ok(())
    } else {
        Err(Error::forbidden("Account pending verification"))
    }
}
