//! MongoDB persistence adapters.
//!
//! Each repository is a thin translator between domain aggregates and the
//! BSON documents stored in its collection. Set mutations (likes, attendees,
//! mentorship status, verification flags) are expressed as single-document
//! update operators so they are atomic at the store.
//!
//! Document structs are internal implementation details. The [`User`]
//! aggregate skips its password hash when serialised, so the user adapter
//! keeps a full document type of its own rather than persisting the domain
//! type directly.
//!
//! [`User`]: crate::domain::user::User

use mongodb::error::ErrorKind;
use mongodb::{Client, Database};

mod mongo_event_repository;
mod mongo_job_repository;
mod mongo_mentorship_repository;
mod mongo_post_repository;
mod mongo_user_repository;

pub use mongo_event_repository::MongoEventRepository;
pub use mongo_job_repository::MongoJobRepository;
pub use mongo_mentorship_repository::MongoMentorshipRepository;
pub use mongo_post_repository::MongoPostRepository;
pub use mongo_user_repository::MongoUserRepository;

const DUPLICATE_KEY_CODE: i32 = 11000;

/// Connect to the deployment at `uri` and return a handle on `database`.
///
/// The driver connects lazily; the ping forces an immediate round trip so a
/// bad URI fails at startup rather than on the first request.
pub async fn connect(uri: &str, database: &str) -> Result<Database, mongodb::error::Error> {
    let client = Client::with_uri_str(uri).await?;
    let database = client.database(database);
    database
        .run_command(mongodb::bson::doc! { "ping": 1 })
        .await?;
    Ok(database)
}

/// Whether `error` indicates the deployment could not be reached, as opposed
/// to a query that reached the server and failed.
pub(crate) fn is_connection_error(error: &mongodb::error::Error) -> bool {
    matches!(
        &*error.kind,
        ErrorKind::ServerSelection { .. }
            | ErrorKind::Io(_)
            | ErrorKind::DnsResolve { .. }
            | ErrorKind::ConnectionPoolCleared { .. }
            | ErrorKind::Authentication { .. }
    )
}

/// Whether `error` is a unique index violation.
pub(crate) fn is_duplicate_key(error: &mongodb::error::Error) -> bool {
    match &*error.kind {
        ErrorKind::Write(mongodb::error::WriteFailure::WriteError(write)) => {
            write.code == DUPLICATE_KEY_CODE
        }
        _ => false,
    }
}
