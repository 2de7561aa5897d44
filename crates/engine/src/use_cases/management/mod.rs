//! Management use cases for CRUD-style operations.
//!
//! These use cases keep HTTP handlers thin while coordinating the record
//! store ports. Every operation re-reads current state; nothing is cached.

use std::fmt::Display;
use std::future::Future;

use castdb_domain::DomainError;

use crate::infrastructure::ports::RepoError;

mod actor;
mod casting;
mod invoice;
mod movie;


pub use actor::{ActorCrud, ActorInput};
pub use casting::CastingOps;
pub use invoice::{InvoiceCrud, InvoiceInput, InvoiceItemInput};
pub use movie::{MovieCrud, MovieInput};

/// Shared error type for management use cases.
#[derive(Debug, thiserror::Error)]
pub enum ManagementError {
    /// A referenced identity is absent. The message names which one.
    #[error("{0}")]
    NotFound(String),
    /// The identity in the path differs from the identity in the body.
    #[error("Id in path ({path}) does not match id in body ({body})")]
    IdMismatch { path: String, body: String },
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// Uniqueness or duplicate-link violation.
    #[error("{0}")]
    Conflict(String),
    #[error("Repository error: {0}")]
    Repo(RepoError),
}

impl ManagementError {
    pub fn not_found(entity_type: &str, id: impl Display) -> Self {
        Self::NotFound(format!("{} with id {} not found.", entity_type, id))
    }

    pub fn id_mismatch(path: impl Display, body: impl Display) -> Self {
        Self::IdMismatch {
            path: path.to_string(),
            body: body.to_string(),
        }
    }
}

impl From<RepoError> for ManagementError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound { entity_type, id } => Self::not_found(entity_type, id),
            RepoError::ConstraintViolation(msg) => Self::Conflict(msg),
            other => Self::Repo(other),
        }
    }
}

impl From<DomainError> for ManagementError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) | DomainError::Parse(msg) => Self::InvalidInput(msg),
        }
    }
}

/// Resolve the outcome of a replace-by-identity write.
///
/// A concurrency failure triggers a fresh existence check: a record that is
/// gone becomes `NotFound`, a record that still exists is an unhandled race
/// and the original error propagates as `Repo`. It is never retried.
pub(crate) async fn settle_update<F>(
    entity_type: &'static str,
    id: impl Display,
    outcome: Result<(), RepoError>,
    still_exists: F,
) -> Result<(), ManagementError>
where
    F: Future<Output = Result<bool, RepoError>>,
{
    match outcome {
        Ok(()) => Ok(()),
        Err(err) if err.is_concurrency() => {
            if still_exists.await? {
                tracing::error!(
                    entity_type,
                    id = %id,
                    error = %err,
                    "Concurrent modification on an existing record, not recovering"
                );
                Err(ManagementError::Repo(err))
            } else {
                tracing::debug!(entity_type, id = %id, "Update raced a delete");
                Err(ManagementError::not_found(entity_type, id))
            }
        }
        Err(err) => Err(err.into()),
    }
}

/// Container for management use cases.
pub struct ManagementUseCases {
    pub actor: ActorCrud,
    pub movie: MovieCrud,
    pub casting: CastingOps,
    pub invoice: InvoiceCrud,
}

impl ManagementUseCases {
    pub fn new(actor: ActorCrud, movie: MovieCrud, casting: CastingOps, invoice: InvoiceCrud) -> Self {
        Self {
            actor,
            movie,
            casting,
            invoice,
        }
    }
}
