//! Repository port traits for record store access.
//!
//! Every method re-reads or writes the store directly; nothing is cached
//! between calls.

use async_trait::async_trait;
use castdb_domain::{Actor, ActorId, Invoice, InvoiceId, Movie, MovieActor, MovieId};

use super::error::RepoError;

// =============================================================================
// Cast and catalogue
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ActorRepo: Send + Sync {
    async fn list(&self) -> Result<Vec<Actor>, RepoError>;
    async fn get(&self, id: ActorId) -> Result<Option<Actor>, RepoError>;
    async fn exists(&self, id: ActorId) -> Result<bool, RepoError>;
    /// Insert a new actor. A duplicate name is a `ConstraintViolation`.
    async fn create(&self, actor: &Actor) -> Result<(), RepoError>;
    /// Replace the stored actor wholesale.
    ///
    /// With `expected_version` set, the write only applies when the stored
    /// version still matches. Zero rows written is a `Concurrency` error.
    async fn update(&self, actor: &Actor, expected_version: Option<i64>)
        -> Result<(), RepoError>;
    /// Remove the actor and every casting link that references it.
    async fn delete(&self, id: ActorId) -> Result<(), RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MovieRepo: Send + Sync {
    async fn list(&self) -> Result<Vec<Movie>, RepoError>;
    async fn get(&self, id: MovieId) -> Result<Option<Movie>, RepoError>;
    async fn exists(&self, id: MovieId) -> Result<bool, RepoError>;
    async fn create(&self, movie: &Movie) -> Result<(), RepoError>;
    async fn update(&self, movie: &Movie, expected_version: Option<i64>)
        -> Result<(), RepoError>;
    /// Remove the movie and every casting link that references it.
    async fn delete(&self, id: MovieId) -> Result<(), RepoError>;
}

/// Movie/actor links (the `MovieActors` join table).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CastingRepo: Send + Sync {
    async fn movies_for_actor(&self, actor_id: ActorId) -> Result<Vec<Movie>, RepoError>;
    async fn actors_for_movie(&self, movie_id: MovieId) -> Result<Vec<Actor>, RepoError>;
    async fn get_link(
        &self,
        actor_id: ActorId,
        movie_id: MovieId,
    ) -> Result<Option<MovieActor>, RepoError>;
    /// Insert a link. An existing link for the pair is a `ConstraintViolation`.
    async fn link(&self, link: &MovieActor) -> Result<(), RepoError>;
    /// Remove a link if present. Returns whether a row was removed.
    async fn unlink(&self, actor_id: ActorId, movie_id: MovieId) -> Result<bool, RepoError>;
}

// =============================================================================
// Billing
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InvoiceRepo: Send + Sync {
    async fn list(&self) -> Result<Vec<Invoice>, RepoError>;
    async fn get(&self, id: InvoiceId) -> Result<Option<Invoice>, RepoError>;
    async fn exists(&self, id: InvoiceId) -> Result<bool, RepoError>;
    /// Insert the invoice and its items atomically.
    async fn create(&self, invoice: &Invoice) -> Result<(), RepoError>;
    /// Replace the invoice header and its full item list atomically.
    async fn update(&self, invoice: &Invoice, expected_version: Option<i64>)
        -> Result<(), RepoError>;
    /// Remove the invoice; its items go with it.
    async fn delete(&self, id: InvoiceId) -> Result<(), RepoError>;
}
