//! Application state and composition.

use std::sync::Arc;

use crate::infrastructure::{
    ports::{ActorRepo, CastingRepo, ClockPort, InvoiceRepo, MovieRepo},
    sqlite::SqliteRepositories,
};
use crate::use_cases;
use crate::use_cases::management::{ActorCrud, CastingOps, InvoiceCrud, MovieCrud};

/// Main application state.
///
/// Holds all use cases. Passed to HTTP handlers via Axum state.
pub struct App {
    pub use_cases: UseCases,
}

/// Container for all use cases.
pub struct UseCases {
    pub management: use_cases::ManagementUseCases,
}

impl App {
    /// Create a new App with all dependencies wired up.
    ///
    /// Store ports are injected into the use cases as `Arc<dyn PortTrait>`.
    pub fn new(repos: SqliteRepositories, clock: Arc<dyn ClockPort>) -> Self {
        let actor_repo: Arc<dyn ActorRepo> = repos.actor;
        let movie_repo: Arc<dyn MovieRepo> = repos.movie;
        let casting_repo: Arc<dyn CastingRepo> = repos.casting;
        let invoice_repo: Arc<dyn InvoiceRepo> = repos.invoice;

        let management = use_cases::ManagementUseCases::new(
            ActorCrud::new(actor_repo.clone(), casting_repo.clone()),
            MovieCrud::new(movie_repo.clone(), casting_repo.clone()),
            CastingOps::new(actor_repo, movie_repo, casting_repo, clock),
            InvoiceCrud::new(invoice_repo),
        );

        Self {
            use_cases: UseCases { management },
        }
    }
}
