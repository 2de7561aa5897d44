//! castdb domain: the entity model shared by every layer of the engine.
//!
//! - `entities` - Actor, Movie, MovieActor (the casting link), Invoice
//! - `value_objects` - validated names and money amounts
//! - `ids` - typed UUID identities

pub mod entities;
pub mod error;
pub mod ids;
pub mod value_objects;

pub use entities::{
    Actor, ActorWithMovies, Invoice, InvoiceItem, InvoiceStatus, Movie, MovieActor,
    MovieWithActors,
};

pub use error::DomainError;

pub use ids::{ActorId, InvoiceId, InvoiceItemId, MovieId};

pub use value_objects::{
    ActorName, Amount, ContactName, Description, InvoiceNumber, MovieTitle,
};
