//! Domain entities.

mod actor;
mod invoice;
mod movie;

pub use actor::{Actor, ActorWithMovies};
pub use invoice::{Invoice, InvoiceItem, InvoiceStatus, MAX_ITEM_NAME_LENGTH};
pub use movie::{Movie, MovieActor, MovieWithActors};
