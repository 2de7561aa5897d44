//! Value objects: validated, immutable field types.

mod amount;
mod names;

pub use amount::{Amount, AMOUNT_SCALE};
pub use names::{
    ActorName, ContactName, Description, InvoiceNumber, MovieTitle, MAX_ACTOR_NAME_LENGTH,
    MAX_DESCRIPTION_LENGTH, MAX_INVOICE_FIELD_LENGTH, MAX_TITLE_LENGTH,
};
