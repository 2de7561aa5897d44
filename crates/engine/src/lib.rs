//! castdb Engine library.
//!
//! CRUD HTTP API over a SQLite record store for actors, movies and invoices.
//!
//! ## Structure
//!
//! - `use_cases/` - Request orchestration over the store ports
//! - `infrastructure/` - Port traits and their SQLite/clock implementations
//! - `api/` - HTTP entry points
//! - `app` - Application composition

pub mod api;
pub mod app;
pub mod infrastructure;
pub mod use_cases;

pub use app::App;
