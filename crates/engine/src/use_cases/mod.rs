//! Use cases - User story orchestration.
//!
//! Use cases coordinate the record store ports to fulfill each request.

pub mod management;

pub use management::ManagementUseCases;
