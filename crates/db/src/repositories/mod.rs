//! Repository abstractions for data access.
//!
//! Repositories implement the core store traits, hiding the `SeaORM`
//! implementation details from the rest of the application.

pub mod invoice;

pub use invoice::{InvoiceRepository, InvoiceRepositoryTxn};
