//! Core business logic for Invoicer.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here; persistence
//! is reached only through the store traits in [`invoice::store`].
//!
//! # Modules
//!
//! - `invoice` - Invoice records, validation, totals, and CRUD service
//! - `import` - Spreadsheet bulk import and batch reconciliation

pub mod import;
pub mod invoice;
