//! Invoice domain.
//!
//! This module implements:
//! - Invoice and product records (drafts and persisted forms)
//! - Input validation for direct create/update
//! - Profit and cash totals
//! - The store capability implemented by the db crate
//! - The CRUD service used by the HTTP layer

pub mod error;
pub mod service;
pub mod store;
pub mod summary;
pub mod types;
pub mod validation;

#[cfg(test)]
pub(crate) mod memory;
#[cfg(test)]
mod summary_props;

pub use error::InvoiceError;
pub use service::InvoiceService;
pub use store::{InvoiceStore, InvoiceTransaction, StoreError};
pub use summary::{InvoiceTotals, summarize};
pub use types::{
    Invoice, InvoiceDraft, InvoiceInput, InvoicePage, InvalidPaymentType, PaymentType, Product,
    ProductDraft, ProductInput,
};
pub use validation::{validate_input, validate_invoice_no};
