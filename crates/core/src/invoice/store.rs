//! Persistence capability required by the invoice and import services.
//!
//! The db crate provides the PostgreSQL implementation; unit tests use an
//! in-memory one.

use std::future::Future;

use chrono::NaiveDate;
use invoicer_shared::types::PageRequest;
use thiserror::Error;

use super::summary::InvoiceTotals;
use super::types::{Invoice, InvoiceDraft};

/// Errors reported by an invoice store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A record with the same key already exists.
    #[error("Conflicting record: {0}")]
    Conflict(String),

    /// Any other storage failure.
    #[error("Database error: {0}")]
    Database(String),
}

/// Read access to persisted invoices plus the ability to open a transaction.
pub trait InvoiceStore: Send + Sync {
    /// Transaction type returned by [`InvoiceStore::begin`].
    type Transaction: InvoiceTransaction;

    /// Finds an invoice (with products) by number.
    fn find_by_invoice_no(
        &self,
        invoice_no: &str,
    ) -> impl Future<Output = Result<Option<Invoice>, StoreError>> + Send;

    /// Finds the given invoices (with products), newest date first.
    ///
    /// Unknown numbers are skipped.
    fn find_by_invoice_nos(
        &self,
        invoice_nos: &[String],
    ) -> impl Future<Output = Result<Vec<Invoice>, StoreError>> + Send;

    /// Returns one page of invoices dated `date`, newest first, and the
    /// total number of invoices on that date.
    fn find_by_date(
        &self,
        date: NaiveDate,
        page: PageRequest,
    ) -> impl Future<Output = Result<(Vec<Invoice>, u64), StoreError>> + Send;

    /// Profit and cash totals over every invoice dated `date`.
    fn summary_by_date(
        &self,
        date: NaiveDate,
    ) -> impl Future<Output = Result<InvoiceTotals, StoreError>> + Send;

    /// Opens a transaction. Dropping it without commit discards its writes.
    fn begin(&self) -> impl Future<Output = Result<Self::Transaction, StoreError>> + Send;
}

/// Writes that become visible together on [`InvoiceTransaction::commit`].
pub trait InvoiceTransaction: Send + Sync {
    /// Finds an invoice as seen from inside the transaction.
    fn find_by_invoice_no(
        &self,
        invoice_no: &str,
    ) -> impl Future<Output = Result<Option<Invoice>, StoreError>> + Send;

    /// Inserts an invoice and its products.
    ///
    /// Returns [`StoreError::Conflict`] when the number is taken.
    fn create(
        &self,
        draft: &InvoiceDraft,
    ) -> impl Future<Output = Result<Invoice, StoreError>> + Send;

    /// Overwrites an existing invoice's fields and replaces all of its products.
    fn replace(
        &self,
        draft: &InvoiceDraft,
    ) -> impl Future<Output = Result<Invoice, StoreError>> + Send;

    /// Deletes an invoice and its products. Returns false if it did not exist.
    fn delete(&self, invoice_no: &str) -> impl Future<Output = Result<bool, StoreError>> + Send;

    /// Makes every write in the transaction visible.
    fn commit(self) -> impl Future<Output = Result<(), StoreError>> + Send;
}
