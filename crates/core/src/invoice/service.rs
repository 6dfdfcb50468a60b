//! Invoice CRUD service.
//!
//! Validates input, checks existence inside a transaction, and maps store
//! outcomes onto [`InvoiceError`]. A store failure during the existence check
//! is reported as [`InvoiceError::Store`], never as "not found".

use std::sync::Arc;

use chrono::NaiveDate;
use invoicer_shared::types::{PageMeta, PageRequest};
use tracing::{info, warn};

use super::error::InvoiceError;
use super::store::{InvoiceStore, InvoiceTransaction};
use super::types::{Invoice, InvoiceInput, InvoicePage};
use super::validation::{validate_input, validate_invoice_no};

/// Invoice service generic over its store.
#[derive(Debug)]
pub struct InvoiceService<S> {
    store: Arc<S>,
}

impl<S> Clone for InvoiceService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: InvoiceStore> InvoiceService<S> {
    /// Creates a service over `store`.
    #[must_use]
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Lists invoices dated `date`, one page at a time, with totals over
    /// every invoice on that date.
    ///
    /// A zero page or size is replaced by its default (1 and 10).
    ///
    /// # Errors
    ///
    /// Returns [`InvoiceError::Store`] if the store fails.
    pub async fn list(
        &self,
        date: NaiveDate,
        page: PageRequest,
    ) -> Result<InvoicePage, InvoiceError> {
        let page = page.normalized();
        let (invoices, total) = self.store.find_by_date(date, page).await?;
        let totals = self.store.summary_by_date(date).await?;

        Ok(InvoicePage {
            invoices,
            totals,
            paging: PageMeta::new(page.page, page.size, total),
        })
    }

    /// Creates a new invoice with its products.
    ///
    /// # Errors
    ///
    /// - [`InvoiceError::Validation`] if a field rule fails
    /// - [`InvoiceError::AlreadyExists`] if the number is taken
    /// - [`InvoiceError::Store`] if the store fails
    pub async fn create(
        &self,
        invoice_no: String,
        input: InvoiceInput,
    ) -> Result<Invoice, InvoiceError> {
        validate_invoice_no(&invoice_no)?;
        validate_input(&input)?;

        let txn = self.store.begin().await?;
        if txn.find_by_invoice_no(&invoice_no).await?.is_some() {
            warn!(invoice_no = %invoice_no, "Invoice already exists");
            return Err(InvoiceError::AlreadyExists(invoice_no));
        }

        let invoice = txn.create(&input.into_draft(invoice_no)).await?;
        txn.commit().await?;

        info!(
            invoice_no = %invoice.invoice_no,
            product_count = invoice.products.len(),
            "Invoice created"
        );
        Ok(invoice)
    }

    /// Overwrites an invoice's fields and replaces all of its products.
    ///
    /// # Errors
    ///
    /// - [`InvoiceError::Validation`] if a field rule fails
    /// - [`InvoiceError::NotFound`] if no such invoice exists
    /// - [`InvoiceError::Store`] if the store fails
    pub async fn update(
        &self,
        invoice_no: &str,
        input: InvoiceInput,
    ) -> Result<Invoice, InvoiceError> {
        validate_input(&input)?;

        let txn = self.store.begin().await?;
        if txn.find_by_invoice_no(invoice_no).await?.is_none() {
            return Err(InvoiceError::NotFound(invoice_no.to_string()));
        }

        let invoice = txn.replace(&input.into_draft(invoice_no.to_string())).await?;
        txn.commit().await?;

        info!(invoice_no = %invoice_no, "Invoice updated");
        Ok(invoice)
    }

    /// Deletes an invoice and its products.
    ///
    /// # Errors
    ///
    /// - [`InvoiceError::NotFound`] if no such invoice exists
    /// - [`InvoiceError::Store`] if the store fails
    pub async fn delete(&self, invoice_no: &str) -> Result<(), InvoiceError> {
        let txn = self.store.begin().await?;
        if !txn.delete(invoice_no).await? {
            return Err(InvoiceError::NotFound(invoice_no.to_string()));
        }
        txn.commit().await?;

        info!(invoice_no = %invoice_no, "Invoice deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
