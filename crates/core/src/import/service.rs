//! Import service: reconcile, then persist all-or-nothing.

use std::sync::Arc;

use invoicer_shared::types::PageMeta;
use tracing::{error, info, warn};

use super::error::{ImportError, ImportFailure};
use super::reconcile::{InvoiceBatch, SheetLayout, reconcile};
use super::workbook::SheetReader;
use crate::invoice::{InvoicePage, InvoiceStore, InvoiceTransaction, summarize};

/// How an import ended.
#[derive(Debug)]
pub enum ImportOutcome {
    /// Every row was valid and the batch is stored.
    Persisted(InvoicePage),
    /// At least one row was rejected; nothing was stored.
    Reported(Vec<ImportError>),
    /// The workbook or the store failed; nothing was stored.
    Fatal(ImportFailure),
}

impl ImportOutcome {
    /// Returns true if the batch was stored.
    #[must_use]
    pub const fn is_persisted(&self) -> bool {
        matches!(self, Self::Persisted(_))
    }
}

/// Bulk import of invoices from a workbook.
#[derive(Debug)]
pub struct ImportService<S> {
    store: Arc<S>,
    layout: SheetLayout,
}

impl<S> Clone for ImportService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            layout: self.layout.clone(),
        }
    }
}

impl<S: InvoiceStore> ImportService<S> {
    /// Creates a service reading the sheets named in `layout`.
    #[must_use]
    pub const fn new(store: Arc<S>, layout: SheetLayout) -> Self {
        Self { store, layout }
    }

    /// Imports every invoice in `workbook`, or none of them.
    ///
    /// Rows are reconciled against the store first. If any row is rejected
    /// the full error list is returned and nothing is written. Otherwise all
    /// invoices and products are inserted in one transaction, re-read, and
    /// returned as a single page with totals.
    pub async fn import<R: SheetReader>(&self, workbook: &R) -> ImportOutcome {
        let reconciliation = match reconcile(self.store.as_ref(), workbook, &self.layout).await {
            Ok(r) => r,
            Err(e) => {
                error!(failure = e.kind(), error = %e, "Import aborted during reconciliation");
                return ImportOutcome::Fatal(e);
            }
        };

        if !reconciliation.is_clean() {
            warn!(
                error_count = reconciliation.errors.len(),
                "Import rejected"
            );
            return ImportOutcome::Reported(reconciliation.errors);
        }

        match self.persist(&reconciliation.batch).await {
            Ok(page) => ImportOutcome::Persisted(page),
            Err(e) => {
                error!(failure = e.kind(), error = %e, "Import aborted while persisting");
                ImportOutcome::Fatal(e)
            }
        }
    }

    async fn persist(&self, batch: &InvoiceBatch) -> Result<InvoicePage, ImportFailure> {
        let txn = self.store.begin().await?;
        for draft in batch.drafts() {
            txn.create(draft).await?;
        }
        txn.commit().await?;

        let invoice_nos = batch.invoice_nos();
        info!(invoice_count = invoice_nos.len(), "Import committed");

        let invoices = self.store.find_by_invoice_nos(&invoice_nos).await?;
        let totals = summarize(&invoices);

        Ok(InvoicePage {
            paging: PageMeta::single_page(invoices.len()),
            invoices,
            totals,
        })
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
