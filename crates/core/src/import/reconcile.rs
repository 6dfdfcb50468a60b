//! Batch reconciliation: joins the invoice and product sheets into a set of
//! invoice drafts and collects every row rejection.
//!
//! Passes run in a fixed order so the error list is deterministic:
//! 1. invoice rows, top to bottom (including the duplicate check)
//! 2. product rows, top to bottom
//! 3. accepted invoices without products, in acceptance order

use indexmap::IndexMap;
use invoicer_shared::ImportConfig;
use tracing::{debug, warn};

use super::error::{ImportError, ImportFailure, RowProblem};
use super::rows::{
    DATE_COLUMN, HEADER_ROWS, check_invoice_row, check_product_row, sheet_row_number,
};
use super::workbook::{CellRef, SheetReader};
use crate::invoice::{InvoiceDraft, InvoiceStore, ProductDraft};

/// Names of the two sheets an import reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetLayout {
    /// One row per invoice.
    pub invoice_sheet: String,
    /// One row per sold product.
    pub product_sheet: String,
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self::from(&ImportConfig::default())
    }
}

impl From<&ImportConfig> for SheetLayout {
    fn from(config: &ImportConfig) -> Self {
        Self {
            invoice_sheet: config.invoice_sheet.clone(),
            product_sheet: config.product_sheet.clone(),
        }
    }
}

/// Accepted invoice drafts keyed by invoice number, in acceptance order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvoiceBatch {
    drafts: IndexMap<String, InvoiceDraft>,
}

impl InvoiceBatch {
    /// Creates an empty batch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `invoice_no` was accepted.
    #[must_use]
    pub fn contains(&self, invoice_no: &str) -> bool {
        self.drafts.contains_key(invoice_no)
    }

    /// Looks up an accepted draft.
    #[must_use]
    pub fn get(&self, invoice_no: &str) -> Option<&InvoiceDraft> {
        self.drafts.get(invoice_no)
    }

    /// Adds a draft. Returns false (and keeps the first) if the number is
    /// already in the batch.
    pub fn insert(&mut self, draft: InvoiceDraft) -> bool {
        if self.contains(&draft.invoice_no) {
            return false;
        }
        self.drafts.insert(draft.invoice_no.clone(), draft);
        true
    }

    /// Attaches a product to its invoice. Returns false if the invoice is
    /// not in the batch.
    pub fn attach(&mut self, product: ProductDraft) -> bool {
        match self.drafts.get_mut(&product.invoice_no) {
            Some(draft) => {
                draft.products.push(product);
                true
            }
            None => false,
        }
    }

    /// Number of accepted invoices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.drafts.len()
    }

    /// Returns true if nothing was accepted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.drafts.is_empty()
    }

    /// Accepted invoice numbers, in acceptance order.
    #[must_use]
    pub fn invoice_nos(&self) -> Vec<String> {
        self.drafts.keys().cloned().collect()
    }

    /// Accepted drafts, in acceptance order.
    pub fn drafts(&self) -> impl Iterator<Item = &InvoiceDraft> {
        self.drafts.values()
    }
}

/// Result of reconciling a workbook.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    /// Accepted invoices with their products.
    pub batch: InvoiceBatch,
    /// Every rejected row, in pass order.
    pub errors: Vec<ImportError>,
}

impl Reconciliation {
    /// Returns true if no row was rejected.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    fn reject(&mut self, error: ImportError) {
        warn!(
            invoice_no = %error.invoice_no,
            problem = %error.problem,
            "Import row rejected"
        );
        self.errors.push(error);
    }
}

/// Reads both sheets and reconciles them against `store`.
///
/// Row problems are collected in the returned [`Reconciliation`]; only a
/// workbook read failure or a store lookup failure aborts.
///
/// # Errors
///
/// Returns [`ImportFailure`] if a sheet is missing or the store fails.
pub async fn reconcile<S, R>(
    store: &S,
    workbook: &R,
    layout: &SheetLayout,
) -> Result<Reconciliation, ImportFailure>
where
    S: InvoiceStore,
    R: SheetReader,
{
    let invoice_rows = workbook.rows(&layout.invoice_sheet)?;
    let product_rows = workbook.rows(&layout.product_sheet)?;

    let mut result = Reconciliation::default();
    scan_invoice_rows(store, workbook, layout, &invoice_rows, &mut result).await?;
    scan_product_rows(&product_rows, &mut result);
    reject_empty_invoices(&mut result);

    debug!(
        accepted = result.batch.len(),
        rejected = result.errors.len(),
        "Workbook reconciled"
    );
    Ok(result)
}

async fn scan_invoice_rows<S, R>(
    store: &S,
    workbook: &R,
    layout: &SheetLayout,
    rows: &[Vec<String>],
    result: &mut Reconciliation,
) -> Result<(), ImportFailure>
where
    S: InvoiceStore,
    R: SheetReader,
{
    for (index, row) in rows.iter().enumerate().skip(HEADER_ROWS) {
        let row_number = sheet_row_number(index);
        let date_cell = workbook.cell(
            &layout.invoice_sheet,
            CellRef::new(DATE_COLUMN, row_number),
        )?;

        let draft = match check_invoice_row(row, row_number, date_cell.as_deref()) {
            Ok(draft) => draft,
            Err(e) => {
                result.reject(e);
                continue;
            }
        };

        if result.batch.contains(&draft.invoice_no)
            || store.find_by_invoice_no(&draft.invoice_no).await?.is_some()
        {
            result.reject(ImportError::new(
                draft.invoice_no,
                RowProblem::DuplicateInvoice,
            ));
            continue;
        }

        result.batch.insert(draft);
    }
    Ok(())
}

fn scan_product_rows(rows: &[Vec<String>], result: &mut Reconciliation) {
    for (index, row) in rows.iter().enumerate().skip(HEADER_ROWS) {
        match check_product_row(row, sheet_row_number(index), &result.batch) {
            Ok(product) => {
                result.batch.attach(product);
            }
            Err(e) => result.reject(e),
        }
    }
}

fn reject_empty_invoices(result: &mut Reconciliation) {
    let empty: Vec<String> = result
        .batch
        .drafts()
        .filter(|d| !d.has_products())
        .map(|d| d.invoice_no.clone())
        .collect();

    for invoice_no in empty {
        result.reject(ImportError::new(invoice_no, RowProblem::NoProducts));
    }
}

#[cfg(test)]
#[path = "reconcile_tests.rs"]
mod tests;
