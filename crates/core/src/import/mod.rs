//! Spreadsheet bulk import.
//!
//! A workbook holds an invoice sheet and a product sheet. Rows are checked,
//! joined by invoice number and reconciled against the store; the batch is
//! then written all-or-nothing.

pub mod date;
pub mod error;
pub mod reconcile;
pub mod rows;
pub mod service;
pub mod workbook;

#[cfg(test)]
mod date_props;

pub use date::{DATE_LAYOUTS, DateLayout, SERIAL_EPOCH, UnrecognizedDateFormat, parse_date};
pub use error::{ImportError, ImportFailure, RowProblem};
pub use reconcile::{InvoiceBatch, Reconciliation, SheetLayout, reconcile};
pub use rows::{check_invoice_row, check_product_row};
pub use service::{ImportOutcome, ImportService};
pub use workbook::{CellRef, MemoryWorkbook, SheetReader, WorkbookError, XlsxWorkbook};
