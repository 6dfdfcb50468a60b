//! Import problems: per-row rejections and whole-import failures.

use invoicer_shared::AppError;
use serde::{Serialize, Serializer};
use thiserror::Error;

use super::workbook::WorkbookError;
use crate::invoice::StoreError;

/// Why a single spreadsheet row was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum RowProblem {
    /// Invoice row has fewer than five cells.
    #[error("Missing invoice fields")]
    MissingInvoiceFields,

    /// Payment type is neither CASH nor CREDIT.
    #[error("Invalid payment type")]
    InvalidPaymentType,

    /// Date cell matched no layout.
    #[error("Invalid date format")]
    InvalidDate,

    /// Invoice number, customer or salesperson is blank.
    #[error("Required invoice fields are missing")]
    RequiredInvoiceFieldsMissing,

    /// Invoice number already stored, or repeated in the batch.
    #[error("Duplicate invoice")]
    DuplicateInvoice,

    /// Product row has fewer than five cells.
    #[error("Missing product fields")]
    MissingProductFields,

    /// Product names an invoice that is not in the batch.
    #[error("Product refers to unknown invoice")]
    UnknownInvoice,

    /// Quantity, cost or price is not a valid value.
    #[error("Invalid product values")]
    InvalidProductValues,

    /// Invoice ended up with no products.
    #[error("No valid products for this invoice")]
    NoProducts,
}

/// One rejected row.
///
/// `invoice_no` holds the invoice number, or `row N` when the row was too
/// short to carry one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportError {
    /// Invoice number or row locator.
    pub invoice_no: String,
    /// What went wrong.
    #[serde(rename = "message", serialize_with = "serialize_problem")]
    pub problem: RowProblem,
}

fn serialize_problem<S: Serializer>(problem: &RowProblem, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(problem)
}

impl ImportError {
    /// Rejection keyed by invoice number.
    #[must_use]
    pub fn new(invoice_no: impl Into<String>, problem: RowProblem) -> Self {
        Self {
            invoice_no: invoice_no.into(),
            problem,
        }
    }

    /// Rejection keyed by sheet row number.
    #[must_use]
    pub fn at_row(row_number: u32, problem: RowProblem) -> Self {
        Self::new(format!("row {row_number}"), problem)
    }

    /// Human-readable message.
    #[must_use]
    pub fn message(&self) -> String {
        self.problem.to_string()
    }
}

impl std::fmt::Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.invoice_no, self.problem)
    }
}

/// Failures that abort the whole import.
#[derive(Debug, Error)]
pub enum ImportFailure {
    /// The workbook could not be read.
    #[error(transparent)]
    Workbook(#[from] WorkbookError),

    /// The store failed during lookup or persistence.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ImportFailure {
    /// Short label for the failing side, used in logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Workbook(_) => "workbook",
            Self::Store(_) => "store",
        }
    }
}

impl From<ImportFailure> for AppError {
    fn from(err: ImportFailure) -> Self {
        match err {
            ImportFailure::Workbook(e) => Self::Validation(e.to_string()),
            ImportFailure::Store(StoreError::Conflict(msg)) => Self::Conflict(msg),
            ImportFailure::Store(StoreError::Database(msg)) => Self::Database(msg),
        }
    }
}
