//! Invoice service errors.

use invoicer_shared::AppError;
use thiserror::Error;

use super::store::StoreError;

/// Errors that can occur during invoice operations.
#[derive(Debug, Error)]
pub enum InvoiceError {
    /// No invoice with this number exists.
    #[error("Invoice not found: {0}")]
    NotFound(String),

    /// An invoice with this number already exists.
    #[error("Invoice already exists: {0}")]
    AlreadyExists(String),

    /// Input failed a field rule.
    #[error("{0}")]
    Validation(String),

    /// The store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<InvoiceError> for AppError {
    fn from(err: InvoiceError) -> Self {
        match err {
            InvoiceError::NotFound(no) => Self::NotFound(format!("Invoice {no} not found")),
            InvoiceError::AlreadyExists(no) => {
                Self::Conflict(format!("Invoice {no} already exists"))
            }
            InvoiceError::Validation(msg) => Self::Validation(msg),
            InvoiceError::Store(StoreError::Conflict(msg)) => Self::Conflict(msg),
            InvoiceError::Store(StoreError::Database(msg)) => Self::Database(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maps_to_app_error_status() {
        let cases = [
            (InvoiceError::NotFound("INV1".into()), 404),
            (InvoiceError::AlreadyExists("INV1".into()), 409),
            (InvoiceError::Validation("bad".into()), 400),
            (InvoiceError::Store(StoreError::Conflict("dup".into())), 409),
            (InvoiceError::Store(StoreError::Database("down".into())), 500),
        ];

        for (err, status) in cases {
            assert_eq!(AppError::from(err).status_code(), status);
        }
    }
}
