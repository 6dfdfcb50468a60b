//! Row-level checks for the invoice and product sheets.
//!
//! Invoice row columns: `A` invoice number, `B` date, `C` customer,
//! `D` salesperson, `E` payment type, `F` notes (optional).
//!
//! Product row columns: `A` invoice number, `B` item name, `C` quantity,
//! `D` unit cost, `E` unit price.

use invoicer_shared::types::Money;

use super::date::parse_date;
use super::error::{ImportError, RowProblem};
use super::reconcile::InvoiceBatch;
use crate::invoice::validation::{
    MAX_INVOICE_NO_LEN, MAX_NAME_LEN, MIN_ITEM_NAME_LEN, MIN_NAME_LEN, MIN_NOTES_LEN,
    has_length_within, is_storable_amount,
};
use crate::invoice::{InvoiceDraft, PaymentType, ProductDraft};

/// Rows at the top of each sheet that hold column titles.
pub const HEADER_ROWS: usize = 1;

/// Column holding the invoice date (`B`), read as its own cell.
pub const DATE_COLUMN: u32 = 1;

/// Cells a row needs before it is looked at.
pub const MIN_CELLS: usize = 5;

const NOTES_COLUMN: usize = 5;

/// Sheet row number of the row at `index` in [`super::SheetReader::rows`] output.
#[must_use]
pub fn sheet_row_number(index: usize) -> u32 {
    u32::try_from(index + 1).unwrap_or(u32::MAX)
}

/// Checks one invoice row and turns it into a draft without products.
///
/// `date_cell` is the text of the date cell on the same row.
///
/// Checks run in order and the first failure is returned: cell count,
/// payment type, date, then required fields. A required field fails when it
/// is blank or breaks the length rules of direct create, and short notes
/// fail the same way. Duplicate detection is left to the caller.
///
/// # Errors
///
/// Returns the [`ImportError`] describing the first failed check.
pub fn check_invoice_row(
    row: &[String],
    row_number: u32,
    date_cell: Option<&str>,
) -> Result<InvoiceDraft, ImportError> {
    if row.len() < MIN_CELLS {
        return Err(ImportError::at_row(
            row_number,
            RowProblem::MissingInvoiceFields,
        ));
    }

    let invoice_no = row[0].trim();
    let reject = |problem| ImportError::new(invoice_no, problem);

    let payment_type: PaymentType = row[4]
        .trim()
        .parse()
        .map_err(|_| reject(RowProblem::InvalidPaymentType))?;

    let date = parse_date(date_cell.unwrap_or_default())
        .map_err(|_| reject(RowProblem::InvalidDate))?;

    let customer_name = row[2].trim();
    let salesperson_name = row[3].trim();
    let notes = row
        .get(NOTES_COLUMN)
        .map(|n| n.trim())
        .filter(|n| !n.is_empty());

    let fields_ok = has_length_within(invoice_no, 1, MAX_INVOICE_NO_LEN)
        && has_length_within(customer_name, MIN_NAME_LEN, MAX_NAME_LEN)
        && has_length_within(salesperson_name, MIN_NAME_LEN, MAX_NAME_LEN)
        && notes.is_none_or(|n| n.chars().count() >= MIN_NOTES_LEN);
    if !fields_ok {
        return Err(reject(RowProblem::RequiredInvoiceFieldsMissing));
    }

    Ok(InvoiceDraft {
        invoice_no: invoice_no.to_string(),
        date,
        customer_name: customer_name.to_string(),
        salesperson_name: salesperson_name.to_string(),
        payment_type,
        notes: notes.map(str::to_string),
        products: Vec::new(),
    })
}

/// Checks one product row against the invoices already accepted in `batch`.
///
/// # Errors
///
/// Returns the [`ImportError`] describing the first failed check: cell
/// count, unknown invoice, then item name and quantity/cost/price values.
/// Amounts must be non-negative and storable without rounding.
pub fn check_product_row(
    row: &[String],
    row_number: u32,
    batch: &InvoiceBatch,
) -> Result<ProductDraft, ImportError> {
    if row.len() < MIN_CELLS {
        return Err(ImportError::at_row(
            row_number,
            RowProblem::MissingProductFields,
        ));
    }

    let invoice_no = row[0].trim();
    if !batch.contains(invoice_no) {
        return Err(ImportError::new(invoice_no, RowProblem::UnknownInvoice));
    }

    let invalid = || ImportError::new(invoice_no, RowProblem::InvalidProductValues);
    let item_name = row[1].trim();
    if !has_length_within(item_name, MIN_ITEM_NAME_LEN, MAX_NAME_LEN) {
        return Err(invalid());
    }

    let quantity: i32 = row[2].trim().parse().map_err(|_| invalid())?;
    let unit_cost = Money::parse(&row[3]).map_err(|_| invalid())?;
    let unit_price = Money::parse(&row[4]).map_err(|_| invalid())?;
    let amounts_ok = [unit_cost, unit_price]
        .into_iter()
        .all(|amount| !amount.is_negative() && is_storable_amount(amount));
    if quantity < 1 || !amounts_ok {
        return Err(invalid());
    }

    Ok(ProductDraft {
        invoice_no: invoice_no.to_string(),
        item_name: item_name.to_string(),
        quantity,
        unit_cost,
        unit_price,
    })
}
