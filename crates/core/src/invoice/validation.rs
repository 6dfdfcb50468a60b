//! Field rules for direct create and update.

use invoicer_shared::types::Money;
use rust_decimal::Decimal;

use super::error::InvoiceError;
use super::types::{InvoiceInput, ProductInput};

/// Maximum invoice number length, in characters.
pub const MAX_INVOICE_NO_LEN: usize = 50;
/// Minimum customer and salesperson name length.
pub const MIN_NAME_LEN: usize = 2;
/// Maximum name length for customers, salespeople and items.
pub const MAX_NAME_LEN: usize = 255;
/// Minimum notes length when notes are given.
pub const MIN_NOTES_LEN: usize = 5;
/// Minimum item name length.
pub const MIN_ITEM_NAME_LEN: usize = 5;
/// Decimal places a stored cost or price may carry.
pub const MAX_AMOUNT_SCALE: u32 = 2;
/// Integer digits a stored cost or price may carry.
const MAX_AMOUNT_DIGITS: u32 = 10;

/// Whether `amount` fits the `NUMERIC(12, 2)` cost and price columns
/// without rounding or overflow.
#[must_use]
pub fn is_storable_amount(amount: Money) -> bool {
    let value = amount.amount().normalize();
    value.scale() <= MAX_AMOUNT_SCALE
        && value.abs() < Decimal::from(10_i64.pow(MAX_AMOUNT_DIGITS))
}

/// Whether `value` has between `min` and `max` characters, inclusive.
#[must_use]
pub fn has_length_within(value: &str, min: usize, max: usize) -> bool {
    (min..=max).contains(&value.chars().count())
}

/// Validates an invoice number.
///
/// # Errors
///
/// Returns [`InvoiceError::Validation`] if the number is empty or too long.
pub fn validate_invoice_no(invoice_no: &str) -> Result<(), InvoiceError> {
    if invoice_no.trim().is_empty() {
        return Err(InvoiceError::Validation("invoice_no is required".into()));
    }
    if invoice_no.chars().count() > MAX_INVOICE_NO_LEN {
        return Err(InvoiceError::Validation(format!(
            "invoice_no must be at most {MAX_INVOICE_NO_LEN} characters"
        )));
    }
    Ok(())
}

/// Validates invoice fields and every product line.
///
/// # Errors
///
/// Returns [`InvoiceError::Validation`] naming the first field that breaks a rule.
pub fn validate_input(input: &InvoiceInput) -> Result<(), InvoiceError> {
    check_length("customer_name", &input.customer_name, MIN_NAME_LEN, MAX_NAME_LEN)?;
    check_length(
        "salesperson_name",
        &input.salesperson_name,
        MIN_NAME_LEN,
        MAX_NAME_LEN,
    )?;

    if let Some(notes) = &input.notes
        && notes.chars().count() < MIN_NOTES_LEN
    {
        return Err(InvoiceError::Validation(format!(
            "notes must be at least {MIN_NOTES_LEN} characters"
        )));
    }

    if input.products.is_empty() {
        return Err(InvoiceError::Validation(
            "products must contain at least one item".into(),
        ));
    }

    input.products.iter().try_for_each(validate_product)
}

fn validate_product(product: &ProductInput) -> Result<(), InvoiceError> {
    check_length(
        "item_name",
        &product.item_name,
        MIN_ITEM_NAME_LEN,
        MAX_NAME_LEN,
    )?;

    if product.quantity < 1 {
        return Err(InvoiceError::Validation(
            "quantity must be at least 1".into(),
        ));
    }
    if product.unit_cost.is_negative() {
        return Err(InvoiceError::Validation(
            "total_cost_of_goods_sold must not be negative".into(),
        ));
    }
    if product.unit_price.is_negative() {
        return Err(InvoiceError::Validation(
            "total_price_sold must not be negative".into(),
        ));
    }
    if !is_storable_amount(product.unit_cost) || !is_storable_amount(product.unit_price) {
        return Err(InvoiceError::Validation(format!(
            "amounts must have at most {MAX_AMOUNT_SCALE} decimal places and {MAX_AMOUNT_DIGITS} integer digits"
        )));
    }
    Ok(())
}

fn check_length(field: &str, value: &str, min: usize, max: usize) -> Result<(), InvoiceError> {
    if !has_length_within(value, min, max) {
        return Err(InvoiceError::Validation(format!(
            "{field} must be between {min} and {max} characters"
        )));
    }
    Ok(())
}
