//! Invoice and product records.

use chrono::{DateTime, NaiveDate, Utc};
use invoicer_shared::types::{Money, PageMeta, ProductId};
use serde::{Deserialize, Serialize};

use super::summary::InvoiceTotals;

/// How an invoice was paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentType {
    /// Paid in cash; counts towards the cash total.
    Cash,
    /// Paid on credit.
    Credit,
}

/// Error returned for anything other than `CASH` or `CREDIT`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid payment type: {0:?}")]
pub struct InvalidPaymentType(pub String);

impl PaymentType {
    /// Returns the canonical upper-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "CASH",
            Self::Credit => "CREDIT",
        }
    }
}

impl std::fmt::Display for PaymentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PaymentType {
    type Err = InvalidPaymentType;

    /// Case-insensitive; surrounding whitespace is not accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "CASH" => Ok(Self::Cash),
            "CREDIT" => Ok(Self::Credit),
            _ => Err(InvalidPaymentType(s.to_string())),
        }
    }
}

/// A not-yet-persisted invoice built from a spreadsheet row or a request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceDraft {
    /// Invoice number, unique within a batch and in the store.
    pub invoice_no: String,
    /// Invoice date.
    pub date: NaiveDate,
    /// Customer name.
    pub customer_name: String,
    /// Salesperson name.
    pub salesperson_name: String,
    /// Payment type.
    pub payment_type: PaymentType,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Sold products, in row order.
    pub products: Vec<ProductDraft>,
}

impl InvoiceDraft {
    /// Returns true once at least one product is attached.
    #[must_use]
    pub fn has_products(&self) -> bool {
        !self.products.is_empty()
    }
}

/// A not-yet-persisted product line, owned by its [`InvoiceDraft`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDraft {
    /// Parent invoice number.
    pub invoice_no: String,
    /// Item name.
    pub item_name: String,
    /// Units sold (at least one).
    pub quantity: i32,
    /// Cost of one unit.
    pub unit_cost: Money,
    /// Price of one unit.
    pub unit_price: Money,
}

/// A persisted invoice with its products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invoice {
    /// Invoice number (primary key).
    pub invoice_no: String,
    /// Invoice date.
    pub date: NaiveDate,
    /// Customer name.
    pub customer_name: String,
    /// Salesperson name.
    pub salesperson_name: String,
    /// Payment type.
    pub payment_type: PaymentType,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Sold products.
    pub products: Vec<Product>,
}

/// A persisted product line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    /// Generated identifier.
    pub id: ProductId,
    /// Parent invoice number.
    pub invoice_no: String,
    /// Item name.
    pub item_name: String,
    /// Units sold.
    pub quantity: i32,
    /// Cost of one unit.
    pub unit_cost: Money,
    /// Price of one unit.
    pub unit_price: Money,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// `(unit_price - unit_cost) * quantity`
    #[must_use]
    pub fn profit(&self) -> Money {
        (self.unit_price - self.unit_cost) * self.quantity
    }

    /// `unit_price * quantity`
    #[must_use]
    pub fn revenue(&self) -> Money {
        self.unit_price * self.quantity
    }
}

/// Invoice fields accepted by direct create and update.
///
/// The invoice number travels separately: in the body on create, in the
/// path on update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceInput {
    /// Invoice date.
    pub date: NaiveDate,
    /// Customer name.
    pub customer_name: String,
    /// Salesperson name.
    pub salesperson_name: String,
    /// Payment type.
    pub payment_type: PaymentType,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Products replacing any existing ones.
    pub products: Vec<ProductInput>,
}

/// A product line accepted by direct create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductInput {
    /// Item name.
    pub item_name: String,
    /// Units sold.
    pub quantity: i32,
    /// Cost of one unit.
    pub unit_cost: Money,
    /// Price of one unit.
    pub unit_price: Money,
}

impl InvoiceInput {
    /// Converts the input into a draft for the given invoice number.
    #[must_use]
    pub fn into_draft(self, invoice_no: String) -> InvoiceDraft {
        let products = self
            .products
            .into_iter()
            .map(|p| ProductDraft {
                invoice_no: invoice_no.clone(),
                item_name: p.item_name,
                quantity: p.quantity,
                unit_cost: p.unit_cost,
                unit_price: p.unit_price,
            })
            .collect();

        InvoiceDraft {
            invoice_no,
            date: self.date,
            customer_name: self.customer_name,
            salesperson_name: self.salesperson_name,
            payment_type: self.payment_type,
            notes: self.notes,
            products,
        }
    }
}

/// A page of invoices with totals and paging metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoicePage {
    /// Invoices on this page.
    pub invoices: Vec<Invoice>,
    /// Totals over the whole result set.
    pub totals: InvoiceTotals,
    /// Paging metadata.
    pub paging: PageMeta,
}
