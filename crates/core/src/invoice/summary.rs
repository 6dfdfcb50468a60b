//! Profit and cash totals.

use invoicer_shared::types::Money;

use super::types::{Invoice, PaymentType};

/// Totals over a set of invoices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InvoiceTotals {
    /// Sum of `(unit_price - unit_cost) * quantity` over every product.
    pub total_profit: Money,
    /// Sum of `unit_price * quantity` over products of cash invoices.
    pub total_cash: Money,
}

impl InvoiceTotals {
    /// Adds one invoice's products to the running totals.
    pub fn add_invoice(&mut self, invoice: &Invoice) {
        for product in &invoice.products {
            self.total_profit += product.profit();
            if invoice.payment_type == PaymentType::Cash {
                self.total_cash += product.revenue();
            }
        }
    }
}

/// Computes totals over `invoices`.
#[must_use]
pub fn summarize(invoices: &[Invoice]) -> InvoiceTotals {
    invoices.iter().fold(InvoiceTotals::default(), |mut totals, invoice| {
        totals.add_invoice(invoice);
        totals
    })
}
