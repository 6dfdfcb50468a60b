//! Property-based tests for invoice totals.

use chrono::{NaiveDate, Utc};
use invoicer_shared::types::{Money, ProductId};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::summary::summarize;
use super::types::{Invoice, PaymentType, Product};

/// Strategy for a non-negative amount with two decimal places.
fn amount() -> impl Strategy<Value = Money> {
    (0i64..10_000_000i64).prop_map(|cents| Money::new(Decimal::new(cents, 2)))
}

fn payment_type() -> impl Strategy<Value = PaymentType> {
    prop_oneof![Just(PaymentType::Cash), Just(PaymentType::Credit)]
}

fn line() -> impl Strategy<Value = Line> {
    (1i32..1_000, amount(), amount())
}

type Line = (i32, Money, Money);

fn build_invoice(payment_type: PaymentType, lines: &[Line]) -> Invoice {
    let now = Utc::now();
    Invoice {
        invoice_no: "INV".into(),
        date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap_or_default(),
        customer_name: "Alice".into(),
        salesperson_name: "Bob".into(),
        payment_type,
        notes: None,
        created_at: now,
        updated_at: now,
        products: lines
            .iter()
            .map(|&(quantity, unit_cost, unit_price)| Product {
                id: ProductId::new(),
                invoice_no: "INV".into(),
                item_name: "Widget".into(),
                quantity,
                unit_cost,
                unit_price,
                created_at: now,
                updated_at: now,
            })
            .collect(),
    }
}

fn invoice_lines() -> impl Strategy<Value = (PaymentType, Vec<Line>)> {
    (payment_type(), prop::collection::vec(line(), 1..5))
}

fn invoice() -> impl Strategy<Value = Invoice> {
    invoice_lines().prop_map(|(payment_type, lines)| build_invoice(payment_type, &lines))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Totals of a concatenation equal the sum of the parts' totals.
    #[test]
    fn prop_summarize_is_additive(
        left in prop::collection::vec(invoice(), 0..5),
        right in prop::collection::vec(invoice(), 0..5),
    ) {
        let a = summarize(&left);
        let b = summarize(&right);
        let all: Vec<Invoice> = left.into_iter().chain(right).collect();
        let total = summarize(&all);

        prop_assert_eq!(total.total_profit, a.total_profit + b.total_profit);
        prop_assert_eq!(total.total_cash, a.total_cash + b.total_cash);
    }

    /// Credit-only invoices never contribute cash.
    #[test]
    fn prop_credit_invoices_have_zero_cash(
        mut invoices in prop::collection::vec(invoice(), 0..5),
    ) {
        for invoice in &mut invoices {
            invoice.payment_type = PaymentType::Credit;
        }

        prop_assert!(summarize(&invoices).total_cash.is_zero());
    }

    /// Cash never exceeds the sum of all revenues and is never negative.
    #[test]
    fn prop_cash_bounded_by_revenue(invoices in prop::collection::vec(invoice(), 0..5)) {
        let revenue: Money = invoices
            .iter()
            .flat_map(|i| i.products.iter())
            .map(Product::revenue)
            .sum();
        let cash = summarize(&invoices).total_cash;

        prop_assert!(!cash.is_negative());
        prop_assert!(cash <= revenue);
    }

    /// Totals equal a per-line sum computed straight from the raw amounts.
    #[test]
    fn prop_summarize_matches_line_sums(
        batches in prop::collection::vec(invoice_lines(), 0..5),
    ) {
        let mut profit = Decimal::ZERO;
        let mut cash = Decimal::ZERO;
        for (payment_type, lines) in &batches {
            for (quantity, cost, price) in lines {
                let qty = Decimal::from(*quantity);
                profit += (price.amount() - cost.amount()) * qty;
                if *payment_type == PaymentType::Cash {
                    cash += price.amount() * qty;
                }
            }
        }

        let invoices: Vec<Invoice> = batches
            .iter()
            .map(|(payment_type, lines)| build_invoice(*payment_type, lines))
            .collect();
        let totals = summarize(&invoices);

        prop_assert_eq!(totals.total_profit.amount(), profit);
        prop_assert_eq!(totals.total_cash.amount(), cash);
    }
}
