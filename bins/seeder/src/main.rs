//! Database seeder for Invoicer development and testing.
//!
//! Seeds a handful of cash and credit invoices dated today and yesterday so
//! the listing endpoint has something to page through.
//!
//! Usage: cargo run --bin seeder

use std::str::FromStr;
use std::sync::Arc;

use anyhow::Context;
use chrono::{Days, NaiveDate, Utc};
use invoicer_core::invoice::{
    InvoiceError, InvoiceInput, InvoiceService, PaymentType, ProductInput,
};
use invoicer_db::InvoiceRepository;
use invoicer_shared::AppConfig;
use invoicer_shared::types::Money;
use rust_decimal::Decimal;

/// (invoice no, days before today, customer, salesperson, payment type)
const INVOICES: [(&str, u64, &str, &str, PaymentType); 6] = [
    ("SEED-0001", 0, "Acme Corp", "Dana", PaymentType::Cash),
    ("SEED-0002", 0, "Globex", "Dana", PaymentType::Credit),
    ("SEED-0003", 0, "Initech", "Eli", PaymentType::Cash),
    ("SEED-0004", 1, "Umbrella", "Eli", PaymentType::Cash),
    ("SEED-0005", 1, "Hooli", "Dana", PaymentType::Credit),
    ("SEED-0006", 1, "Stark Industries", "Eli", PaymentType::Cash),
];

/// (item name, quantity, unit cost, unit price)
const PRODUCTS: [(&str, i32, &str, &str); 3] = [
    ("Standing desk", 1, "180.00", "249.99"),
    ("Monitor arm", 2, "35.50", "59.00"),
    ("Desk lamp", 3, "12.25", "19.90"),
];

fn money(raw: &str) -> anyhow::Result<Money> {
    Ok(Money::new(Decimal::from_str(raw)?))
}

/// Builds the seed invoice at `index`, giving each one a different slice of
/// the product catalogue.
fn seed_input(
    index: usize,
    date: NaiveDate,
    customer: &str,
    salesperson: &str,
    payment_type: PaymentType,
) -> anyhow::Result<InvoiceInput> {
    let products = PRODUCTS
        .iter()
        .take(index % PRODUCTS.len() + 1)
        .map(|(item_name, quantity, cost, price)| {
            Ok(ProductInput {
                item_name: (*item_name).to_string(),
                quantity: *quantity,
                unit_cost: money(cost)?,
                unit_price: money(price)?,
            })
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(InvoiceInput {
        date,
        customer_name: customer.to_string(),
        salesperson_name: salesperson.to_string(),
        payment_type,
        notes: Some("Seeded for local development".to_string()),
        products,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    println!("Connecting to database...");
    let db = invoicer_db::connect(&config.database)
        .await
        .context("Failed to connect to database")?;
    let service = InvoiceService::new(Arc::new(InvoiceRepository::new(db)));

    let today = Utc::now().date_naive();
    let mut inserted = 0;

    println!("Seeding invoices...");
    for (index, (invoice_no, days_ago, customer, salesperson, payment_type)) in
        INVOICES.into_iter().enumerate()
    {
        let date = today
            .checked_sub_days(Days::new(days_ago))
            .context("Seed date out of range")?;
        let input = seed_input(index, date, customer, salesperson, payment_type)?;

        match service.create(invoice_no.to_string(), input).await {
            Ok(invoice) => {
                inserted += 1;
                println!(
                    "  Created {} ({} products, {})",
                    invoice.invoice_no,
                    invoice.products.len(),
                    invoice.date
                );
            }
            Err(InvoiceError::AlreadyExists(_)) => {
                println!("  {invoice_no} already exists, skipping...");
            }
            Err(e) => eprintln!("Failed to insert {invoice_no}: {e}"),
        }
    }

    println!("Seeding complete! Inserted {inserted} invoices");
    Ok(())
}
