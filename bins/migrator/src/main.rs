//! Database migration runner for Invoicer.
//!
//! Usage:
//!   migrator up      - Create the invoice and product tables
//!   migrator down    - Drop them again
//!   migrator status  - Show migration status
//!   migrator fresh   - Drop everything and re-run migrations
//!
//! Reads `DATABASE_URL` from the environment or `.env`.

use invoicer_db::migration::Migrator;
use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // The CLI installs its own tracing subscriber.
    cli::run_cli(Migrator).await;
}
