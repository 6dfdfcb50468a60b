//! Invoices and products tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(ENUMS_SQL).await?;
        db.execute_unprepared(INVOICES_SQL).await?;
        db.execute_unprepared(PRODUCTS_SQL).await?;
        db.execute_unprepared(TRIGGERS_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

const ENUMS_SQL: &str = r"
CREATE TYPE payment_enum AS ENUM ('CASH', 'CREDIT');
";

const INVOICES_SQL: &str = r"
CREATE TABLE invoices (
    invoice_no VARCHAR(50) PRIMARY KEY,
    date DATE NOT NULL,
    customer_name VARCHAR(255) NOT NULL,
    salesperson_name VARCHAR(255) NOT NULL,
    payment_type payment_enum NOT NULL,
    notes TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_invoices_customer_name CHECK (char_length(customer_name) >= 2),
    CONSTRAINT chk_invoices_salesperson_name CHECK (char_length(salesperson_name) >= 2),
    CONSTRAINT chk_invoices_notes CHECK (notes IS NULL OR char_length(notes) >= 5)
);

-- Listing filters by date and orders newest first
CREATE INDEX idx_invoices_date ON invoices(date, created_at DESC);
";

const PRODUCTS_SQL: &str = r"
CREATE TABLE products (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    invoice_no VARCHAR(50) NOT NULL REFERENCES invoices(invoice_no) ON DELETE CASCADE,
    item_name VARCHAR(255) NOT NULL,
    quantity INTEGER NOT NULL,
    total_cost NUMERIC(12, 2) NOT NULL,
    total_price NUMERIC(12, 2) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_products_item_name CHECK (char_length(item_name) >= 5),
    CONSTRAINT chk_products_quantity CHECK (quantity >= 1),
    CONSTRAINT chk_products_total_cost CHECK (total_cost >= 0),
    CONSTRAINT chk_products_total_price CHECK (total_price >= 0)
);

CREATE INDEX idx_products_invoice ON products(invoice_no);
";

const TRIGGERS_SQL: &str = r"
CREATE OR REPLACE FUNCTION set_updated_at()
RETURNS TRIGGER AS $$
BEGIN
    NEW.updated_at = now();
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_invoices_updated_at
    BEFORE UPDATE ON invoices
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_products_updated_at
    BEFORE UPDATE ON products
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS products CASCADE;
DROP TABLE IF EXISTS invoices CASCADE;
DROP FUNCTION IF EXISTS set_updated_at() CASCADE;
DROP TYPE IF EXISTS payment_enum;
";
