//! Invoice repository: `SeaORM` implementation of the core invoice store.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use invoicer_core::invoice::{
    Invoice, InvoiceDraft, InvoiceStore, InvoiceTotals, InvoiceTransaction, Product, StoreError,
};
use invoicer_shared::types::{Money, PageRequest, ProductId};
use rust_decimal::Decimal;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    DbErr, EntityTrait, FromQueryResult, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    Set, SqlErr, Statement, TransactionTrait,
};
use tracing::debug;
use uuid::Uuid;

use crate::entities::{invoices, products};

/// Maps a database error onto the store's error kinds.
pub(crate) fn store_error(err: DbErr) -> StoreError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg)) => StoreError::Conflict(msg),
        _ => StoreError::Database(err.to_string()),
    }
}

/// Invoice repository backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    db: DatabaseConnection,
}

impl InvoiceRepository {
    /// Creates a new invoice repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// An open database transaction over invoices.
///
/// Dropping it without [`InvoiceTransaction::commit`] rolls back.
#[derive(Debug)]
pub struct InvoiceRepositoryTxn {
    txn: DatabaseTransaction,
}

// Helper for summary query
#[derive(Debug, FromQueryResult)]
struct TotalsRow {
    total_profit: Option<Decimal>,
    total_cash: Option<Decimal>,
}

const SUMMARY_SQL: &str = r"
SELECT
    SUM((p.total_price - p.total_cost) * p.quantity) AS total_profit,
    SUM(CASE WHEN i.payment_type = 'CASH' THEN p.total_price * p.quantity ELSE 0 END) AS total_cash
FROM invoices i
JOIN products p ON p.invoice_no = i.invoice_no
WHERE i.date = $1
";

fn to_product(model: products::Model) -> Product {
    Product {
        id: ProductId::from_uuid(model.id),
        invoice_no: model.invoice_no,
        item_name: model.item_name,
        quantity: model.quantity,
        unit_cost: Money::new(model.total_cost),
        unit_price: Money::new(model.total_price),
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

fn to_invoice(model: invoices::Model, products: Vec<products::Model>) -> Invoice {
    Invoice {
        invoice_no: model.invoice_no,
        date: model.date,
        customer_name: model.customer_name,
        salesperson_name: model.salesperson_name,
        payment_type: model.payment_type.into(),
        notes: model.notes,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
        products: products.into_iter().map(to_product).collect(),
    }
}

/// Attaches products to each invoice, keeping the invoice order.
async fn with_products<C: ConnectionTrait>(
    conn: &C,
    models: Vec<invoices::Model>,
) -> Result<Vec<Invoice>, DbErr> {
    if models.is_empty() {
        return Ok(Vec::new());
    }

    let invoice_nos: Vec<String> = models.iter().map(|m| m.invoice_no.clone()).collect();
    // Product ids are UUID v7, so id order is insertion order.
    let rows = products::Entity::find()
        .filter(products::Column::InvoiceNo.is_in(invoice_nos))
        .order_by_asc(products::Column::Id)
        .all(conn)
        .await?;

    let mut grouped: HashMap<String, Vec<products::Model>> = HashMap::new();
    for row in rows {
        grouped.entry(row.invoice_no.clone()).or_default().push(row);
    }

    Ok(models
        .into_iter()
        .map(|m| {
            let products = grouped.remove(&m.invoice_no).unwrap_or_default();
            to_invoice(m, products)
        })
        .collect())
}

async fn find_one<C: ConnectionTrait>(conn: &C, invoice_no: &str) -> Result<Option<Invoice>, DbErr> {
    let Some(model) = invoices::Entity::find_by_id(invoice_no.to_string())
        .one(conn)
        .await?
    else {
        return Ok(None);
    };
    Ok(with_products(conn, vec![model]).await?.pop())
}

/// Inserts the draft's products, returning them as persisted.
async fn insert_products<C: ConnectionTrait>(
    conn: &C,
    draft: &InvoiceDraft,
    now: DateTimeWithTimeZone,
) -> Result<Vec<products::Model>, DbErr> {
    let models: Vec<products::Model> = draft
        .products
        .iter()
        .map(|p| products::Model {
            id: Uuid::now_v7(),
            invoice_no: draft.invoice_no.clone(),
            item_name: p.item_name.clone(),
            quantity: p.quantity,
            total_cost: p.unit_cost.amount(),
            total_price: p.unit_price.amount(),
            created_at: now,
            updated_at: now,
        })
        .collect();

    if models.is_empty() {
        return Ok(models);
    }

    let active: Vec<products::ActiveModel> = models.iter().cloned().map(Into::into).collect();
    products::Entity::insert_many(active)
        .exec_without_returning(conn)
        .await?;
    Ok(models)
}

impl InvoiceStore for InvoiceRepository {
    type Transaction = InvoiceRepositoryTxn;

    async fn find_by_invoice_no(&self, invoice_no: &str) -> Result<Option<Invoice>, StoreError> {
        find_one(&self.db, invoice_no).await.map_err(store_error)
    }

    async fn find_by_invoice_nos(&self, invoice_nos: &[String]) -> Result<Vec<Invoice>, StoreError> {
        if invoice_nos.is_empty() {
            return Ok(Vec::new());
        }

        let models = invoices::Entity::find()
            .filter(invoices::Column::InvoiceNo.is_in(invoice_nos.iter().cloned()))
            .order_by_desc(invoices::Column::Date)
            .order_by_asc(invoices::Column::InvoiceNo)
            .all(&self.db)
            .await
            .map_err(store_error)?;

        with_products(&self.db, models).await.map_err(store_error)
    }

    async fn find_by_date(
        &self,
        date: NaiveDate,
        page: PageRequest,
    ) -> Result<(Vec<Invoice>, u64), StoreError> {
        let query = invoices::Entity::find().filter(invoices::Column::Date.eq(date));

        let total = query.clone().count(&self.db).await.map_err(store_error)?;

        let models = query
            .order_by_desc(invoices::Column::CreatedAt)
            .order_by_asc(invoices::Column::InvoiceNo)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .map_err(store_error)?;

        let invoices = with_products(&self.db, models).await.map_err(store_error)?;
        Ok((invoices, total))
    }

    async fn summary_by_date(&self, date: NaiveDate) -> Result<InvoiceTotals, StoreError> {
        let row = TotalsRow::find_by_statement(Statement::from_sql_and_values(
            self.db.get_database_backend(),
            SUMMARY_SQL,
            [date.into()],
        ))
        .one(&self.db)
        .await
        .map_err(store_error)?;

        let (profit, cash) = row.map_or((None, None), |r| (r.total_profit, r.total_cash));
        Ok(InvoiceTotals {
            total_profit: Money::new(profit.unwrap_or_default()),
            total_cash: Money::new(cash.unwrap_or_default()),
        })
    }

    async fn begin(&self) -> Result<InvoiceRepositoryTxn, StoreError> {
        let txn = self.db.begin().await.map_err(store_error)?;
        Ok(InvoiceRepositoryTxn { txn })
    }
}

impl InvoiceTransaction for InvoiceRepositoryTxn {
    async fn find_by_invoice_no(&self, invoice_no: &str) -> Result<Option<Invoice>, StoreError> {
        find_one(&self.txn, invoice_no).await.map_err(store_error)
    }

    async fn create(&self, draft: &InvoiceDraft) -> Result<Invoice, StoreError> {
        let now = Utc::now().fixed_offset();

        let invoice = invoices::ActiveModel {
            invoice_no: Set(draft.invoice_no.clone()),
            date: Set(draft.date),
            customer_name: Set(draft.customer_name.clone()),
            salesperson_name: Set(draft.salesperson_name.clone()),
            payment_type: Set(draft.payment_type.into()),
            notes: Set(draft.notes.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.txn)
        .await
        .map_err(store_error)?;

        let products = insert_products(&self.txn, draft, now)
            .await
            .map_err(store_error)?;

        debug!(invoice_no = %draft.invoice_no, products = products.len(), "Inserted invoice");
        Ok(to_invoice(invoice, products))
    }

    async fn replace(&self, draft: &InvoiceDraft) -> Result<Invoice, StoreError> {
        let now = Utc::now().fixed_offset();

        let invoice = invoices::ActiveModel {
            invoice_no: Set(draft.invoice_no.clone()),
            date: Set(draft.date),
            customer_name: Set(draft.customer_name.clone()),
            salesperson_name: Set(draft.salesperson_name.clone()),
            payment_type: Set(draft.payment_type.into()),
            notes: Set(draft.notes.clone()),
            updated_at: Set(now),
            ..Default::default()
        }
        .update(&self.txn)
        .await
        .map_err(store_error)?;

        products::Entity::delete_many()
            .filter(products::Column::InvoiceNo.eq(draft.invoice_no.as_str()))
            .exec(&self.txn)
            .await
            .map_err(store_error)?;

        let products = insert_products(&self.txn, draft, now)
            .await
            .map_err(store_error)?;

        Ok(to_invoice(invoice, products))
    }

    async fn delete(&self, invoice_no: &str) -> Result<bool, StoreError> {
        let result = invoices::Entity::delete_by_id(invoice_no.to_string())
            .exec(&self.txn)
            .await
            .map_err(store_error)?;
        Ok(result.rows_affected > 0)
    }

    async fn commit(self) -> Result<(), StoreError> {
        self.txn.commit().await.map_err(store_error)
    }
}

#[cfg(test)]
#[path = "invoice_tests.rs"]
mod tests;
