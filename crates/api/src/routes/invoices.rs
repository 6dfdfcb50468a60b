//! Invoice routes: listing, direct CRUD and spreadsheet import.

use axum::{
    Json, Router,
    extract::{
        Multipart, Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use chrono::{DateTime, NaiveDate, Utc};
use invoicer_core::import::{ImportFailure, ImportOutcome, XlsxWorkbook};
use invoicer_core::invoice::{
    Invoice, InvoiceInput, InvoicePage, PaymentType, Product, ProductInput,
};
use invoicer_shared::AppError;
use invoicer_shared::types::{Money, PageMeta, PageRequest, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use super::{bad_request, error_response};
use crate::AppState;

/// Multipart field carrying the uploaded workbook.
const UPLOAD_FIELD: &str = "file";

/// Creates the invoice routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/invoices", get(list_invoices).post(create_invoice))
        .route("/invoices/import", post(import_invoices))
        .route(
            "/invoices/{invoice_no}",
            put(update_invoice).delete(delete_invoice),
        )
}

// ============================================================================
// Request / Response Types
// ============================================================================

/// Query parameters for listing invoices.
#[derive(Debug, Deserialize)]
pub struct ListInvoicesQuery {
    /// Invoice date (YYYY-MM-DD). Required.
    pub date: Option<String>,
    /// Page number, 1-indexed.
    #[serde(default)]
    pub page: u32,
    /// Page size.
    #[serde(default)]
    pub size: u32,
}

/// Invoice fields shared by create and update.
#[derive(Debug, Deserialize)]
pub struct InvoiceFields {
    /// Invoice date (YYYY-MM-DD).
    pub date: String,
    /// Customer name.
    pub customer_name: String,
    /// Salesperson name.
    pub salesperson_name: String,
    /// "CASH" or "CREDIT".
    pub payment_type: String,
    /// Optional notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// Products sold on this invoice.
    #[serde(default)]
    pub products: Vec<ProductRequest>,
}

/// Request body for creating an invoice.
#[derive(Debug, Deserialize)]
pub struct CreateInvoiceRequest {
    /// Invoice number.
    pub invoice_no: String,
    /// Remaining invoice fields.
    #[serde(flatten)]
    pub fields: InvoiceFields,
}

/// A product line in a request body.
#[derive(Debug, Deserialize)]
pub struct ProductRequest {
    /// Item name.
    pub item_name: String,
    /// Units sold.
    pub quantity: i32,
    /// Cost of one unit.
    pub total_cost: Decimal,
    /// Price of one unit.
    pub total_price: Decimal,
}

/// Response for a product line.
#[derive(Debug, Serialize)]
pub struct ProductResponse {
    /// Product ID.
    pub id: ProductId,
    /// Item name.
    pub item_name: String,
    /// Units sold.
    pub quantity: i32,
    /// Cost of one unit.
    pub total_cost: String,
    /// Price of one unit.
    pub total_price: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Response for an invoice with its products.
#[derive(Debug, Serialize)]
pub struct InvoiceResponse {
    /// Invoice number.
    pub invoice_no: String,
    /// Invoice date.
    pub date: NaiveDate,
    /// Customer name.
    pub customer_name: String,
    /// Salesperson name.
    pub salesperson_name: String,
    /// "CASH" or "CREDIT".
    pub payment_type: PaymentType,
    /// Notes, omitted when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Products sold.
    pub products: Vec<ProductResponse>,
}

/// Response for a page of invoices with totals.
#[derive(Debug, Serialize)]
pub struct InvoiceListResponse {
    /// Invoices on this page.
    pub invoices: Vec<InvoiceResponse>,
    /// Profit over every matching invoice.
    pub total_profit: String,
    /// Cash revenue over every matching invoice.
    pub total_cash: String,
    /// Paging metadata.
    pub paging: PageMeta,
}

impl From<Product> for ProductResponse {
    fn from(p: Product) -> Self {
        Self {
            id: p.id,
            item_name: p.item_name,
            quantity: p.quantity,
            total_cost: p.unit_cost.to_fixed_string(),
            total_price: p.unit_price.to_fixed_string(),
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

impl From<Invoice> for InvoiceResponse {
    fn from(i: Invoice) -> Self {
        Self {
            invoice_no: i.invoice_no,
            date: i.date,
            customer_name: i.customer_name,
            salesperson_name: i.salesperson_name,
            payment_type: i.payment_type,
            notes: i.notes,
            created_at: i.created_at,
            updated_at: i.updated_at,
            products: i.products.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<InvoicePage> for InvoiceListResponse {
    fn from(page: InvoicePage) -> Self {
        Self {
            invoices: page.invoices.into_iter().map(Into::into).collect(),
            total_profit: page.totals.total_profit.to_fixed_string(),
            total_cash: page.totals.total_cash.to_fixed_string(),
            paging: page.paging,
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| format!("Invalid date '{raw}', expected YYYY-MM-DD"))
}

/// Accepts exactly "CASH" or "CREDIT".
fn parse_payment_type(raw: &str) -> Result<PaymentType, String> {
    match raw.parse::<PaymentType>() {
        Ok(p) if p.as_str() == raw => Ok(p),
        _ => Err(format!("Invalid payment type '{raw}', expected CASH or CREDIT")),
    }
}

impl InvoiceFields {
    fn into_input(self) -> Result<InvoiceInput, String> {
        Ok(InvoiceInput {
            date: parse_date(&self.date)?,
            customer_name: self.customer_name,
            salesperson_name: self.salesperson_name,
            payment_type: parse_payment_type(&self.payment_type)?,
            notes: self.notes,
            products: self
                .products
                .into_iter()
                .map(|p| ProductInput {
                    item_name: p.item_name,
                    quantity: p.quantity,
                    unit_cost: Money::new(p.total_cost),
                    unit_price: Money::new(p.total_price),
                })
                .collect(),
        })
    }
}

fn data_response<T: Serialize>(status: StatusCode, data: T) -> Response {
    (status, Json(json!({ "data": data }))).into_response()
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /invoices?date=YYYY-MM-DD&page=&size=
async fn list_invoices(
    State(state): State<AppState>,
    query: Result<Query<ListInvoicesQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(q) => q,
        Err(e) => return bad_request(e.body_text()),
    };

    let Some(raw_date) = query.date.as_deref() else {
        return bad_request("Query parameter 'date' is required");
    };
    let date = match parse_date(raw_date) {
        Ok(d) => d,
        Err(msg) => return bad_request(msg),
    };

    match state
        .invoice_service()
        .list(date, PageRequest::new(query.page, query.size))
        .await
    {
        Ok(page) => data_response(StatusCode::OK, InvoiceListResponse::from(page)),
        Err(e) => error_response(&e.into()),
    }
}

/// POST /invoices
async fn create_invoice(
    State(state): State<AppState>,
    body: Result<Json<CreateInvoiceRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match body {
        Ok(b) => b,
        Err(e) => return bad_request(e.body_text()),
    };

    let input = match request.fields.into_input() {
        Ok(i) => i,
        Err(msg) => return bad_request(msg),
    };

    match state
        .invoice_service()
        .create(request.invoice_no, input)
        .await
    {
        Ok(invoice) => data_response(StatusCode::CREATED, InvoiceResponse::from(invoice)),
        Err(e) => error_response(&e.into()),
    }
}

/// PUT /invoices/{invoice_no}
async fn update_invoice(
    State(state): State<AppState>,
    Path(invoice_no): Path<String>,
    body: Result<Json<InvoiceFields>, JsonRejection>,
) -> Response {
    let Json(fields) = match body {
        Ok(b) => b,
        Err(e) => return bad_request(e.body_text()),
    };

    let input = match fields.into_input() {
        Ok(i) => i,
        Err(msg) => return bad_request(msg),
    };

    match state.invoice_service().update(&invoice_no, input).await {
        Ok(invoice) => data_response(StatusCode::OK, InvoiceResponse::from(invoice)),
        Err(e) => error_response(&e.into()),
    }
}

/// DELETE /invoices/{invoice_no}
async fn delete_invoice(
    State(state): State<AppState>,
    Path(invoice_no): Path<String>,
) -> Response {
    match state.invoice_service().delete(&invoice_no).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "message": format!("Invoice {invoice_no} deleted") })),
        )
            .into_response(),
        Err(e) => error_response(&e.into()),
    }
}

/// Reads the uploaded workbook bytes from the `file` field.
async fn read_upload(multipart: &mut Multipart) -> Result<Vec<u8>, Response> {
    loop {
        let field = multipart
            .next_field()
            .await
            .map_err(|e| bad_request(format!("Failed to read multipart body: {e}")))?;

        let Some(field) = field else {
            return Err(bad_request(format!(
                "Multipart field '{UPLOAD_FIELD}' is required"
            )));
        };

        if field.name() == Some(UPLOAD_FIELD) {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| bad_request(format!("Failed to read uploaded file: {e}")))?;
            return Ok(bytes.to_vec());
        }
    }
}

/// POST /invoices/import
///
/// All rows must pass for anything to be stored. Row problems come back
/// together with status 422.
async fn import_invoices(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let bytes = match read_upload(&mut multipart).await {
        Ok(b) => b,
        Err(response) => return response,
    };
    info!(size = bytes.len(), "Workbook uploaded");

    // Decompressing and decoding the workbook is CPU-bound.
    let workbook = match tokio::task::spawn_blocking(move || XlsxWorkbook::from_bytes(bytes)).await
    {
        Ok(Ok(wb)) => wb,
        Ok(Err(e)) => {
            warn!(error = %e, "Unreadable workbook");
            return error_response(&ImportFailure::from(e).into());
        }
        Err(e) => return error_response(&AppError::Internal(e.to_string())),
    };

    match state.import_service().import(&workbook).await {
        ImportOutcome::Persisted(page) => {
            data_response(StatusCode::OK, InvoiceListResponse::from(page))
        }
        ImportOutcome::Reported(errors) => {
            let rejection =
                AppError::BusinessRule(format!("{} row(s) rejected, nothing imported", errors.len()));
            let status = StatusCode::from_u16(rejection.status_code())
                .unwrap_or(StatusCode::UNPROCESSABLE_ENTITY);
            (
                status,
                Json(json!({
                    "error": "import_rejected",
                    "message": rejection.public_message(),
                    "errors": errors
                })),
            )
                .into_response()
        }
        ImportOutcome::Fatal(failure) => error_response(&failure.into()),
    }
}
