//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST routes for invoices
//! - Spreadsheet upload for bulk import
//! - Request and response types

pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use invoicer_core::import::{ImportService, SheetLayout};
use invoicer_core::invoice::InvoiceService;
use invoicer_db::InvoiceRepository;
use invoicer_shared::ImportConfig;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// Spreadsheet import settings.
    pub import: Arc<ImportConfig>,
}

impl AppState {
    /// Creates the state from a connection pool and import settings.
    #[must_use]
    pub fn new(db: DatabaseConnection, import: ImportConfig) -> Self {
        Self {
            db: Arc::new(db),
            import: Arc::new(import),
        }
    }

    fn repository(&self) -> Arc<InvoiceRepository> {
        Arc::new(InvoiceRepository::new((*self.db).clone()))
    }

    /// Invoice CRUD service over the shared pool.
    #[must_use]
    pub fn invoice_service(&self) -> InvoiceService<InvoiceRepository> {
        InvoiceService::new(self.repository())
    }

    /// Import service reading the configured sheet names.
    #[must_use]
    pub fn import_service(&self) -> ImportService<InvoiceRepository> {
        ImportService::new(self.repository(), SheetLayout::from(self.import.as_ref()))
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    let body_limit = state.import.max_upload_bytes;

    Router::new()
        .nest("/api", routes::api_routes())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
