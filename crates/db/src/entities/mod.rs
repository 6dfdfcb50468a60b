//! `SeaORM` entities.

pub mod invoices;
pub mod products;
pub mod sea_orm_active_enums;

pub mod prelude {
    //! Entity re-exports.
    pub use super::invoices::Entity as Invoices;
    pub use super::products::Entity as Products;
}
