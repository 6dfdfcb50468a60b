//! `SeaORM` active enums.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Postgres `payment_enum`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_enum")]
pub enum PaymentType {
    /// Cash payment.
    #[sea_orm(string_value = "CASH")]
    Cash,
    /// Credit payment.
    #[sea_orm(string_value = "CREDIT")]
    Credit,
}

impl From<invoicer_core::invoice::PaymentType> for PaymentType {
    fn from(value: invoicer_core::invoice::PaymentType) -> Self {
        match value {
            invoicer_core::invoice::PaymentType::Cash => Self::Cash,
            invoicer_core::invoice::PaymentType::Credit => Self::Credit,
        }
    }
}

impl From<PaymentType> for invoicer_core::invoice::PaymentType {
    fn from(value: PaymentType) -> Self {
        match value {
            PaymentType::Cash => Self::Cash,
            PaymentType::Credit => Self::Credit,
        }
    }
}
