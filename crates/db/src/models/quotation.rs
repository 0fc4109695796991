//! Issued-quotation ledger model.

use chrono::NaiveDate;
use convex_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `quotations` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct QuotationRecord {
    pub id: DbId,
    pub quotation_number: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub system_size: String,
    pub subtotal: f64,
    pub total: f64,
    pub issued_on: NaiveDate,
    pub created_at: Timestamp,
}

/// DTO for recording an issued quotation.
#[derive(Debug, Clone)]
pub struct CreateQuotationRecord {
    pub quotation_number: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub system_size: String,
    pub subtotal: f64,
    pub total: f64,
    pub issued_on: NaiveDate,
}
