//! Repository for the `quotations` table.

use sqlx::PgPool;

use crate::models::quotation::{CreateQuotationRecord, QuotationRecord};

const COLUMNS: &str = "id, quotation_number, customer_name, customer_phone, system_size, \
                       subtotal, total, issued_on, created_at";

/// Ledger of issued quotation numbers.
pub struct QuotationRepo;

impl QuotationRepo {
    /// Record an issued quotation.
    ///
    /// Returns `None` when the number is already taken, leaving the table
    /// unchanged, so the caller can draw another number.
    pub async fn try_record(
        pool: &PgPool,
        input: &CreateQuotationRecord,
    ) -> Result<Option<QuotationRecord>, sqlx::Error> {
        let query = format!(
            "INSERT INTO quotations
                (quotation_number, customer_name, customer_phone, system_size,
                 subtotal, total, issued_on)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             ON CONFLICT (quotation_number) DO NOTHING
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, QuotationRecord>(&query)
            .bind(&input.quotation_number)
            .bind(&input.customer_name)
            .bind(&input.customer_phone)
            .bind(&input.system_size)
            .bind(input.subtotal)
            .bind(input.total)
            .bind(input.issued_on)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_number(
        pool: &PgPool,
        number: &str,
    ) -> Result<Option<QuotationRecord>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM quotations WHERE quotation_number = $1");
        sqlx::query_as::<_, QuotationRecord>(&query)
            .bind(number)
            .fetch_optional(pool)
            .await
    }

    /// Most recently issued quotations first.
    pub async fn list_recent(pool: &PgPool, limit: i64) -> Result<Vec<QuotationRecord>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM quotations ORDER BY created_at DESC, id DESC LIMIT $1");
        sqlx::query_as::<_, QuotationRecord>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
