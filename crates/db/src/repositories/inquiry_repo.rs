//! Repository for the `inquiries` table.

use convex_core::inquiry::InquiryStatus;
use convex_core::types::DbId;
use sqlx::PgPool;

use crate::models::inquiry::{CreateInquiry, Inquiry, StatusCount};

const COLUMNS: &str = "id, name, email, phone, location, address, energy_needs, message, \
                       status, created_at, updated_at";

/// Provides access to contact-form inquiries.
pub struct InquiryRepo;

impl InquiryRepo {
    /// List all inquiries, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Inquiry>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM inquiries ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, Inquiry>(&query).fetch_all(pool).await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Inquiry>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM inquiries WHERE id = $1");
        sqlx::query_as::<_, Inquiry>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a new inquiry with status `new`.
    pub async fn create(pool: &PgPool, input: &CreateInquiry) -> Result<Inquiry, sqlx::Error> {
        let query = format!(
            "INSERT INTO inquiries
                (name, email, phone, location, address, energy_needs, message, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Inquiry>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.location)
            .bind(&input.address)
            .bind(&input.energy_needs)
            .bind(&input.message)
            .bind(InquiryStatus::New.as_str())
            .fetch_one(pool)
            .await
    }

    /// Set the status of one inquiry, returning the updated row.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: InquiryStatus,
    ) -> Result<Option<Inquiry>, sqlx::Error> {
        let query = format!("UPDATE inquiries SET status = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Inquiry>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Delete an inquiry by ID. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM inquiries WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count inquiries per status. Every status is present, zero-filled,
    /// in [`InquiryStatus::ALL`] order.
    pub async fn count_by_status(pool: &PgPool) -> Result<Vec<StatusCount>, sqlx::Error> {
        let rows = sqlx::query_as::<_, StatusCount>(
            "SELECT status, COUNT(*) AS count FROM inquiries GROUP BY status",
        )
        .fetch_all(pool)
        .await?;

        Ok(InquiryStatus::ALL
            .into_iter()
            .map(|status| StatusCount {
                status,
                count: rows
                    .iter()
                    .find(|row| row.status == status)
                    .map_or(0, |row| row.count),
            })
            .collect())
    }
}
