//! Repository for the `worked_sites` table.

use convex_core::types::DbId;
use sqlx::PgPool;

use crate::models::worked_site::{CreateWorkedSite, UpdateWorkedSite, WorkedSite};

const COLUMNS: &str =
    "id, title, location, system_size, description, image_url, created_at, updated_at";

/// Provides CRUD operations for the project gallery.
pub struct WorkedSiteRepo;

impl WorkedSiteRepo {
    /// List all worked sites, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<WorkedSite>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM worked_sites ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, WorkedSite>(&query).fetch_all(pool).await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<WorkedSite>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM worked_sites WHERE id = $1");
        sqlx::query_as::<_, WorkedSite>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Create a worked site, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateWorkedSite) -> Result<WorkedSite, sqlx::Error> {
        let query = format!(
            "INSERT INTO worked_sites (title, location, system_size, description, image_url)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WorkedSite>(&query)
            .bind(&input.title)
            .bind(&input.location)
            .bind(&input.system_size)
            .bind(&input.description)
            .bind(&input.image_url)
            .fetch_one(pool)
            .await
    }

    /// Replace a worked site's fields, returning the updated row.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateWorkedSite,
    ) -> Result<Option<WorkedSite>, sqlx::Error> {
        let query = format!(
            "UPDATE worked_sites SET
                title = $2, location = $3, system_size = $4, description = $5, image_url = $6
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WorkedSite>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.location)
            .bind(&input.system_size)
            .bind(&input.description)
            .bind(&input.image_url)
            .fetch_optional(pool)
            .await
    }

    /// Delete a worked site by ID. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM worked_sites WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
