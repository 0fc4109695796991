//! Repository for the `testimonials` table.

use convex_core::types::DbId;
use sqlx::PgPool;

use crate::models::testimonial::{CreateTestimonial, Testimonial, UpdateTestimonial};

const COLUMNS: &str =
    "id, customer_name, location, rating, review, image_url, created_at, updated_at";

/// Provides CRUD operations for testimonials.
pub struct TestimonialRepo;

impl TestimonialRepo {
    /// List all testimonials, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Testimonial>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM testimonials ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, Testimonial>(&query).fetch_all(pool).await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Testimonial>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM testimonials WHERE id = $1");
        sqlx::query_as::<_, Testimonial>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Create a testimonial, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateTestimonial,
    ) -> Result<Testimonial, sqlx::Error> {
        let query = format!(
            "INSERT INTO testimonials (customer_name, location, rating, review, image_url)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Testimonial>(&query)
            .bind(&input.customer_name)
            .bind(&input.location)
            .bind(input.rating)
            .bind(&input.review)
            .bind(&input.image_url)
            .fetch_one(pool)
            .await
    }

    /// Replace a testimonial's fields, returning the updated row.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTestimonial,
    ) -> Result<Option<Testimonial>, sqlx::Error> {
        let query = format!(
            "UPDATE testimonials SET
                customer_name = $2, location = $3, rating = $4, review = $5, image_url = $6
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Testimonial>(&query)
            .bind(id)
            .bind(&input.customer_name)
            .bind(&input.location)
            .bind(input.rating)
            .bind(&input.review)
            .bind(&input.image_url)
            .fetch_optional(pool)
            .await
    }

    /// Delete a testimonial by ID. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM testimonials WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
