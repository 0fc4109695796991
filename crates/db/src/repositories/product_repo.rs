//! Repository for the `products` table.

use convex_core::types::DbId;
use sqlx::PgPool;

use crate::models::product::{CreateProduct, Product, UpdateProduct};

/// Column list for products queries.
const COLUMNS: &str = "id, name, subtitle, price, original_price, price_note, description, \
                       features, popular, icon, display_order, created_at, updated_at";

/// Provides CRUD operations for product packages.
pub struct ProductRepo;

impl ProductRepo {
    /// List all products in display order. Ties break on id so the order is stable.
    pub async fn list(pool: &PgPool) -> Result<Vec<Product>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM products ORDER BY display_order ASC, id ASC");
        sqlx::query_as::<_, Product>(&query).fetch_all(pool).await
    }

    /// Find a product by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Product>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM products WHERE id = $1");
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Create a product, returning the created row.
    ///
    /// Without an explicit `display_order` the product goes to the end of the list.
    pub async fn create(pool: &PgPool, input: &CreateProduct) -> Result<Product, sqlx::Error> {
        let query = format!(
            "INSERT INTO products
                (name, subtitle, price, original_price, price_note, description,
                 features, popular, icon, display_order)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9,
                 COALESCE($10, (SELECT COALESCE(MAX(display_order), 0) + 1 FROM products)))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(&input.name)
            .bind(&input.subtitle)
            .bind(&input.price)
            .bind(&input.original_price)
            .bind(&input.price_note)
            .bind(&input.description)
            .bind(&input.features)
            .bind(input.popular)
            .bind(input.icon.tag())
            .bind(input.display_order)
            .fetch_one(pool)
            .await
    }

    /// Replace a product's editable fields, returning the updated row.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProduct,
    ) -> Result<Option<Product>, sqlx::Error> {
        let query = format!(
            "UPDATE products SET
                name = $2,
                subtitle = $3,
                price = $4,
                original_price = $5,
                price_note = $6,
                description = $7,
                features = $8,
                popular = $9,
                icon = $10,
                display_order = COALESCE($11, display_order)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.subtitle)
            .bind(&input.price)
            .bind(&input.original_price)
            .bind(&input.price_note)
            .bind(&input.description)
            .bind(&input.features)
            .bind(input.popular)
            .bind(input.icon.tag())
            .bind(input.display_order)
            .fetch_optional(pool)
            .await
    }

    /// Delete a product by ID. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
