//! Product package model.

use convex_core::error::{CoreError, FieldErrorCollector};
use convex_core::icons::ProductIcon;
use convex_core::sanitize::Sanitize;
use convex_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `products` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Product {
    pub id: DbId,
    pub name: String,
    pub subtitle: Option<String>,
    /// Display price, free text such as `"1,45,000"`.
    pub price: String,
    pub original_price: Option<String>,
    pub price_note: Option<String>,
    pub description: Option<String>,
    pub features: Vec<String>,
    pub popular: bool,
    /// Unknown stored tags read back as the default icon.
    #[sqlx(try_from = "String")]
    pub icon: ProductIcon,
    pub display_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a product.
///
/// `display_order` defaults to one past the current last product.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProduct {
    pub name: String,
    pub subtitle: Option<String>,
    pub price: String,
    pub original_price: Option<String>,
    pub price_note: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub popular: bool,
    #[serde(default)]
    pub icon: ProductIcon,
    pub display_order: Option<i32>,
}

/// DTO for replacing a product's editable fields.
///
/// Omitting `display_order` keeps the current position.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProduct {
    pub name: String,
    pub subtitle: Option<String>,
    pub price: String,
    pub original_price: Option<String>,
    pub price_note: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub popular: bool,
    #[serde(default)]
    pub icon: ProductIcon,
    pub display_order: Option<i32>,
}

fn check_required(name: &str, price: &str) -> Result<(), CoreError> {
    let mut errors = FieldErrorCollector::new();
    if name.is_empty() {
        errors.add("name", "Name is required.");
    }
    if price.is_empty() {
        errors.add("price", "Price is required.");
    }
    errors.finish()
}

impl CreateProduct {
    /// Check required fields. Call after sanitizing.
    pub fn validate(&self) -> Result<(), CoreError> {
        check_required(&self.name, &self.price)
    }
}

impl UpdateProduct {
    /// Check required fields. Call after sanitizing.
    pub fn validate(&self) -> Result<(), CoreError> {
        check_required(&self.name, &self.price)
    }
}

impl Sanitize for CreateProduct {
    fn sanitized(self) -> Self {
        Self {
            name: self.name.sanitized(),
            subtitle: self.subtitle.sanitized(),
            price: self.price.sanitized(),
            original_price: self.original_price.sanitized(),
            price_note: self.price_note.sanitized(),
            description: self.description.sanitized(),
            features: self.features.sanitized(),
            ..self
        }
    }
}

impl Sanitize for UpdateProduct {
    fn sanitized(self) -> Self {
        Self {
            name: self.name.sanitized(),
            subtitle: self.subtitle.sanitized(),
            price: self.price.sanitized(),
            original_price: self.original_price.sanitized(),
            price_note: self.price_note.sanitized(),
            description: self.description.sanitized(),
            features: self.features.sanitized(),
            ..self
        }
    }
}
