//! Customer testimonial model.

use convex_core::error::{CoreError, FieldErrorCollector};
use convex_core::sanitize::Sanitize;
use convex_core::testimonial::{validate_rating, DEFAULT_RATING};
use convex_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `testimonials` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Testimonial {
    pub id: DbId,
    pub customer_name: String,
    pub location: String,
    /// 1 to 5 stars.
    pub rating: i16,
    pub review: String,
    pub image_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

fn default_rating() -> i16 {
    DEFAULT_RATING
}

/// DTO for creating or replacing a testimonial.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTestimonial {
    pub customer_name: String,
    pub location: String,
    #[serde(default = "default_rating")]
    pub rating: i16,
    pub review: String,
    pub image_url: Option<String>,
}

/// Updates replace every editable field.
pub type UpdateTestimonial = CreateTestimonial;

impl CreateTestimonial {
    /// Check required fields and the rating range. Call after sanitizing.
    pub fn validate(&self) -> Result<(), CoreError> {
        let mut errors = FieldErrorCollector::new();
        if self.customer_name.is_empty() {
            errors.add("customer_name", "Customer name is required.");
        }
        if self.location.is_empty() {
            errors.add("location", "Location is required.");
        }
        if self.review.is_empty() {
            errors.add("review", "Review is required.");
        }
        if validate_rating(self.rating).is_err() {
            errors.add("rating", "Rating must be between 1 and 5.");
        }
        errors.finish()
    }
}

impl Sanitize for CreateTestimonial {
    fn sanitized(self) -> Self {
        Self {
            customer_name: self.customer_name.sanitized(),
            location: self.location.sanitized(),
            review: self.review.sanitized(),
            image_url: self.image_url.filter(|url| !url.trim().is_empty()),
            ..self
        }
    }
}
