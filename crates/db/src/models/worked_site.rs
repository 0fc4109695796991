//! Worked-site (project gallery) model.

use convex_core::error::{CoreError, FieldErrorCollector};
use convex_core::sanitize::Sanitize;
use convex_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `worked_sites` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct WorkedSite {
    pub id: DbId,
    pub title: String,
    pub location: String,
    pub system_size: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating or replacing a worked site.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateWorkedSite {
    pub title: String,
    pub location: String,
    pub system_size: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

/// Updates replace every editable field.
pub type UpdateWorkedSite = CreateWorkedSite;

impl CreateWorkedSite {
    /// Check required fields. Call after sanitizing.
    pub fn validate(&self) -> Result<(), CoreError> {
        let mut errors = FieldErrorCollector::new();
        if self.title.is_empty() {
            errors.add("title", "Title is required.");
        }
        if self.location.is_empty() {
            errors.add("location", "Location is required.");
        }
        errors.finish()
    }
}

impl Sanitize for CreateWorkedSite {
    /// `image_url` is left alone; it is produced by the upload endpoint.
    fn sanitized(self) -> Self {
        Self {
            title: self.title.sanitized(),
            location: self.location.sanitized(),
            system_size: self.system_size.sanitized(),
            description: self.description.sanitized(),
            image_url: self.image_url.filter(|url| !url.trim().is_empty()),
        }
    }
}
