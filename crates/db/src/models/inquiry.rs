//! Inquiry (contact-form submission) model.

use convex_core::inquiry::{InquiryStatus, ValidContact};
use convex_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `inquiries` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Inquiry {
    pub id: DbId,
    pub name: String,
    pub email: Option<String>,
    /// Normalized as `+91 XXXXXXXXXX`.
    pub phone: String,
    pub location: String,
    pub address: Option<String>,
    /// One of `3kw`, `5kw`, `custom`, `not-sure`.
    pub energy_needs: Option<String>,
    pub message: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: InquiryStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Insert DTO. Built from a validated contact form; new rows always start
/// as [`InquiryStatus::New`].
#[derive(Debug, Clone)]
pub struct CreateInquiry {
    pub name: String,
    pub email: Option<String>,
    pub phone: String,
    pub location: String,
    pub address: Option<String>,
    pub energy_needs: Option<String>,
    pub message: Option<String>,
}

impl From<ValidContact> for CreateInquiry {
    fn from(contact: ValidContact) -> Self {
        Self {
            name: contact.name,
            email: contact.email,
            phone: contact.phone,
            location: contact.location,
            address: contact.address,
            energy_needs: contact.energy_needs.map(|e| e.as_str().to_string()),
            message: contact.message,
        }
    }
}

/// Body of `PATCH /admin/inquiries/{id}/status`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateInquiryStatus {
    pub status: InquiryStatus,
}

/// Number of inquiries in one status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct StatusCount {
    #[sqlx(try_from = "String")]
    pub status: InquiryStatus,
    pub count: i64,
}
