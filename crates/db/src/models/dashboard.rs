//! Admin dashboard summary.

use serde::Serialize;
use sqlx::FromRow;

use crate::models::inquiry::StatusCount;

/// Row counts per collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, FromRow)]
pub struct CollectionCounts {
    pub products: i64,
    pub testimonials: i64,
    pub worked_sites: i64,
    pub inquiries: i64,
}

/// Everything shown on the admin landing page.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    #[serde(flatten)]
    pub counts: CollectionCounts,
    /// Inquiry counts for every status, zero-filled.
    pub inquiries_by_status: Vec<StatusCount>,
}
