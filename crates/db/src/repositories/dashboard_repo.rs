//! Aggregate queries for the admin dashboard.

use sqlx::PgPool;

use crate::models::dashboard::{CollectionCounts, DashboardSummary};
use crate::repositories::InquiryRepo;

/// Read-only summary queries.
pub struct DashboardRepo;

impl DashboardRepo {
    /// Row counts for every collection.
    pub async fn counts(pool: &PgPool) -> Result<CollectionCounts, sqlx::Error> {
        sqlx::query_as::<_, CollectionCounts>(
            "SELECT
                (SELECT COUNT(*) FROM products)     AS products,
                (SELECT COUNT(*) FROM testimonials) AS testimonials,
                (SELECT COUNT(*) FROM worked_sites) AS worked_sites,
                (SELECT COUNT(*) FROM inquiries)    AS inquiries",
        )
        .fetch_one(pool)
        .await
    }

    /// Collection counts plus the per-status inquiry breakdown.
    pub async fn summary(pool: &PgPool) -> Result<DashboardSummary, sqlx::Error> {
        let counts = Self::counts(pool).await?;
        let inquiries_by_status = InquiryRepo::count_by_status(pool).await?;
        Ok(DashboardSummary {
            counts,
            inquiries_by_status,
        })
    }
}
