//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod admin_session_repo;
pub mod dashboard_repo;
pub mod inquiry_repo;
pub mod product_repo;
pub mod quotation_repo;
pub mod testimonial_repo;
pub mod worked_site_repo;

pub use admin_session_repo::AdminSessionRepo;
pub use dashboard_repo::DashboardRepo;
pub use inquiry_repo::InquiryRepo;
pub use product_repo::ProductRepo;
pub use quotation_repo::QuotationRepo;
pub use testimonial_repo::TestimonialRepo;
pub use worked_site_repo::WorkedSiteRepo;
