//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - An update DTO replacing every editable field (catalog rows are edited
//!   through a full form, so updates are `PUT`s rather than patches)
//!
//! Create and update DTOs implement [`convex_core::sanitize::Sanitize`];
//! handlers sanitize before calling a repository.

pub mod admin_session;
pub mod dashboard;
pub mod inquiry;
pub mod product;
pub mod quotation;
pub mod testimonial;
pub mod worked_site;
