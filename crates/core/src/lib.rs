//! Domain logic for the Convex Solar site backend.
//!
//! Everything in this crate is pure: no database, network or filesystem
//! access. The `db`, `events` and `api` crates build on these types.

pub mod alert;
pub mod currency;
pub mod error;
pub mod icons;
pub mod inquiry;
pub mod media;
pub mod pdf;
pub mod quotation;
pub mod quotation_document;
pub mod sanitize;
pub mod storage;
pub mod testimonial;
pub mod types;
