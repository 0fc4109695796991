//! Request extractors that gate the admin panel.
//!
//! - [`auth::AdminSession`] -- requires a valid token for a live admin session.

pub mod auth;
