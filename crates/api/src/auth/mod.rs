//! Admin authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- JWT access tokens bound to a server-side admin session.

pub mod jwt;
pub mod password;
