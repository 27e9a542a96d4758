//! API-compatible types.
//!
//! The types in this module are serialised in an API-friendly way, e.g.:
//!
//! - IDs are plain integers.
//! - Datetimes are serialised as RFC 3339 strings.

pub mod admin;
pub mod auth;
pub mod question;
