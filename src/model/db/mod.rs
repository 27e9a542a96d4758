//! DB-compatible (e.g. de/serialisable) types.
//!
//! The types in this module are serialised in a DB-friendly way, e.g.:
//!
//! - IDs live in the `_id` field.
//! - Datetimes are serialised in MongoDB's own format.

pub mod admin;
pub mod choice;
pub mod question;
