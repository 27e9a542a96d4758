use mongodb::{
    bson::doc,
    options::{FindOneAndUpdateOptions, ReturnDocument},
};
use rocket::http::Status;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::mongodb::Coll;

/// Counter backing question IDs.
pub const QUESTION_ID_COUNTER: &str = "question_id";
/// Counter backing choice IDs.
pub const CHOICE_ID_COUNTER: &str = "choice_id";
/// Counter backing admin IDs.
pub const ADMIN_ID_COUNTER: &str = "admin_id";

/// A counter object used to implement auto-increment fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Counter {
    #[serde(rename = "_id")]
    pub id: String,
    /// The most recently allocated value.
    pub next: u32,
}

impl Counter {
    /// Atomically allocate the next value of the named counter.
    /// A counter that does not exist yet is created, so the first value is 1.
    pub async fn next(counters: &Coll<Counter>, id: &str) -> Result<u32> {
        let update = doc! {
            "$inc": { "next": 1 }
        };
        let options = FindOneAndUpdateOptions::builder()
            .upsert(true)
            .return_document(ReturnDocument::After)
            .build();
        let counter = counters
            .find_one_and_update(doc! { "_id": id }, update, options)
            .await?
            .ok_or_else(|| {
                Error::Status(
                    Status::InternalServerError,
                    format!("Failed to find counter with ID {id}"),
                )
            })?;
        Ok(counter.next)
    }
}
