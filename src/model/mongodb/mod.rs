mod bson;
mod collection;
mod counter;
mod errors;

pub use bson::u32_id_filter;
pub use collection::{ensure_indexes_exist, Coll, MongoCollection};
pub use counter::{Counter, ADMIN_ID_COUNTER, CHOICE_ID_COUNTER, QUESTION_ID_COUNTER};
pub use errors::is_duplicate_key_error;
