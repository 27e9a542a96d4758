//! Storage backends for questions, choices and admins.
//!
//! Route handlers only ever see a [`Store`], so the server can run against
//! MongoDB or keep everything in memory.

mod memory;
mod mongo;

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::model::{
    common::{AdminId, ChoiceId, QuestionId},
    db::{
        admin::{Admin, NewAdmin},
        choice::{Choice, NewChoice},
        question::{NewQuestion, Question},
    },
};

pub use memory::MemoryStore;
pub use mongo::MongoStore;

/// Shared handle on the store, kept in Rocket's managed state.
pub type Store = Arc<dyn PollStore>;

#[rocket::async_trait]
pub trait PollStore: Send + Sync {
    /// Questions published as of `now`, newest first, at most `limit` of them.
    async fn latest_questions(&self, now: DateTime<Utc>, limit: usize) -> Result<Vec<Question>>;

    /// Every question, including future ones, newest first.
    async fn all_questions(&self) -> Result<Vec<Question>>;

    async fn question(&self, id: QuestionId) -> Result<Option<Question>>;

    /// The choices of a question, in creation order.
    async fn choices(&self, question: QuestionId) -> Result<Vec<Choice>>;

    /// Atomically add one vote to `choice`, which must belong to `question`.
    /// Returns false if no such choice exists.
    async fn increment_votes(&self, question: QuestionId, choice: ChoiceId) -> Result<bool>;

    async fn insert_question(&self, question: NewQuestion) -> Result<Question>;

    /// Add a choice to its question. Fails with a 404 if the question doesn't exist.
    async fn insert_choice(&self, choice: NewChoice) -> Result<Choice>;

    /// Delete a question and all its choices. Returns false if there was no such question.
    async fn delete_question(&self, id: QuestionId) -> Result<bool>;

    async fn admin_by_username(&self, username: &str) -> Result<Option<Admin>>;

    async fn admin_by_id(&self, id: AdminId) -> Result<Option<Admin>>;

    /// Add an admin. Fails with a 409 if the username is taken.
    async fn insert_admin(&self, admin: NewAdmin) -> Result<Admin>;
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[backend_test]
    async fn zero_limit_lists_nothing(store: Store) {
        let now = Utc::now();
        store
            .insert_question(NewQuestion::new("Anyone?", now - Duration::days(1)))
            .await
            .unwrap();

        assert!(store.latest_questions(now, 0).await.unwrap().is_empty());
        assert_eq!(store.latest_questions(now, 1).await.unwrap().len(), 1);
    }
}
