use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rocket::{http::Status, tokio::sync::Mutex};

use crate::error::{Error, Result};
use crate::model::{
    common::{latest_visible, AdminId, ChoiceId, QuestionId},
    db::{
        admin::{Admin, NewAdmin},
        choice::{Choice, NewChoice},
        question::{NewQuestion, Question},
    },
};

use super::PollStore;

/// A store that keeps everything in process memory.
///
/// Every operation holds the lock for its whole duration, so each is atomic
/// with respect to all the others.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

#[derive(Default)]
struct Tables {
    questions: BTreeMap<QuestionId, Question>,
    choices: BTreeMap<ChoiceId, Choice>,
    admins: BTreeMap<AdminId, Admin>,
    last_question_id: QuestionId,
    last_choice_id: ChoiceId,
    last_admin_id: AdminId,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Allocate the next ID after `last`.
fn next_id(last: &mut u32) -> Result<u32> {
    *last = last.checked_add(1).ok_or_else(|| {
        Error::Status(
            Status::InternalServerError,
            "Ran out of IDs".to_string(),
        )
    })?;
    Ok(*last)
}

#[rocket::async_trait]
impl PollStore for MemoryStore {
    async fn latest_questions(&self, now: DateTime<Utc>, limit: usize) -> Result<Vec<Question>> {
        let tables = self.tables.lock().await;
        Ok(latest_visible(tables.questions.values().cloned(), now, limit))
    }

    async fn all_questions(&self) -> Result<Vec<Question>> {
        let tables = self.tables.lock().await;
        let mut questions: Vec<_> = tables.questions.values().cloned().collect();
        questions.sort_by(|a, b| b.pub_date.cmp(&a.pub_date).then(b.id.cmp(&a.id)));
        Ok(questions)
    }

    async fn question(&self, id: QuestionId) -> Result<Option<Question>> {
        Ok(self.tables.lock().await.questions.get(&id).cloned())
    }

    async fn choices(&self, question: QuestionId) -> Result<Vec<Choice>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .choices
            .values()
            .filter(|choice| choice.question_id == question)
            .cloned()
            .collect())
    }

    async fn increment_votes(&self, question: QuestionId, choice: ChoiceId) -> Result<bool> {
        let mut tables = self.tables.lock().await;
        match tables.choices.get_mut(&choice) {
            Some(choice) if choice.question_id == question => {
                choice.votes = choice.votes.saturating_add(1);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn insert_question(&self, question: NewQuestion) -> Result<Question> {
        let mut tables = self.tables.lock().await;
        let id = next_id(&mut tables.last_question_id)?;
        let question = Question { id, question };
        tables.questions.insert(id, question.clone());
        Ok(question)
    }

    async fn insert_choice(&self, choice: NewChoice) -> Result<Choice> {
        let mut tables = self.tables.lock().await;
        if !tables.questions.contains_key(&choice.question_id) {
            return Err(Error::not_found(format!(
                "Question with ID '{}'",
                choice.question_id
            )));
        }
        let id = next_id(&mut tables.last_choice_id)?;
        let choice = Choice { id, choice };
        tables.choices.insert(id, choice.clone());
        Ok(choice)
    }

    async fn delete_question(&self, id: QuestionId) -> Result<bool> {
        let mut tables = self.tables.lock().await;
        if tables.questions.remove(&id).is_none() {
            return Ok(false);
        }
        tables.choices.retain(|_, choice| choice.question_id != id);
        Ok(true)
    }

    async fn admin_by_username(&self, username: &str) -> Result<Option<Admin>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .admins
            .values()
            .find(|admin| admin.username == username)
            .map(clone_admin))
    }

    async fn admin_by_id(&self, id: AdminId) -> Result<Option<Admin>> {
        Ok(self.tables.lock().await.admins.get(&id).map(clone_admin))
    }

    async fn insert_admin(&self, admin: NewAdmin) -> Result<Admin> {
        let mut tables = self.tables.lock().await;
        if tables
            .admins
            .values()
            .any(|existing| existing.username == admin.username)
        {
            return Err(Error::Status(
                Status::Conflict,
                format!("Admin username already in use: {}", admin.username),
            ));
        }
        let id = next_id(&mut tables.last_admin_id)?;
        let admin = Admin { id, admin };
        tables.admins.insert(id, clone_admin(&admin));
        Ok(admin)
    }
}

// Admins hold a password hash, so they are deliberately not `Clone`.
fn clone_admin(admin: &Admin) -> Admin {
    Admin {
        id: admin.id,
        admin: NewAdmin {
            username: admin.username.clone(),
            password_hash: admin.password_hash.clone(),
        },
    }
}
