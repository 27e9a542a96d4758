use chrono::{DateTime, Utc};
use log::{debug, info};
use mongodb::{
    bson::doc,
    error::Error as DbError,
    options::FindOptions,
    Database,
};
use rocket::{futures::TryStreamExt, http::Status};

use crate::error::{Error, Result};
use crate::model::{
    common::{AdminId, ChoiceId, QuestionId},
    db::{
        admin::{Admin, NewAdmin},
        choice::{Choice, NewChoice},
        question::{NewQuestion, Question},
    },
    mongodb::{
        ensure_indexes_exist, is_duplicate_key_error, u32_id_filter, Coll, Counter,
        ADMIN_ID_COUNTER, CHOICE_ID_COUNTER, QUESTION_ID_COUNTER,
    },
};

use super::PollStore;

/// A store backed by a MongoDB database.
pub struct MongoStore {
    questions: Coll<Question>,
    choices: Coll<Choice>,
    admins: Coll<Admin>,
    counters: Coll<Counter>,
}

impl MongoStore {
    /// Wrap the given database, making sure its indexes exist first.
    pub async fn connect(db: &Database) -> std::result::Result<Self, DbError> {
        ensure_indexes_exist(db).await?;
        info!("Using MongoDB database '{}'", db.name());
        Ok(Self {
            questions: Coll::from_db(db),
            choices: Coll::from_db(db),
            admins: Coll::from_db(db),
            counters: Coll::from_db(db),
        })
    }
}

#[rocket::async_trait]
impl PollStore for MongoStore {
    async fn latest_questions(&self, now: DateTime<Utc>, limit: usize) -> Result<Vec<Question>> {
        // A zero limit means no limit to MongoDB.
        if limit == 0 {
            return Ok(Vec::new());
        }
        let filter = doc! {
            "pub_date": { "$lte": now },
        };
        let options = FindOptions::builder()
            .sort(doc! { "pub_date": -1, "_id": -1 })
            .limit(i64::try_from(limit).unwrap_or(i64::MAX))
            .build();
        let questions = self
            .questions
            .find(filter, options)
            .await?
            .try_collect()
            .await?;
        Ok(questions)
    }

    async fn all_questions(&self) -> Result<Vec<Question>> {
        let options = FindOptions::builder()
            .sort(doc! { "pub_date": -1, "_id": -1 })
            .build();
        let questions = self
            .questions
            .find(None, options)
            .await?
            .try_collect()
            .await?;
        Ok(questions)
    }

    async fn question(&self, id: QuestionId) -> Result<Option<Question>> {
        Ok(self.questions.find_one(u32_id_filter(id), None).await?)
    }

    async fn choices(&self, question: QuestionId) -> Result<Vec<Choice>> {
        let options = FindOptions::builder().sort(doc! { "_id": 1 }).build();
        let choices = self
            .choices
            .find(doc! { "question_id": question }, options)
            .await?
            .try_collect()
            .await?;
        Ok(choices)
    }

    async fn increment_votes(&self, question: QuestionId, choice: ChoiceId) -> Result<bool> {
        // Scoping the filter to the question means a choice of another
        // question never matches.
        let filter = doc! {
            "_id": choice,
            "question_id": question,
        };
        let update = doc! {
            "$inc": { "votes": 1 },
        };
        let result = self
            .choices
            .update_one(filter, update, None)
            .await?;
        Ok(result.matched_count == 1)
    }

    async fn insert_question(&self, question: NewQuestion) -> Result<Question> {
        let id = Counter::next(&self.counters, QUESTION_ID_COUNTER).await?;
        let question = Question { id, question };
        self.questions.insert_one(&question, None).await?;
        debug!("Inserted question {id}");
        Ok(question)
    }

    async fn insert_choice(&self, choice: NewChoice) -> Result<Choice> {
        let question_id = choice.question_id;
        if self
            .questions
            .find_one(u32_id_filter(question_id), None)
            .await?
            .is_none()
        {
            return Err(Error::not_found(format!(
                "Question with ID '{question_id}'"
            )));
        }
        let id = Counter::next(&self.counters, CHOICE_ID_COUNTER).await?;
        let choice = Choice { id, choice };
        self.choices.insert_one(&choice, None).await?;
        debug!("Inserted choice {id} of question {question_id}");
        Ok(choice)
    }

    async fn delete_question(&self, id: QuestionId) -> Result<bool> {
        let deleted = self
            .questions
            .delete_one(u32_id_filter(id), None)
            .await?
            .deleted_count;
        if deleted == 0 {
            return Ok(false);
        }
        self.choices
            .delete_many(doc! { "question_id": id }, None)
            .await?;
        Ok(true)
    }

    async fn admin_by_username(&self, username: &str) -> Result<Option<Admin>> {
        let filter = doc! {
            "username": username,
        };
        Ok(self.admins.find_one(filter, None).await?)
    }

    async fn admin_by_id(&self, id: AdminId) -> Result<Option<Admin>> {
        Ok(self.admins.find_one(u32_id_filter(id), None).await?)
    }

    async fn insert_admin(&self, admin: NewAdmin) -> Result<Admin> {
        let id = Counter::next(&self.counters, ADMIN_ID_COUNTER).await?;
        let admin = Admin { id, admin };
        match self.admins.insert_one(&admin, None).await {
            Ok(_) => Ok(admin),
            Err(err) if is_duplicate_key_error(&err) => Err(Error::Status(
                Status::Conflict,
                format!("Admin username already in use: {}", admin.username),
            )),
            Err(err) => Err(err.into()),
        }
    }
}
