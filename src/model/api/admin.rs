use argon2::Config;
use chrono::{DateTime, Utc};
use rand::Rng;
use rocket::http::Status;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{
    common::QuestionId,
    db::{
        admin::NewAdmin,
        choice::NewChoice,
        question::NewQuestion,
    },
};

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Raw admin credentials, received from a user. These are never stored directly,
/// since the password is in plaintext.
#[derive(Clone, Deserialize, Serialize)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

impl TryFrom<AdminCredentials> for NewAdmin {
    type Error = Error;

    /// Convert [`AdminCredentials`] to a new admin by hashing the password.
    /// This enforces that the username is non-empty, and the password meets minimum length.
    fn try_from(cred: AdminCredentials) -> Result<Self> {
        if cred.username.is_empty() || cred.password.len() < MIN_PASSWORD_LENGTH {
            return Err(Error::Status(
                Status::BadRequest,
                "Illegal admin credentials".to_string(),
            ));
        }

        let mut salt = [0_u8; 16];
        rand::thread_rng().fill(&mut salt);
        let password_hash =
            argon2::hash_encoded(cred.password.as_bytes(), &salt, &Config::default())?;
        Ok(Self {
            username: cred.username,
            password_hash,
        })
    }
}

/// A question as submitted by an admin, optionally with its first choices.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QuestionSpec {
    pub question_text: String,
    /// Defaults to the moment the question is created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pub_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub choices: Vec<String>,
}

impl QuestionSpec {
    /// Validate the submission, splitting it into the question and its choice texts.
    pub fn into_parts(self, now: DateTime<Utc>) -> Result<(NewQuestion, Vec<String>)> {
        if self.question_text.trim().is_empty() {
            return Err(Error::Status(
                Status::UnprocessableEntity,
                "Question text must not be empty".to_string(),
            ));
        }
        if self.choices.iter().any(|choice| choice.trim().is_empty()) {
            return Err(Error::Status(
                Status::UnprocessableEntity,
                "Choice text must not be empty".to_string(),
            ));
        }
        let question = NewQuestion::new(self.question_text, self.pub_date.unwrap_or(now));
        Ok((question, self.choices))
    }
}

/// A choice to add to an existing question.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChoiceSpec {
    pub choice_text: String,
}

impl ChoiceSpec {
    pub fn into_choice(self, question_id: QuestionId) -> Result<NewChoice> {
        if self.choice_text.trim().is_empty() {
            return Err(Error::Status(
                Status::UnprocessableEntity,
                "Choice text must not be empty".to_string(),
            ));
        }
        Ok(NewChoice::new(question_id, self.choice_text))
    }
}

#[cfg(test)]
mod examples {
    use chrono::Duration;

    use super::*;

    impl AdminCredentials {
        /// Matches the bootstrap admin of the test configuration.
        pub fn example() -> Self {
            Self {
                username: "pollmaster".into(),
                password: "whatsthequestion".into(),
            }
        }

        pub fn example2() -> Self {
            Self {
                username: "deputy".into(),
                password: "totallysecurepassword".into(),
            }
        }

        pub fn empty() -> Self {
            Self {
                username: "".into(),
                password: "".into(),
            }
        }
    }

    impl QuestionSpec {
        pub fn example() -> Self {
            Self {
                question_text: "What's your favourite colour?".into(),
                pub_date: Some(Utc::now() - Duration::hours(1)),
                choices: vec!["Red".into(), "Green".into(), "Blue".into()],
            }
        }
    }
}
