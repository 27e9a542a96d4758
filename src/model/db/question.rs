use std::ops::{Deref, DerefMut};

use chrono::{DateTime, Timelike, Utc};
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};

use crate::model::common::{was_published_recently, Publication, QuestionId};

/// Core question data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionCore {
    /// The prompt shown to voters.
    pub question_text: String,
    /// When the question becomes visible.
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub pub_date: DateTime<Utc>,
}

impl QuestionCore {
    /// Create a new question. The publication date is truncated to whole
    /// milliseconds, which is all the database keeps.
    pub fn new(question_text: impl Into<String>, pub_date: DateTime<Utc>) -> Self {
        let millis = pub_date.nanosecond() / 1_000_000 * 1_000_000;
        Self {
            question_text: question_text.into(),
            pub_date: pub_date.with_nanosecond(millis).unwrap_or(pub_date),
        }
    }

    pub fn was_published_recently(&self, now: DateTime<Utc>) -> bool {
        was_published_recently(self.pub_date, now)
    }
}

/// A question without an ID.
pub type NewQuestion = QuestionCore;

/// A question from the database, with its unique ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "_id")]
    pub id: QuestionId,
    #[serde(flatten)]
    pub question: QuestionCore,
}

impl Deref for Question {
    type Target = QuestionCore;

    fn deref(&self) -> &Self::Target {
        &self.question
    }
}

impl DerefMut for Question {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.question
    }
}

impl Publication for Question {
    fn pub_date(&self) -> DateTime<Utc> {
        self.question.pub_date
    }

    fn tiebreak(&self) -> u32 {
        self.id
    }
}


#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn new_question_keeps_millisecond_precision() {
        let question = QuestionCore::new("What's up?", Utc::now());
        assert_eq!(question.pub_date.nanosecond() % 1_000_000, 0);
    }

    #[test]
    fn recency_is_relative_to_now() {
        let now = Utc::now();
        let question = QuestionCore::new("What's new?", now - Duration::hours(2));
        assert!(question.was_published_recently(now));
        assert!(!question.was_published_recently(now + Duration::days(2)));
    }
}
