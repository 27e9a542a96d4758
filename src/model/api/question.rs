use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{
    common::{ChoiceId, QuestionId},
    db::{choice::Choice, question::Question},
};

/// An API-friendly view of a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionSummary {
    pub id: QuestionId,
    pub question_text: String,
    pub pub_date: DateTime<Utc>,
    /// Published within the day before the response was made.
    pub was_published_recently: bool,
}

impl QuestionSummary {
    pub fn new(question: &Question, now: DateTime<Utc>) -> Self {
        Self {
            id: question.id,
            question_text: question.question_text.clone(),
            pub_date: question.pub_date,
            was_published_recently: question.was_published_recently(now),
        }
    }
}

/// The index page: the newest published questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatestQuestions {
    pub latest_question_list: Vec<QuestionSummary>,
}

impl LatestQuestions {
    pub fn new(questions: &[Question], now: DateTime<Utc>) -> Self {
        Self {
            latest_question_list: questions
                .iter()
                .map(|question| QuestionSummary::new(question, now))
                .collect(),
        }
    }
}

/// A choice as offered on the voting form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceDescription {
    pub id: ChoiceId,
    pub choice_text: String,
}

/// A question with the choices to vote between.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDetail {
    pub question: QuestionSummary,
    pub choices: Vec<ChoiceDescription>,
    /// Set when a vote was rejected and the form is shown again.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl QuestionDetail {
    pub fn new(question: &Question, choices: &[Choice], now: DateTime<Utc>) -> Self {
        Self {
            question: QuestionSummary::new(question, now),
            choices: choices
                .iter()
                .map(|choice| ChoiceDescription {
                    id: choice.id,
                    choice_text: choice.choice_text.clone(),
                })
                .collect(),
            error_message: None,
        }
    }

    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }
}

/// A choice together with its tally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceTally {
    pub id: ChoiceId,
    pub choice_text: String,
    pub votes: u32,
}

impl From<&Choice> for ChoiceTally {
    fn from(choice: &Choice) -> Self {
        Self {
            id: choice.id,
            choice_text: choice.choice_text.clone(),
            votes: choice.votes,
        }
    }
}

/// A question with the current tally of every choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionResults {
    pub question: QuestionSummary,
    pub choices: Vec<ChoiceTally>,
}

impl QuestionResults {
    pub fn new(question: &Question, choices: &[Choice], now: DateTime<Utc>) -> Self {
        Self {
            question: QuestionSummary::new(question, now),
            choices: choices.iter().map(ChoiceTally::from).collect(),
        }
    }
}
