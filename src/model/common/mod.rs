//! Domain rules shared by the database and API layers.

mod recency;
mod visibility;
mod vote;

pub use recency::{recency_window, was_published_recently};
pub use visibility::{latest_visible, Publication, LATEST_QUESTIONS_LIMIT};
pub use vote::{cast_vote, selected_choice};

/// Questions are numbered from 1 in creation order.
pub type QuestionId = u32;

/// Choices are numbered from 1 in creation order, across all questions.
pub type ChoiceId = u32;

pub type AdminId = u32;
