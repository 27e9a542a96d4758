use log::info;

use crate::error::{Error, Result};
use crate::model::{common::ChoiceId, db::question::Question};
use crate::store::PollStore;

/// Interpret the raw `choice` form field. A missing field and one that isn't
/// a choice ID at all are treated the same: nothing was selected.
pub fn selected_choice(field: Option<&str>) -> Result<ChoiceId> {
    field
        .and_then(|raw| raw.trim().parse().ok())
        .ok_or(Error::ChoiceNotSelected)
}

/// Count one vote for the choice selected on `question`'s form.
///
/// Fails with [`Error::ChoiceNotSelected`] without changing any tally if the
/// field does not name one of the question's choices. Otherwise the tally is
/// incremented by the store in a single atomic update.
pub async fn cast_vote(
    store: &dyn PollStore,
    question: &Question,
    choice_field: Option<&str>,
) -> Result<()> {
    let choice = selected_choice(choice_field)?;
    if !store.increment_votes(question.id, choice).await? {
        return Err(Error::ChoiceNotSelected);
    }
    info!("Counted vote for choice {choice} of question {}", question.id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rocket::futures::future::join_all;

    use crate::model::db::{choice::NewChoice, question::NewQuestion};
    use crate::store::MemoryStore;

    use super::*;

    async fn question_with_choices(store: &MemoryStore, choices: &[&str]) -> Question {
        let question = store
            .insert_question(NewQuestion::published_in("Which one?", -1))
            .await
            .unwrap();
        for text in choices {
            store
                .insert_choice(NewChoice::new(question.id, *text))
                .await
                .unwrap();
        }
        question
    }

    async fn tallies(store: &MemoryStore, question: &Question) -> Vec<u32> {
        store
            .choices(question.id)
            .await
            .unwrap()
            .iter()
            .map(|choice| choice.votes)
            .collect()
    }

    #[test]
    fn parse_selection() {
        assert_eq!(selected_choice(Some("3")).unwrap(), 3);
        assert_eq!(selected_choice(Some(" 12 ")).unwrap(), 12);
        assert!(matches!(selected_choice(None), Err(Error::ChoiceNotSelected)));
        assert!(matches!(selected_choice(Some("")), Err(Error::ChoiceNotSelected)));
        assert!(matches!(selected_choice(Some("two")), Err(Error::ChoiceNotSelected)));
        assert!(matches!(selected_choice(Some("-1")), Err(Error::ChoiceNotSelected)));
    }

    #[rocket::async_test]
    async fn missing_choice_changes_nothing() {
        let store = MemoryStore::new();
        let question = question_with_choices(&store, &["A", "B"]).await;

        let result = cast_vote(&store, &question, None).await;
        assert!(matches!(result, Err(Error::ChoiceNotSelected)));
        assert_eq!(tallies(&store, &question).await, vec![0, 0]);
    }

    #[rocket::async_test]
    async fn unknown_choice_changes_nothing() {
        let store = MemoryStore::new();
        let question = question_with_choices(&store, &["A", "B"]).await;
        let other = question_with_choices(&store, &["C"]).await;
        let foreign = store.choices(other.id).await.unwrap()[0].id.to_string();

        for field in ["999", "abc", foreign.as_str()] {
            let result = cast_vote(&store, &question, Some(field)).await;
            assert!(matches!(result, Err(Error::ChoiceNotSelected)));
        }
        assert_eq!(tallies(&store, &question).await, vec![0, 0]);
        assert_eq!(tallies(&store, &other).await, vec![0]);
    }

    #[rocket::async_test]
    async fn vote_increments_only_selected_choice() {
        let store = MemoryStore::new();
        let question = question_with_choices(&store, &["A", "B", "C"]).await;
        let second = store.choices(question.id).await.unwrap()[1].id;

        cast_vote(&store, &question, Some(second.to_string().as_str()))
            .await
            .unwrap();
        assert_eq!(tallies(&store, &question).await, vec![0, 1, 0]);
    }

    #[rocket::async_test]
    async fn simultaneous_votes_all_count() {
        const VOTERS: u32 = 100;

        let store = Arc::new(MemoryStore::new());
        let question = question_with_choices(&store, &["Yes", "No"]).await;
        let yes = store.choices(question.id).await.unwrap()[0].id.to_string();

        let votes = (0..VOTERS).map(|_| {
            let store = store.clone();
            let question = question.clone();
            let yes = yes.clone();
            rocket::tokio::spawn(async move {
                cast_vote(store.as_ref(), &question, Some(yes.as_str())).await
            })
        });
        for vote in join_all(votes).await {
            vote.unwrap().unwrap();
        }

        assert_eq!(tallies(&store, &question).await, vec![VOTERS, 0]);
    }
}
