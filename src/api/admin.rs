use chrono::Utc;
use log::info;
use rocket::{http::Status, serde::json::Json, Route, State};

use crate::{
    error::{Error, Result},
    model::{
        api::{
            admin::{ChoiceSpec, QuestionSpec},
            auth::AuthToken,
            question::{ChoiceTally, QuestionResults, QuestionSummary},
        },
        common::QuestionId,
        db::choice::NewChoice,
    },
    store::Store,
};

pub fn routes() -> Vec<Route> {
    routes![all_questions, create_question, add_choice, delete_question]
}

#[get("/admin/questions")]
pub async fn all_questions(
    _token: AuthToken,
    store: &State<Store>,
) -> Result<Json<Vec<QuestionSummary>>> {
    let now = Utc::now();
    let questions = store.all_questions().await?;
    Ok(Json(
        questions
            .iter()
            .map(|question| QuestionSummary::new(question, now))
            .collect(),
    ))
}

#[post("/admin/questions", data = "<spec>", format = "json")]
pub async fn create_question(
    token: AuthToken,
    spec: Json<QuestionSpec>,
    store: &State<Store>,
) -> Result<(Status, Json<QuestionResults>)> {
    let now = Utc::now();
    let (question, choice_texts) = spec.into_inner().into_parts(now)?;

    let question = store.insert_question(question).await?;
    let mut choices = Vec::with_capacity(choice_texts.len());
    for text in choice_texts {
        choices.push(store.insert_choice(NewChoice::new(question.id, text)).await?);
    }
    info!(
        "Admin {} created question {} with {} choices",
        token.id,
        question.id,
        choices.len()
    );

    Ok((
        Status::Created,
        Json(QuestionResults::new(&question, &choices, now)),
    ))
}

#[post("/admin/questions/<question_id>/choices", data = "<spec>", format = "json")]
pub async fn add_choice(
    _token: AuthToken,
    question_id: QuestionId,
    spec: Json<ChoiceSpec>,
    store: &State<Store>,
) -> Result<(Status, Json<ChoiceTally>)> {
    let choice = spec.into_inner().into_choice(question_id)?;
    let choice = store.insert_choice(choice).await?;
    Ok((Status::Created, Json(ChoiceTally::from(&choice))))
}

#[delete("/admin/questions/<question_id>")]
pub async fn delete_question(
    token: AuthToken,
    question_id: QuestionId,
    store: &State<Store>,
) -> Result<()> {
    if !store.delete_question(question_id).await? {
        return Err(Error::not_found(format!("Question with ID '{question_id}'")));
    }
    info!("Admin {} deleted question {question_id}", token.id);
    Ok(())
}
