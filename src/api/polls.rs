use chrono::{DateTime, Utc};
use rocket::{form::Form, response::Redirect, serde::json::Json, Route, State};

use crate::error::{Error, Result};
use crate::model::{
    api::question::{LatestQuestions, QuestionDetail, QuestionResults},
    common::{cast_vote, Publication, QuestionId, LATEST_QUESTIONS_LIMIT},
    db::question::Question,
};
use crate::store::{PollStore, Store};

pub fn routes() -> Vec<Route> {
    routes![index, detail, results, vote]
}

#[get("/polls")]
pub async fn index(store: &State<Store>) -> Result<Json<LatestQuestions>> {
    let now = Utc::now();
    let questions = store.latest_questions(now, LATEST_QUESTIONS_LIMIT).await?;
    Ok(Json(LatestQuestions::new(&questions, now)))
}

#[get("/polls/<question_id>")]
pub async fn detail(question_id: QuestionId, store: &State<Store>) -> Result<Json<QuestionDetail>> {
    let now = Utc::now();
    let question = published_question(store.inner().as_ref(), question_id, now).await?;
    let choices = store.choices(question_id).await?;
    Ok(Json(QuestionDetail::new(&question, &choices, now)))
}

#[get("/polls/<question_id>/results")]
pub async fn results(
    question_id: QuestionId,
    store: &State<Store>,
) -> Result<Json<QuestionResults>> {
    let now = Utc::now();
    let question = published_question(store.inner().as_ref(), question_id, now).await?;
    let choices = store.choices(question_id).await?;
    Ok(Json(QuestionResults::new(&question, &choices, now)))
}

/// The voting form. `choice` holds the ID of the selected choice, if any.
#[derive(Debug, FromForm)]
pub struct VoteForm {
    choice: Option<String>,
}

#[derive(Responder)]
pub enum VoteResponse {
    /// The vote was counted; go and see the results.
    Counted(Redirect),
    /// Nothing was selected; show the form again with an error message.
    Rejected(Json<QuestionDetail>),
}

/// Without a form body at all, nothing was selected either.
#[post("/polls/<question_id>/vote", data = "<form>")]
pub async fn vote(
    question_id: QuestionId,
    form: Option<Form<VoteForm>>,
    store: &State<Store>,
) -> Result<VoteResponse> {
    let now = Utc::now();
    let question = published_question(store.inner().as_ref(), question_id, now).await?;

    let choice = form.as_ref().and_then(|form| form.choice.as_deref());
    match cast_vote(store.inner().as_ref(), &question, choice).await {
        Ok(()) => Ok(VoteResponse::Counted(Redirect::to(uri!(results(question_id))))),
        Err(err @ Error::ChoiceNotSelected) => {
            let choices = store.choices(question_id).await?;
            let detail = QuestionDetail::new(&question, &choices, now).with_error(err.to_string());
            Ok(VoteResponse::Rejected(Json(detail)))
        }
        Err(err) => Err(err),
    }
}

/// Look up a question, treating one that is not yet published as missing.
async fn published_question(
    store: &dyn PollStore,
    question_id: QuestionId,
    now: DateTime<Utc>,
) -> Result<Question> {
    store
        .question(question_id)
        .await?
        .filter(|question| question.is_published(now))
        .ok_or_else(|| Error::not_found(format!("Question with ID '{question_id}'")))
}
