// Question routes that are not nested under a quiz.

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};

use crate::{
    db::{Db, Filter, Question, Store, Table, UserAnswer},
    extractors::JsonBody,
    integrity,
    models::{LegacyQuestionBody, QuestionNoteBody, UserAnswerBody},
    names,
    rejections::{AppError, ResultExt},
    validation, AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/questions", post(create_question))
        .route("/questions/{id}", get(get_question).put(annotate_question))
        .route("/questions/{id}/answers", post(submit_answer))
        .route("/questions/{id}/answers/{user_id}", get(user_answer))
}

async fn create_question(
    State(db): State<Db>,
    JsonBody(body): JsonBody<LegacyQuestionBody>,
) -> Result<&'static str, AppError> {
    let (quiz_id, draft) = validation::legacy_question(&body)?;

    integrity::create_question(&db, quiz_id, &draft)
        .await
        .reject(names::QUESTION_ADD_FAILED)?;

    Ok(names::QUESTION_ADDED)
}

async fn get_question(
    State(mut db): State<Db>,
    Path(id): Path<i64>,
) -> Result<Json<Question>, AppError> {
    db.get(Table::Questions, &Filter::by("id", id))
        .await
        .reject(names::QUESTION_FETCH_FAILED)?
        .map(Json)
        .ok_or(AppError::NotFound(names::QUESTION_NOT_FOUND))
}

async fn annotate_question(
    State(db): State<Db>,
    Path(id): Path<i64>,
    JsonBody(body): JsonBody<QuestionNoteBody>,
) -> Result<&'static str, AppError> {
    let draft = validation::note(&body)?;

    integrity::annotate_question(&db, id, &draft)
        .await
        .reject(names::QUESTION_UPDATE_FAILED)?;

    Ok(names::QUESTION_UPDATED)
}

async fn submit_answer(
    State(db): State<Db>,
    Path(id): Path<i64>,
    JsonBody(body): JsonBody<UserAnswerBody>,
) -> Result<&'static str, AppError> {
    let draft = validation::user_answer(&body)?;

    integrity::submit_answer(&db, id, &draft)
        .await
        .reject(names::ANSWER_SUBMIT_FAILED)?;

    Ok(names::ANSWER_SUBMITTED)
}

async fn user_answer(
    State(mut db): State<Db>,
    Path((id, user_id)): Path<(i64, i64)>,
) -> Result<Json<UserAnswer>, AppError> {
    db.get(
        Table::UserAnswers,
        &Filter::by("question_id", id).and("user_id", user_id),
    )
    .await
    .reject(names::ANSWER_FETCH_FAILED)?
    .map(Json)
    .ok_or(AppError::NotFound(names::ANSWER_NOT_FOUND))
}
