use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};

use crate::{
    db::{Db, Filter, QuizResult, Store, Table},
    extractors::JsonBody,
    integrity,
    models::QuizAnswersBody,
    names,
    rejections::{AppError, ResultExt},
    validation, AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/quizzes/{quiz_id}/answers", post(submit_answers))
        .route("/quizzes/{quiz_id}/results/{user_id}", get(quiz_result))
}

async fn submit_answers(
    State(db): State<Db>,
    Path(quiz_id): Path<i64>,
    JsonBody(body): JsonBody<QuizAnswersBody>,
) -> Result<&'static str, AppError> {
    let draft = validation::quiz_answers(&body)?;

    integrity::submit_quiz_answers(&db, quiz_id, &draft)
        .await
        .reject(names::ANSWER_SUBMIT_FAILED)?;

    Ok(names::ANSWERS_SUBMITTED)
}

async fn quiz_result(
    State(mut db): State<Db>,
    Path((quiz_id, user_id)): Path<(i64, i64)>,
) -> Result<Json<QuizResult>, AppError> {
    db.get(
        Table::Results,
        &Filter::by("user_id", user_id).and("quiz_id", quiz_id),
    )
    .await
    .reject(names::RESULT_FETCH_FAILED)?
    .map(Json)
    .ok_or(AppError::NotFound(names::RESULT_NOT_FOUND))
}
