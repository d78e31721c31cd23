use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use crate::{
    db::{Answer, Db, Filter, Question, QuestionWithAnswers, Store, Table},
    extractors::JsonBody,
    integrity,
    models::QuestionBody,
    names,
    rejections::{AppError, ResultExt},
    validation, AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/quizzes/{quiz_id}/questions",
            get(list_questions).post(add_question),
        )
        .route(
            "/quizzes/{quiz_id}/questions/{question_id}",
            get(get_question).put(update_question).delete(delete_question),
        )
}

async fn list_questions(
    State(mut db): State<Db>,
    Path(quiz_id): Path<i64>,
) -> Result<Json<Vec<Question>>, AppError> {
    let questions = db
        .list(Table::Questions, &Filter::by("quiz_id", quiz_id))
        .await
        .reject(names::QUESTIONS_FETCH_FAILED)?;
    Ok(Json(questions))
}

async fn add_question(
    State(db): State<Db>,
    Path(quiz_id): Path<i64>,
    JsonBody(body): JsonBody<QuestionBody>,
) -> Result<&'static str, AppError> {
    let draft = validation::question(&body)?;

    integrity::create_question(&db, quiz_id, &draft)
        .await
        .reject(names::QUESTION_ADD_FAILED)?;

    Ok(names::QUESTION_ADDED)
}

async fn get_question(
    State(mut db): State<Db>,
    Path((quiz_id, question_id)): Path<(i64, i64)>,
) -> Result<Json<QuestionWithAnswers>, AppError> {
    let question: Question = db
        .get(
            Table::Questions,
            &Filter::by("quiz_id", quiz_id).and("id", question_id),
        )
        .await
        .reject(names::QUESTION_FETCH_FAILED)?
        .ok_or(AppError::NotFound(names::QUESTION_NOT_FOUND))?;

    let answers: Vec<Answer> = db
        .list(Table::Answers, &Filter::by("question_id", question_id))
        .await
        .reject(names::QUESTION_FETCH_FAILED)?;

    Ok(Json(QuestionWithAnswers { question, answers }))
}

async fn update_question(
    State(db): State<Db>,
    Path((quiz_id, question_id)): Path<(i64, i64)>,
    JsonBody(body): JsonBody<QuestionBody>,
) -> Result<&'static str, AppError> {
    let draft = validation::question(&body)?;

    integrity::replace_question(&db, quiz_id, question_id, &draft)
        .await
        .reject(names::QUESTION_UPDATE_FAILED)?;

    Ok(names::QUESTION_UPDATED)
}

async fn delete_question(
    State(db): State<Db>,
    Path((quiz_id, question_id)): Path<(i64, i64)>,
) -> Result<&'static str, AppError> {
    integrity::delete_question(&db, quiz_id, question_id)
        .await
        .reject(names::QUESTION_DELETE_FAILED)?;

    Ok(names::QUESTION_DELETED)
}
