use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use crate::{
    db::{Db, Filter, Quiz, Record, Store, Table},
    extractors::JsonBody,
    models::QuizBody,
    names,
    rejections::{AppError, ResultExt},
    validation, AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/quizzes", get(list_quizzes).post(create_quiz))
        .route("/quizzes/{quiz_id}", get(get_quiz))
}

async fn list_quizzes(State(mut db): State<Db>) -> Result<Json<Vec<Quiz>>, AppError> {
    let quizzes = db
        .list(Table::Quizzes, &Filter::all())
        .await
        .reject(names::QUIZZES_FETCH_FAILED)?;
    Ok(Json(quizzes))
}

async fn create_quiz(
    State(mut db): State<Db>,
    JsonBody(body): JsonBody<QuizBody>,
) -> Result<Json<Quiz>, AppError> {
    let title = validation::quiz(&body)?;

    let id = db
        .insert(Table::Quizzes, &Record::new().set("title", title))
        .await
        .reject(names::QUIZ_CREATE_FAILED)?;

    tracing::info!("new quiz created with id: {id}");
    Ok(Json(Quiz {
        id,
        title: title.to_string(),
    }))
}

async fn get_quiz(
    State(mut db): State<Db>,
    Path(quiz_id): Path<i64>,
) -> Result<Json<Quiz>, AppError> {
    db.get(Table::Quizzes, &Filter::by("id", quiz_id))
        .await
        .reject(names::QUIZ_FETCH_FAILED)?
        .map(Json)
        .ok_or(AppError::NotFound(names::QUIZ_NOT_FOUND))
}
