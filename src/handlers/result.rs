use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};

use crate::{
    db::{Db, Filter, QuizResult, Store, Table},
    extractors::JsonBody,
    integrity,
    models::ResultBody,
    names,
    rejections::{AppError, ResultExt},
    validation, AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/results", post(record_result))
        .route("/results/{user_id}/{quiz_id}", get(get_result))
}

async fn record_result(
    State(db): State<Db>,
    JsonBody(body): JsonBody<ResultBody>,
) -> Result<&'static str, AppError> {
    let draft = validation::result(&body)?;

    integrity::record_result(&db, &draft)
        .await
        .reject(names::RESULT_SAVE_FAILED)?;

    Ok(names::RESULT_SAVED)
}

async fn get_result(
    State(mut db): State<Db>,
    Path((user_id, quiz_id)): Path<(i64, i64)>,
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
