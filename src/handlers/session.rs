use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use crate::{
    db::{Db, Filter, QuizSession, Store, Table},
    extractors::JsonBody,
    integrity,
    models::SessionBody,
    names,
    rejections::{AppError, ResultExt},
    validation, AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/sessions", get(list_sessions).post(create_session))
        .route("/sessions/{id}", get(get_session))
}

async fn create_session(
    State(db): State<Db>,
    JsonBody(body): JsonBody<SessionBody>,
) -> Result<&'static str, AppError> {
    let draft = validation::session(&body)?;

    integrity::create_session(&db, &draft)
        .await
        .reject(names::SESSION_CREATE_FAILED)?;

    Ok(names::SESSION_CREATED)
}

async fn list_sessions(State(mut db): State<Db>) -> Result<Json<Vec<QuizSession>>, AppError> {
    let sessions = db
        .list(Table::Sessions, &Filter::all())
        .await
        .reject(names::SESSIONS_FETCH_FAILED)?;
    Ok(Json(sessions))
}

async fn get_session(
    State(mut db): State<Db>,
    Path(id): Path<i64>,
) -> Result<Json<QuizSession>, AppError> {
    db.get(Table::Sessions, &Filter::by("id", id))
        .await
        .reject(names::SESSION_FETCH_FAILED)?
        .map(Json)
        .ok_or(AppError::NotFound(names::SESSION_NOT_FOUND))
}
