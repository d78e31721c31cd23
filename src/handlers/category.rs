use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use crate::{
    db::{Category, Db, Filter, Store, Table},
    extractors::JsonBody,
    integrity,
    models::CategoryBody,
    names,
    rejections::{AppError, ResultExt},
    validation, AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/categories/{id}",
            get(get_category)
                .put(rename_category)
                .delete(delete_category),
        )
}

async fn create_category(
    State(db): State<Db>,
    JsonBody(body): JsonBody<CategoryBody>,
) -> Result<&'static str, AppError> {
    let name = validation::category(&body)?;

    integrity::create_category(&db, name)
        .await
        .reject(names::CATEGORY_CREATE_FAILED)?;

    Ok(names::CATEGORY_CREATED)
}

async fn list_categories(State(mut db): State<Db>) -> Result<Json<Vec<Category>>, AppError> {
    let categories = db
        .list(Table::Categories, &Filter::all())
        .await
        .reject(names::CATEGORIES_FETCH_FAILED)?;
    Ok(Json(categories))
}

async fn get_category(
    State(mut db): State<Db>,
    Path(id): Path<i64>,
) -> Result<Json<Category>, AppError> {
    db.get(Table::Categories, &Filter::by("id", id))
        .await
        .reject(names::CATEGORY_FETCH_FAILED)?
        .map(Json)
        .ok_or(AppError::NotFound(names::CATEGORY_NOT_FOUND))
}

async fn rename_category(
    State(db): State<Db>,
    Path(id): Path<i64>,
    JsonBody(body): JsonBody<CategoryBody>,
) -> Result<&'static str, AppError> {
    let name = validation::category(&body)?;

    integrity::rename_category(&db, id, name)
        .await
        .reject(names::CATEGORY_UPDATE_FAILED)?;

    Ok(names::CATEGORY_UPDATED)
}

async fn delete_category(
    State(db): State<Db>,
    Path(id): Path<i64>,
) -> Result<&'static str, AppError> {
    integrity::delete_category(&db, id)
        .await
        .reject(names::CATEGORY_DELETE_FAILED)?;

    Ok(names::CATEGORY_DELETED)
}
