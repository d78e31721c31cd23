mod crud;
mod question;
mod submission;

use axum::Router;

use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(crud::routes())
        .merge(question::routes())
        .merge(submission::routes())
}
