pub mod db;
pub mod extractors;
pub mod handlers;
pub mod integrity;
pub mod models;
pub mod names;
pub mod rejections;
pub mod services;
pub mod validation;

use axum::{extract::FromRef, Router};
use tower_http::trace::TraceLayer;

use db::Db;
use services::account::AccountService;

#[derive(Clone)]
pub struct AppState {
    pub db: Db,
    pub accounts: AccountService,
}

impl AppState {
    pub fn new(db: Db) -> Self {
        Self {
            accounts: AccountService::new(db.clone()),
            db,
        }
    }
}

impl FromRef<AppState> for Db {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}

impl FromRef<AppState> for AccountService {
    fn from_ref(state: &AppState) -> Self {
        state.accounts.clone()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(handlers::account::routes())
        .merge(handlers::quiz::routes())
        .merge(handlers::question::routes())
        .merge(handlers::result::routes())
        .merge(handlers::session::routes())
        .merge(handlers::category::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
