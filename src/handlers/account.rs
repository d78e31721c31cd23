use axum::{extract::State, routing::post, Router};

use crate::{
    extractors::JsonBody,
    models::{LoginBody, SignupBody},
    names,
    rejections::{AppError, ResultExt},
    services::account::{AccountService, LoginOutcome, SignupOutcome},
    validation, AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
}

async fn signup(
    State(accounts): State<AccountService>,
    JsonBody(body): JsonBody<SignupBody>,
) -> Result<&'static str, AppError> {
    let draft = validation::signup(&body)?;

    match accounts
        .signup(&draft)
        .await
        .reject(names::SIGNUP_FAILED)?
    {
        SignupOutcome::Created(_) => Ok(names::SIGNUP_OK),
        SignupOutcome::EmailTaken => Err(AppError::Conflict(names::USER_EXISTS)),
    }
}

async fn login(
    State(accounts): State<AccountService>,
    JsonBody(body): JsonBody<LoginBody>,
) -> Result<&'static str, AppError> {
    match accounts
        .login(&body.email, &body.password)
        .await
        .reject(names::LOGIN_FAILED)?
    {
        LoginOutcome::Success => Ok(names::LOGIN_OK),
        LoginOutcome::InvalidCredentials => Err(AppError::Unauthorized),
    }
}
