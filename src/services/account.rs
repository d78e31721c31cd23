use color_eyre::Result;

use crate::db::Db;
use crate::validation::SignupDraft;

// ---------------------------------------------------------------------------
// AccountRepository trait (the service defines the abstraction it needs)
// ---------------------------------------------------------------------------

#[cfg_attr(test, mockall::automock)]
pub trait AccountRepository: Send + Sync {
    fn email_exists(&self, email: &str) -> impl std::future::Future<Output = Result<bool>> + Send;

    /// Hashes `password` and stores the user. Returns the new user id, or
    /// `None` when the email was taken by a concurrent signup.
    fn create_user(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> impl std::future::Future<Output = Result<Option<i64>>> + Send;

    fn verify_user_password(
        &self,
        email: &str,
        password: &str,
    ) -> impl std::future::Future<Output = Result<bool>> + Send;
}

// ---------------------------------------------------------------------------
// Outcome enums
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum SignupOutcome {
    /// User stored. Contains the new user id.
    Created(i64),
    /// Email already in use.
    EmailTaken,
}

#[derive(Debug)]
pub enum LoginOutcome {
    Success,
    /// Password was incorrect (or email not found).
    InvalidCredentials,
}

// ---------------------------------------------------------------------------
// AccountService
// ---------------------------------------------------------------------------

pub struct AccountService<R: AccountRepository = Db> {
    repo: R,
}

impl<R: AccountRepository + Clone> Clone for AccountService<R> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
        }
    }
}

impl<R: AccountRepository> AccountService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub async fn signup(&self, draft: &SignupDraft<'_>) -> Result<SignupOutcome> {
        if self.repo.email_exists(draft.email).await? {
            return Ok(SignupOutcome::EmailTaken);
        }

        match self
            .repo
            .create_user(draft.username, draft.email, draft.password)
            .await?
        {
            Some(user_id) => Ok(SignupOutcome::Created(user_id)),
            None => Ok(SignupOutcome::EmailTaken),
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome> {
        if email.is_empty() || password.is_empty() {
            return Ok(LoginOutcome::InvalidCredentials);
        }

        if self.repo.verify_user_password(email, password).await? {
            Ok(LoginOutcome::Success)
        } else {
            Ok(LoginOutcome::InvalidCredentials)
        }
    }
}
