use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use color_eyre::Result;
use rand::rngs::OsRng;

use super::models::User;
use super::store::{Filter, Record, Table};
use super::{is_unique_violation, ops, Db};
use crate::services::account::AccountRepository;

impl AccountRepository for Db {
    async fn email_exists(&self, email: &str) -> Result<bool> {
        let user: Option<User> =
            ops::fetch_optional(&self.pool, Table::Users, &Filter::by("email", email)).await?;
        Ok(user.is_some())
    }

    async fn create_user(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Option<i64>> {
        let password_hash = hash_password(password).await?;
        let inserted = ops::insert(
            &self.pool,
            Table::Users,
            &Record::new()
                .set("username", username)
                .set("email", email)
                .set("password", password_hash),
        )
        .await;

        match inserted {
            Ok(user_id) => {
                tracing::info!("new user created: id={user_id}, email={email}");
                Ok(Some(user_id))
            }
            Err(e) if is_unique_violation(&e) => {
                tracing::debug!("email already registered: {email}");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn verify_user_password(&self, email: &str, password: &str) -> Result<bool> {
        let user: Option<User> =
            ops::fetch_optional(&self.pool, Table::Users, &Filter::by("email", email)).await?;

        match user {
            Some(user) => verify_password(password, &user.password).await,
            None => Ok(false),
        }
    }
}

async fn hash_password(password: &str) -> Result<String> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| color_eyre::eyre::eyre!("failed to hash password: {e}"))
    })
    .await?
}

async fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let password = password.to_string();
    let hash = hash.to_string();
    let verified = tokio::task::spawn_blocking(move || {
        let parsed_hash = match PasswordHash::new(&hash) {
            Ok(h) => h,
            Err(_) => return false,
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    })
    .await?;
    Ok(verified)
}
