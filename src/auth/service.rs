//! Registration and login.
//!
//! Registration checks that the username is free, hashes the password and
//! stores the new user. Login looks the user up, verifies the password against
//! the stored hash and issues a token. Both failure paths of login produce the
//! same `InvalidCredentials` error and both run one bcrypt verification.

use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::token::TokenService;
use crate::error::AppError;
use crate::models::User;
use crate::store::UserStore;

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    tokens: TokenService,
    bcrypt_cost: u32,
    // Verified against when the username is unknown.
    decoy_hash: Arc<OnceCell<String>>,
}

const DECOY_PASSWORD: &str = "decoy-password-for-unknown-users";

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, tokens: TokenService, bcrypt_cost: u32) -> Self {
        Self {
            users,
            tokens,
            bcrypt_cost,
            decoy_hash: Arc::new(OnceCell::new()),
        }
    }

    /// Creates a new account.
    ///
    /// The existence check and the insert are separate store calls. Two
    /// concurrent registrations of the same name can both pass the check; the
    /// store's unique constraint then rejects the second insert.
    pub async fn register(&self, username: &str, password: &str) -> Result<User, AppError> {
        if self.users.exists_by_username(username).await? {
            log::info!("Registration rejected, username taken: {}", username);
            return Err(AppError::DuplicateUsername(username.to_string()));
        }

        let password_hash = self.hash(password).await?;
        let user = self
            .users
            .insert(User::new(username.to_string(), password_hash))
            .await?;

        log::info!("Registered user {} ({})", user.username, user.id);
        Ok(user)
    }

    /// Verifies credentials and returns a signed token for the user.
    pub async fn login(&self, username: &str, password: &str) -> Result<String, AppError> {
        let user = self.users.find_by_username(username).await?;
        let verified = match &user {
            Some(user) => self.verify(password, &user.password_hash).await?,
            None => {
                self.verify(password, self.decoy_hash().await?).await?;
                false
            }
        };

        let user = match user {
            Some(user) if verified => user,
            _ => {
                log::warn!("Failed login for {}", username);
                return Err(AppError::InvalidCredentials);
            }
        };

        let token = self.tokens.issue(&user.username)?;
        log::info!("User {} logged in", user.username);
        Ok(token)
    }

    // bcrypt is deliberately slow; keep it off the async workers.
    async fn hash(&self, password: &str) -> Result<String, AppError> {
        let password = password.to_string();
        let cost = self.bcrypt_cost;
        tokio::task::spawn_blocking(move || hash_password(&password, cost))
            .await
            .map_err(|e| AppError::Internal(format!("password hashing task failed: {}", e)))?
    }

    /// Hash of a fixed password at the configured cost, made on first use.
    async fn decoy_hash(&self) -> Result<&str, AppError> {
        self.decoy_hash
            .get_or_try_init(|| self.hash(DECOY_PASSWORD))
            .await
            .map(String::as_str)
    }

    async fn verify(&self, password: &str, hash: &str) -> Result<bool, AppError> {
        let password = password.to_string();
        let hash = hash.to_string();
        tokio::task::spawn_blocking(move || verify_password(&password, &hash))
            .await
            .map_err(|e| AppError::Internal(format!("password verification task failed: {}", e)))?
    }
}
