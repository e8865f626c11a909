use std::sync::Arc;
use tokio::sync::OnceCell;

use crate::auth::password::PasswordHasher;
use crate::auth::token::TokenService;
use crate::error::AppError;
use crate::store::{StoreError, UserStore};

/// Signup and login. Holds no per-request state; everything durable lives in the store.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    tokens: TokenService,
    /// Hash checked against when the email is unknown, so both login failures cost one verify.
    dummy_hash: Arc<OnceCell<String>>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, hasher: PasswordHasher, tokens: TokenService) -> Self {
        Self {
            users,
            hasher,
            tokens,
            dummy_hash: Arc::new(OnceCell::new()),
        }
    }

    /// Hashes the password and creates the user. No token is issued here.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<(), AppError> {
        let hashed = self.hasher.hash_password(password).await?;
        match self.users.create_user(email, &hashed).await {
            Ok(user) => {
                log::info!("registered user {}", user.id);
                Ok(())
            }
            Err(StoreError::UniqueViolation(_)) => Err(AppError::EmailTaken),
            Err(e) => {
                log::error!("failed to create user: {}", e);
                Err(e.into())
            }
        }
    }

    /// Returns a fresh access token. Unknown email and wrong password both yield
    /// `InvalidCredentials`.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, AppError> {
        let user = match self.users.find_user_by_email(email).await? {
            Some(user) => user,
            None => {
                let dummy = self
                    .dummy_hash
                    .get_or_try_init(|| self.hasher.hash_password("tasknest-dummy-password"))
                    .await?;
                self.hasher.verify_password(password, dummy).await?;
                log::warn!("login rejected: unknown account");
                return Err(AppError::InvalidCredentials);
            }
        };

        if !self
            .hasher
            .verify_password(password, &user.hashed_password)
            .await?
        {
            log::warn!("login rejected for user {}", user.id);
            return Err(AppError::InvalidCredentials);
        }

        let token = self
            .tokens
            .issue(user.id, &user.email)
            .map_err(|e| AppError::InternalServerError(e.to_string()))?;
        log::info!("user {} logged in", user.id);
        Ok(token)
    }
}
