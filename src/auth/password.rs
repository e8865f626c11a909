use actix_web::web;
use bcrypt::{hash, verify};

use crate::error::AppError;

/// Work factor used for every stored password.
pub const BCRYPT_COST: u32 = 12;

/// Salted bcrypt hashing. Both operations run on the blocking pool so a slow hash never
/// stalls the worker that is serving other requests.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self { cost: BCRYPT_COST }
    }
}

impl PasswordHasher {
    /// Only tests should pick a cost other than `BCRYPT_COST`.
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }

    pub async fn hash_password(&self, password: &str) -> Result<String, AppError> {
        let password = password.to_owned();
        let cost = self.cost;
        web::block(move || hash(password, cost))
            .await?
            .map_err(|e| AppError::InternalServerError(format!("Failed to hash password: {}", e)))
    }

    /// Returns `false` for a wrong password and for a stored hash bcrypt cannot parse.
    pub async fn verify_password(&self, password: &str, hashed_password: &str) -> Result<bool, AppError> {
        let password = password.to_owned();
        let hashed_password = hashed_password.to_owned();
        let outcome = web::block(move || verify(password, &hashed_password)).await?;
        match outcome {
            Ok(matches) => Ok(matches),
            Err(e) => {
                log::warn!("Stored password hash could not be verified: {}", e);
                Ok(false)
            }
        }
    }
}
