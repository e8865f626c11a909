use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A user row as stored. Holds the password hash, so it is deliberately not `Serialize`;
/// anything leaving the store for a caller goes through [`PublicUser`].
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub hashed_password: String,
    pub nick_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The caller-visible view of a user. Has no password field at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: i32,
    pub email: String,
    pub nick_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            nick_name: user.nick_name,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Payload for `PATCH /user`.
#[derive(Debug, Default, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserInput {
    #[validate(length(max = 50))]
    pub nick_name: Option<String>,
}
