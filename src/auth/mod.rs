pub mod cookies;
pub mod extractors;
pub mod middleware;
pub mod password;
pub mod service;
pub mod token;

use serde::{Deserialize, Serialize};
use validator::Validate;

pub use extractors::AuthenticatedUser;
pub use middleware::IdentityMiddleware;
pub use password::PasswordHasher;
pub use service::AuthService;
pub use token::{Claims, TokenError, TokenService};

/// Body of `POST /auth/signup` and `POST /auth/login`.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct AuthRequest {
    /// Must be a valid email address.
    #[validate(email)]
    pub email: String,
    /// Must be at least 5 characters long.
    #[validate(length(min = 5))]
    pub password: String,
}

/// Plain acknowledgement returned by the auth and logout endpoints.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn ok() -> Self {
        Self {
            message: "ok".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsrfResponse {
    pub csrf_token: String,
}
