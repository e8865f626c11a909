use chrono::Utc;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Lifetime of an access token, in seconds.
pub const ACCESS_TOKEN_TTL_SECS: i64 = 5 * 60;

/// Represents the claims encoded within an access token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject of the token: the user's id.
    pub sub: i32,
    /// The user's email at the time of issuance.
    pub email: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Bad signature, wrong secret, or a string that is not a token at all.
    Invalid(String),
    /// The token was valid but its `exp` has passed.
    Expired,
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TokenError::Invalid(reason) => write!(f, "Invalid token: {}", reason),
            TokenError::Expired => write!(f, "Token expired"),
        }
    }
}

impl std::error::Error for TokenError {}

struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

/// Issues and verifies HS256 access tokens. Cheap to clone; the keys are shared.
#[derive(Clone)]
pub struct TokenService {
    keys: Arc<Keys>,
    ttl_secs: i64,
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl_secs", &self.ttl_secs)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    pub fn new(secret: &str, ttl_secs: i64) -> Self {
        Self {
            keys: Arc::new(Keys {
                encoding: EncodingKey::from_secret(secret.as_bytes()),
                decoding: DecodingKey::from_secret(secret.as_bytes()),
            }),
            ttl_secs,
        }
    }

    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }

    pub fn issue(&self, user_id: i32, email: &str) -> Result<String, TokenError> {
        self.issue_at(user_id, email, Utc::now().timestamp())
    }

    /// Issues a token as if the current time were `now` (seconds since epoch).
    pub fn issue_at(&self, user_id: i32, email: &str, now: i64) -> Result<String, TokenError> {
        let claims = Claims {
            sub: user_id,
            email: email.to_owned(),
            iat: now,
            exp: now + self.ttl_secs,
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.keys.encoding)
            .map_err(|e| TokenError::Invalid(format!("failed to sign: {}", e)))?;
        log::debug!("issued access token for user {}", user_id);
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_at(token, Utc::now().timestamp())
    }

    /// Verifies signature and structure, then checks expiry against `now`.
    /// A token is expired from the second `now >= exp`; there is no leeway.
    pub fn verify_at(&self, token: &str, now: i64) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked below against the supplied clock.
        validation.validate_exp = false;
        validation.leeway = 0;

        let claims = decode::<Claims>(token, &self.keys.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                other => TokenError::Invalid(format!("{:?}", other)),
            })?;

        if now >= claims.exp {
            return Err(TokenError::Expired);
        }
        Ok(claims)
    }
}
