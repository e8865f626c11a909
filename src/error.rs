//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the application.
//! Domain failures (`EmailTaken`, `InvalidCredentials`, `Unauthenticated`, `NotFound`) are
//! raised deliberately by the services and map to client errors; everything coming out of
//! the store or the runtime that is not a domain failure maps to a 500.
//!
//! `AppError` implements `actix_web::error::ResponseError` so handlers can return it directly,
//! and provides `From` conversions so the `?` operator works across the crate.

use actix_web::{error::BlockingError, error::ResponseError, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

use crate::auth::token::TokenError;
use crate::store::StoreError;

/// Message shared by both login failure branches.
pub const INVALID_CREDENTIALS_MSG: &str = "Login credentials do not match";

/// Represents all possible errors that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// Signup with an email that is already registered (HTTP 403).
    EmailTaken,
    /// Login failed. Deliberately carries no detail about which check failed (HTTP 403).
    InvalidCredentials,
    /// Missing, invalid or expired identity token, or a token for a vanished user (HTTP 401).
    Unauthenticated(String),
    /// The request was well-formed but is refused, e.g. a CSRF mismatch (HTTP 403).
    Forbidden(String),
    /// Represents a client-side error due to a malformed request (HTTP 400).
    BadRequest(String),
    /// The resource does not exist or is not owned by the caller (HTTP 404).
    NotFound(String),
    /// Represents an unexpected server-side error (HTTP 500).
    InternalServerError(String),
    /// Represents an error originating from the store (HTTP 500).
    DatabaseError(String),
    /// Input validation failed (HTTP 422).
    ValidationError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::EmailTaken => write!(f, "This email is already taken"),
            AppError::InvalidCredentials => write!(f, "{}", INVALID_CREDENTIALS_MSG),
            AppError::Unauthenticated(msg) => write!(f, "Unauthenticated: {}", msg),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::EmailTaken | AppError::InvalidCredentials => {
                HttpResponse::Forbidden().json(json!({ "error": self.to_string() }))
            }
            AppError::Forbidden(msg) => HttpResponse::Forbidden().json(json!({ "error": msg })),
            AppError::Unauthenticated(_) => {
                // The reason stays in the logs; clients get one generic message.
                HttpResponse::Unauthorized().json(json!({ "error": "Unauthorized" }))
            }
            AppError::BadRequest(msg) => HttpResponse::BadRequest().json(json!({ "error": msg })),
            AppError::NotFound(msg) => HttpResponse::NotFound().json(json!({ "error": msg })),
            AppError::InternalServerError(msg) => {
                HttpResponse::InternalServerError().json(json!({ "error": msg }))
            }
            AppError::DatabaseError(_) => {
                HttpResponse::InternalServerError().json(json!({ "error": "Database error" }))
            }
            AppError::ValidationError(msg) => {
                HttpResponse::UnprocessableEntity().json(json!({ "error": msg }))
            }
        }
    }
}

/// Store failures surface unchanged as server errors. Callers that care about
/// `UniqueViolation` match on it before converting.
impl From<StoreError> for AppError {
    fn from(error: StoreError) -> AppError {
        match error {
            StoreError::UniqueViolation(what) => {
                AppError::DatabaseError(format!("unique constraint violated: {}", what))
            }
            StoreError::Backend(msg) => AppError::DatabaseError(msg),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::ValidationError(error.to_string())
    }
}

impl From<TokenError> for AppError {
    fn from(error: TokenError) -> AppError {
        AppError::Unauthenticated(error.to_string())
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}

impl From<BlockingError> for AppError {
    fn from(error: BlockingError) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}
