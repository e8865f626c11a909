use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::error::AppError;
use crate::models::PublicUser;

/// The caller resolved by `IdentityMiddleware`.
///
/// Only meaningful on routes wrapped by that middleware. If the identity is missing
/// from the request extensions the extractor fails with `AppError::Unauthenticated`.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub PublicUser);

impl AuthenticatedUser {
    pub fn id(&self) -> i32 {
        self.0.id
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<PublicUser>().cloned() {
            Some(user) => ready(Ok(AuthenticatedUser(user))),
            None => {
                let err = AppError::Unauthenticated(
                    "No identity in request. Ensure IdentityMiddleware is active.".to_string(),
                );
                ready(Err(err.into()))
            }
        }
    }
}
