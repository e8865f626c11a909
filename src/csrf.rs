//! Double-submit CSRF protection.
//!
//! `GET /auth/csrf` hands out a random secret twice: once in the HttpOnly `_csrf` cookie and
//! once in the JSON body. Scripts on an allowed origin read it from the body and echo it in
//! the `csrf-token` header; a cross-site form post can do neither. The middleware rejects
//! any state-changing request whose header does not match the cookie.

use actix_web::{
    body::EitherBody,
    cookie::{Cookie, SameSite},
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::Method,
    Error, HttpRequest,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use uuid::Uuid;

use crate::error::AppError;

pub const CSRF_COOKIE: &str = "_csrf";
pub const CSRF_HEADER_NAME: &str = "csrf-token";

/// Returns the secret already bound to this browser, or mints a new one.
pub fn current_or_new_secret(req: &HttpRequest) -> String {
    req.cookie(CSRF_COOKIE)
        .map(|c| c.value().to_owned())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| Uuid::new_v4().simple().to_string())
}

pub fn csrf_cookie(secret: String, same_site: SameSite) -> Cookie<'static> {
    Cookie::build(CSRF_COOKIE, secret)
        .http_only(true)
        .secure(true)
        .same_site(same_site)
        .path("/")
        .finish()
}

fn requires_check(method: &Method) -> bool {
    [Method::POST, Method::PUT, Method::PATCH, Method::DELETE].contains(method)
}

/// Compares without short-circuiting on the first differing byte.
fn tokens_match(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Validates the header against the cookie for a single request.
pub fn validate_request(req: &HttpRequest) -> Result<(), AppError> {
    if !requires_check(req.method()) {
        return Ok(());
    }

    let header = req
        .headers()
        .get(CSRF_HEADER_NAME)
        .and_then(|h| h.to_str().ok())
        .filter(|v| !v.is_empty());
    let cookie = req.cookie(CSRF_COOKIE);

    match (header, cookie) {
        (Some(header), Some(cookie)) if tokens_match(header, cookie.value()) => Ok(()),
        (None, _) => Err(AppError::Forbidden("CSRF token required".into())),
        _ => Err(AppError::Forbidden("invalid csrf token".into())),
    }
}

pub struct CsrfMiddleware;

impl<S, B> Transform<S, ServiceRequest> for CsrfMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = CsrfMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CsrfMiddlewareService { service }))
    }
}

pub struct CsrfMiddlewareService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for CsrfMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        match validate_request(req.request()) {
            Ok(()) => {
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
            Err(err) => {
                log::warn!("CSRF check failed for {} {}: {}", req.method(), req.path(), err);
                // Must stay Ok so an outer Cors still adds its headers.
                let response = req.error_response(err).map_into_right_body();
                Box::pin(async move { Ok(response) })
            }
        }
    }
}
