use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage, HttpRequest,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use std::rc::Rc;
use std::sync::Arc;

use crate::auth::cookies::ACCESS_TOKEN_COOKIE;
use crate::auth::token::TokenService;
use crate::error::AppError;
use crate::models::PublicUser;
use crate::store::UserStore;

/// Pulls a raw token out of a request, if there is one.
pub type TokenExtractor = Arc<dyn Fn(&HttpRequest) -> Option<String> + Send + Sync>;

/// Reads the token from the `access_token` cookie. An empty cookie counts as absent.
pub fn cookie_extractor() -> TokenExtractor {
    Arc::new(|req: &HttpRequest| {
        req.cookie(ACCESS_TOKEN_COOKIE)
            .map(|c| c.value().to_owned())
            .filter(|v| !v.is_empty())
    })
}

/// Resolves the caller of a protected scope. On success the caller's [`PublicUser`] is
/// placed in the request extensions; on any failure the request is answered with 401
/// before reaching the handler.
#[derive(Clone)]
pub struct IdentityMiddleware {
    extractor: TokenExtractor,
    tokens: TokenService,
    users: Arc<dyn UserStore>,
}

impl IdentityMiddleware {
    pub fn new(tokens: TokenService, users: Arc<dyn UserStore>) -> Self {
        Self::with_extractor(cookie_extractor(), tokens, users)
    }

    pub fn with_extractor(
        extractor: TokenExtractor,
        tokens: TokenService,
        users: Arc<dyn UserStore>,
    ) -> Self {
        Self {
            extractor,
            tokens,
            users,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for IdentityMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = IdentityMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(IdentityMiddlewareService {
            service: Rc::new(service),
            identity: self.clone(),
        }))
    }
}

pub struct IdentityMiddlewareService<S> {
    service: Rc<S>,
    identity: IdentityMiddleware,
}

impl<S, B> Service<ServiceRequest> for IdentityMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let identity = self.identity.clone();

        Box::pin(async move {
            let token = (identity.extractor)(req.request());
            let user = match resolve(&identity, token).await {
                Ok(user) => user,
                Err(err) => return Ok(req.error_response(err).map_into_right_body()),
            };
            log::debug!("request to {} authenticated as user {}", req.path(), user.id);
            req.extensions_mut().insert(user);
            service
                .call(req)
                .await
                .map(ServiceResponse::map_into_left_body)
        })
    }
}

async fn resolve(identity: &IdentityMiddleware, token: Option<String>) -> Result<PublicUser, AppError> {
    let token = token.ok_or_else(|| AppError::Unauthenticated("Missing token".into()))?;
    let claims = identity.tokens.verify(&token).map_err(|e| {
        log::debug!("token rejected: {}", e);
        AppError::from(e)
    })?;

    match identity.users.find_user_by_id(claims.sub).await? {
        Some(user) => Ok(PublicUser::from(user)),
        None => Err(AppError::Unauthenticated(format!(
            "user {} no longer exists",
            claims.sub
        ))),
    }
}
