use actix_web::{get, post, web, HttpRequest, HttpResponse, Responder};
use validator::Validate;

use crate::{
    auth::{
        cookies::{access_token_cookie, cleared_access_token_cookie},
        AuthRequest, CsrfResponse, MessageResponse,
    },
    csrf,
    error::AppError,
    state::AppState,
};

/// Issue a CSRF token
///
/// Binds a secret to the browser through the `_csrf` cookie and returns the same value,
/// which the client must echo in the `csrf-token` header on state-changing requests.
#[get("/csrf")]
pub async fn csrf_token(state: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    let secret = csrf::current_or_new_secret(&req);
    HttpResponse::Ok()
        .cookie(csrf::csrf_cookie(secret.clone(), state.cookie_same_site))
        .json(CsrfResponse { csrf_token: secret })
}

/// Register a new user
///
/// ## Responses:
/// - `200 OK`: `{"message": "ok"}`. No token is issued at signup.
/// - `403 Forbidden`: The email is already registered.
/// - `422 Unprocessable Entity`: Invalid email or too-short password.
#[post("/signup")]
pub async fn signup(
    state: web::Data<AppState>,
    body: web::Json<AuthRequest>,
) -> Result<impl Responder, AppError> {
    body.validate()?;
    state.auth.sign_up(&body.email, &body.password).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::ok()))
}

/// Login user
///
/// On success the access token is set as an HttpOnly cookie; it never appears in the body.
///
/// ## Responses:
/// - `200 OK`: `{"message": "ok"}` plus `Set-Cookie: access_token=...`.
/// - `403 Forbidden`: Unknown email or wrong password (same body for both).
#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<AuthRequest>,
) -> Result<impl Responder, AppError> {
    body.validate()?;
    let token = state.auth.login(&body.email, &body.password).await?;
    Ok(HttpResponse::Ok()
        .cookie(access_token_cookie(
            token,
            state.cookie_same_site,
            state.tokens.ttl_secs(),
        ))
        .json(MessageResponse::ok()))
}

/// Logout user
///
/// Overwrites the access token cookie with an empty, already-expired one.
#[post("/logout")]
pub async fn logout(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok()
        .cookie(cleared_access_token_cookie(state.cookie_same_site))
        .json(MessageResponse::ok())
}
