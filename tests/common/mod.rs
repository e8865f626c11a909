#![allow(dead_code)]

use actix_web::{
    body::MessageBody,
    cookie::{Cookie, SameSite},
    dev::{Service, ServiceResponse},
    http::StatusCode,
    test, web::Bytes,
};
use serde_json::{json, Value};
use std::sync::Arc;

use tasknest::auth::cookies::ACCESS_TOKEN_COOKIE;
use tasknest::auth::token::ACCESS_TOKEN_TTL_SECS;
use tasknest::auth::{PasswordHasher, TokenService};
use tasknest::csrf::{CSRF_COOKIE, CSRF_HEADER_NAME};
use tasknest::state::AppState;
use tasknest::store::MemoryStore;

pub const TEST_SECRET: &str = "integration-test-secret";

pub fn test_state() -> (AppState, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let state = AppState::new(
        store.clone(),
        store.clone(),
        PasswordHasher::with_cost(4),
        TokenService::new(TEST_SECRET, ACCESS_TOKEN_TTL_SECS),
        SameSite::Strict,
    );
    (state, store)
}

/// Status, body and Set-Cookie values of a response, whether it came back as a
/// response or as an error raised by middleware.
pub struct Outcome {
    pub status: StatusCode,
    pub body: Bytes,
    pub cookies: Vec<Cookie<'static>>,
}

impl Outcome {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or(Value::Null)
    }

    pub fn cookie(&self, name: &str) -> Option<&Cookie<'static>> {
        self.cookies.iter().find(|c| c.name() == name)
    }
}

pub async fn send<S, B>(app: &S, req: actix_http::Request) -> Outcome
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    match test::try_call_service(app, req).await {
        Ok(resp) => {
            let status = resp.status();
            let cookies = resp
                .response()
                .cookies()
                .map(|c| c.into_owned())
                .collect();
            let body = test::read_body(resp).await;
            Outcome {
                status,
                body,
                cookies,
            }
        }
        Err(err) => {
            let resp = err.error_response();
            let status = resp.status();
            let body = actix_web::body::to_bytes(resp.into_body())
                .await
                .unwrap_or_default();
            Outcome {
                status,
                body,
                cookies: Vec::new(),
            }
        }
    }
}

/// Browser-side state: the CSRF secret and, once logged in, the access token.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub csrf: String,
    pub access_token: Option<String>,
}

impl Session {
    /// Attaches the CSRF cookie and header plus the access token cookie, if any.
    pub fn apply(&self, mut req: test::TestRequest) -> test::TestRequest {
        req = req
            .cookie(Cookie::new(CSRF_COOKIE, self.csrf.clone()))
            .insert_header((CSRF_HEADER_NAME, self.csrf.clone()));
        if let Some(token) = &self.access_token {
            req = req.cookie(Cookie::new(ACCESS_TOKEN_COOKIE, token.clone()));
        }
        req
    }
}

pub async fn new_session<S, B>(app: &S) -> Session
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::get().uri("/auth/csrf").to_request();
    let outcome = send(app, req).await;
    assert_eq!(outcome.status, StatusCode::OK);

    let cookie = outcome
        .cookie(CSRF_COOKIE)
        .expect("csrf endpoint must set the _csrf cookie");
    assert_eq!(cookie.http_only(), Some(true));
    let token = outcome.json()["csrfToken"].as_str().unwrap().to_string();
    assert_eq!(token, cookie.value());

    Session {
        csrf: token,
        access_token: None,
    }
}

pub async fn signup<S, B>(app: &S, session: &Session, email: &str, password: &str) -> Outcome
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = session
        .apply(test::TestRequest::post().uri("/auth/signup"))
        .set_json(json!({ "email": email, "password": password }))
        .to_request();
    send(app, req).await
}

pub async fn login<S, B>(app: &S, session: &mut Session, email: &str, password: &str) -> Outcome
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = session
        .apply(test::TestRequest::post().uri("/auth/login"))
        .set_json(json!({ "email": email, "password": password }))
        .to_request();
    let outcome = send(app, req).await;
    if let Some(cookie) = outcome.cookie(ACCESS_TOKEN_COOKIE) {
        session.access_token = Some(cookie.value().to_string());
    }
    outcome
}

/// Signs up and logs in a fresh user, returning a session holding a valid access token.
pub async fn logged_in<S, B>(app: &S, email: &str) -> Session
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let mut session = new_session(app).await;
    let created = signup(app, &session, email, "Password123!").await;
    assert_eq!(created.status, StatusCode::OK, "signup failed: {:?}", created.body);
    let logged = login(app, &mut session, email, "Password123!").await;
    assert_eq!(logged.status, StatusCode::OK, "login failed: {:?}", logged.body);
    session
}
