mod common;

use actix_web::cookie::{time::Duration, Cookie, SameSite};
use actix_web::http::StatusCode;
use actix_web::{test, App};
use chrono::Utc;
use pretty_assertions::assert_eq;
use serde_json::json;

use common::{logged_in, login, new_session, send, signup, test_state, Session, TEST_SECRET};
use tasknest::auth::cookies::ACCESS_TOKEN_COOKIE;
use tasknest::auth::token::ACCESS_TOKEN_TTL_SECS;
use tasknest::auth::TokenService;
use tasknest::csrf::CsrfMiddleware;
use tasknest::routes;
use tasknest::store::UserStore;

#[actix_rt::test]
async fn test_signup_login_and_profile_flow() {
    let (state, store) = test_state();
    let app = test::init_service(
        App::new()
            .wrap(CsrfMiddleware)
            .configure(|cfg| routes::config(cfg, &state)),
    )
    .await;

    let mut session = new_session(&app).await;

    let created = signup(&app, &session, "integration@example.com", "Password123!").await;
    assert_eq!(created.status, StatusCode::OK);
    assert_eq!(created.json(), json!({ "message": "ok" }));
    assert!(created.cookie(ACCESS_TOKEN_COOKIE).is_none());

    let logged = login(&app, &mut session, "integration@example.com", "Password123!").await;
    assert_eq!(logged.status, StatusCode::OK);
    assert_eq!(logged.json(), json!({ "message": "ok" }));
    assert!(!logged.body.is_empty());

    let cookie = logged
        .cookie(ACCESS_TOKEN_COOKIE)
        .expect("login must set the access token cookie");
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.secure(), Some(true));
    assert_eq!(cookie.same_site(), Some(SameSite::Strict));
    assert_eq!(cookie.path(), Some("/"));
    assert!(!logged.json().to_string().contains(cookie.value()));

    let stored = store
        .find_user_by_email("integration@example.com")
        .await
        .unwrap()
        .unwrap();
    let claims = TokenService::new(TEST_SECRET, ACCESS_TOKEN_TTL_SECS)
        .verify(cookie.value())
        .unwrap();
    assert_eq!(claims.sub, stored.id);
    assert_eq!(claims.email, "integration@example.com");

    let req = session
        .apply(test::TestRequest::get().uri("/user"))
        .to_request();
    let profile = send(&app, req).await;
    assert_eq!(profile.status, StatusCode::OK);
    let body = profile.json();
    assert_eq!(body["id"], stored.id);
    assert_eq!(body["email"], "integration@example.com");
    assert!(body.get("hashedPassword").is_none());
    assert!(!profile.json().to_string().contains(&stored.hashed_password));
}

#[actix_rt::test]
async fn test_duplicate_signup_is_forbidden() {
    let (state, store) = test_state();
    let app = test::init_service(
        App::new()
            .wrap(CsrfMiddleware)
            .configure(|cfg| routes::config(cfg, &state)),
    )
    .await;
    let session = new_session(&app).await;

    let first = signup(&app, &session, "dup@example.com", "Password123!").await;
    assert_eq!(first.status, StatusCode::OK);
    let original = store
        .find_user_by_email("dup@example.com")
        .await
        .unwrap()
        .unwrap();

    let second = signup(&app, &session, "dup@example.com", "Another123!").await;
    assert_eq!(second.status, StatusCode::FORBIDDEN);

    let after = store
        .find_user_by_email("dup@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(after.id, original.id);
    assert_eq!(after.hashed_password, original.hashed_password);
}

#[actix_rt::test]
async fn test_login_failures_look_identical() {
    let (state, _) = test_state();
    let app = test::init_service(
        App::new()
            .wrap(CsrfMiddleware)
            .configure(|cfg| routes::config(cfg, &state)),
    )
    .await;
    let mut session = new_session(&app).await;
    signup(&app, &session, "known@example.com", "Password123!").await;

    let wrong_password = login(&app, &mut session, "known@example.com", "Wrong123!").await;
    let unknown_email = login(&app, &mut session, "nobody@example.com", "Password123!").await;

    assert_eq!(wrong_password.status, StatusCode::FORBIDDEN);
    assert_eq!(unknown_email.status, StatusCode::FORBIDDEN);
    assert_eq!(wrong_password.body, unknown_email.body);
    assert!(wrong_password.cookie(ACCESS_TOKEN_COOKIE).is_none());
    assert!(session.access_token.is_none());
}

#[actix_rt::test]
async fn test_invalid_payload_is_rejected() {
    let (state, _) = test_state();
    let app = test::init_service(
        App::new()
            .wrap(CsrfMiddleware)
            .configure(|cfg| routes::config(cfg, &state)),
    )
    .await;
    let session = new_session(&app).await;

    let bad_email = signup(&app, &session, "invalid-email", "Password123!").await;
    assert_eq!(bad_email.status, StatusCode::UNPROCESSABLE_ENTITY);

    let short_password = signup(&app, &session, "ok@example.com", "1234").await;
    assert_eq!(short_password.status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_rt::test]
async fn test_state_changing_requests_require_csrf() {
    let (state, _) = test_state();
    let app = test::init_service(
        App::new()
            .wrap(CsrfMiddleware)
            .configure(|cfg| routes::config(cfg, &state)),
    )
    .await;

    let no_token = test::TestRequest::post()
        .uri("/auth/signup")
        .set_json(json!({ "email": "a@example.com", "password": "Password123!" }))
        .to_request();
    assert_eq!(send(&app, no_token).await.status, StatusCode::FORBIDDEN);

    let forged = test::TestRequest::post()
        .uri("/auth/signup")
        .cookie(Cookie::new("_csrf", "victim-secret"))
        .insert_header(("csrf-token", "attacker-guess"))
        .set_json(json!({ "email": "a@example.com", "password": "Password123!" }))
        .to_request();
    assert_eq!(send(&app, forged).await.status, StatusCode::FORBIDDEN);

    // Reads are never checked.
    let health = test::TestRequest::get().uri("/health").to_request();
    assert_eq!(send(&app, health).await.status, StatusCode::OK);
}

#[actix_rt::test]
async fn test_protected_routes_reject_bad_identity() {
    let (state, _) = test_state();
    let app = test::init_service(
        App::new()
            .wrap(CsrfMiddleware)
            .configure(|cfg| routes::config(cfg, &state)),
    )
    .await;
    let session = logged_in(&app, "victim@example.com").await;
    let tokens = TokenService::new(TEST_SECRET, ACCESS_TOKEN_TTL_SECS);

    let anonymous = Session {
        csrf: session.csrf.clone(),
        access_token: None,
    };
    let garbage = Session {
        access_token: Some("not-a-token".into()),
        ..anonymous.clone()
    };
    let foreign_secret = Session {
        access_token: Some(
            TokenService::new("some-other-secret", ACCESS_TOKEN_TTL_SECS)
                .issue(1, "victim@example.com")
                .unwrap(),
        ),
        ..anonymous.clone()
    };
    let expired = Session {
        access_token: Some(
            tokens
                .issue_at(1, "victim@example.com", Utc::now().timestamp() - ACCESS_TOKEN_TTL_SECS - 1)
                .unwrap(),
        ),
        ..anonymous.clone()
    };
    let vanished_user = Session {
        access_token: Some(tokens.issue(9999, "ghost@example.com").unwrap()),
        ..anonymous.clone()
    };

    for s in [&anonymous, &garbage, &foreign_secret, &expired, &vanished_user] {
        let req = s.apply(test::TestRequest::get().uri("/todo")).to_request();
        let outcome = send(&app, req).await;
        assert_eq!(outcome.status, StatusCode::UNAUTHORIZED, "session {:?}", s);
    }

    let req = session
        .apply(test::TestRequest::get().uri("/todo"))
        .to_request();
    assert_eq!(send(&app, req).await.status, StatusCode::OK);
}

#[actix_rt::test]
async fn test_logout_clears_cookie() {
    let (state, _) = test_state();
    let app = test::init_service(
        App::new()
            .wrap(CsrfMiddleware)
            .configure(|cfg| routes::config(cfg, &state)),
    )
    .await;
    let session = logged_in(&app, "bye@example.com").await;

    let req = session
        .apply(test::TestRequest::post().uri("/auth/logout"))
        .to_request();
    let outcome = send(&app, req).await;
    assert_eq!(outcome.status, StatusCode::OK);
    assert_eq!(outcome.json(), json!({ "message": "ok" }));

    let cleared = outcome
        .cookie(ACCESS_TOKEN_COOKIE)
        .expect("logout must overwrite the access token cookie");
    assert_eq!(cleared.value(), "");
    assert_eq!(cleared.max_age(), Some(Duration::ZERO));
    assert_eq!(cleared.http_only(), Some(true));

    // A browser honouring the cleared cookie has nothing left to present.
    let logged_out = Session {
        access_token: None,
        ..session
    };
    let req = logged_out
        .apply(test::TestRequest::get().uri("/user"))
        .to_request();
    assert_eq!(send(&app, req).await.status, StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn test_rejections_carry_cors_headers() {
    const ORIGIN: &str = "http://localhost:3000";
    let (state, _) = test_state();
    let app = test::init_service(
        App::new()
            .wrap(CsrfMiddleware)
            .wrap(
                actix_cors::Cors::default()
                    .allowed_origin(ORIGIN)
                    .supports_credentials(),
            )
            .configure(|cfg| routes::config(cfg, &state)),
    )
    .await;

    // Rejections are plain responses, so call_service does not panic on them.
    let req = test::TestRequest::get()
        .uri("/todo")
        .insert_header(("Origin", ORIGIN))
        .to_request();
    let unauthenticated = test::call_service(&app, req).await;
    assert_eq!(unauthenticated.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        unauthenticated
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some(ORIGIN)
    );

    let req = test::TestRequest::post()
        .uri("/auth/login")
        .insert_header(("Origin", ORIGIN))
        .set_json(json!({ "email": "cors@example.com", "password": "Password123!" }))
        .to_request();
    let forbidden = test::call_service(&app, req).await;
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        forbidden
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some(ORIGIN)
    );
    let body: serde_json::Value = test::read_body_json(forbidden).await;
    assert!(body["error"].is_string());
}
