use actix_web::cookie::{time::Duration, Cookie, SameSite};

/// Name of the cookie carrying the access token.
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Builds the HttpOnly, Secure cookie that carries a freshly minted token.
pub fn access_token_cookie(token: String, same_site: SameSite, ttl_secs: i64) -> Cookie<'static> {
    Cookie::build(ACCESS_TOKEN_COOKIE, token)
        .http_only(true)
        .secure(true)
        .same_site(same_site)
        .path("/")
        .max_age(Duration::seconds(ttl_secs))
        .finish()
}

/// An empty, already-expired access token cookie. Sending it logs the browser out.
pub fn cleared_access_token_cookie(same_site: SameSite) -> Cookie<'static> {
    let mut cookie = Cookie::build(ACCESS_TOKEN_COOKIE, "")
        .http_only(true)
        .secure(true)
        .same_site(same_site)
        .path("/")
        .finish();
    cookie.make_removal();
    cookie
}
