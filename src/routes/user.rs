use actix_web::{get, patch, web, HttpResponse, Responder};
use validator::Validate;

use crate::{auth::AuthenticatedUser, error::AppError, models::UpdateUserInput, state::AppState};

/// Returns the logged-in user.
#[get("")]
pub async fn get_login_user(user: AuthenticatedUser) -> impl Responder {
    HttpResponse::Ok().json(user.0)
}

/// Updates the logged-in user's nickname.
#[patch("")]
pub async fn update_user(
    state: web::Data<AppState>,
    body: web::Json<UpdateUserInput>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    body.validate()?;
    let updated = state.users.update_user(user.id(), &body).await?;
    Ok(HttpResponse::Ok().json(updated))
}
