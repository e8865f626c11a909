use actix_web::{delete, get, patch, post, web, HttpResponse, Responder};
use validator::Validate;

use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{CreateTaskInput, UpdateTaskInput},
    state::AppState,
};

/// Retrieves all tasks of the authenticated user, newest first.
///
/// ## Responses:
/// - `200 OK`: JSON array of `Task` objects.
/// - `401 Unauthorized`: Missing, invalid or expired access token.
#[get("")]
pub async fn get_tasks(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let tasks = state.tasks.list_tasks(user.id()).await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// Retrieves one task by id.
///
/// ## Responses:
/// - `200 OK`: The `Task`.
/// - `404 Not Found`: No such task, or it belongs to another user.
#[get("/{id}")]
pub async fn get_task(
    state: web::Data<AppState>,
    task_id: web::Path<i32>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let task = state.tasks.get_task(user.id(), task_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Creates a task owned by the authenticated user.
///
/// ## Request Body:
/// - `title`: 1 to 200 characters (required).
/// - `description` (optional): up to 1000 characters.
/// - `status` (optional): `todo`, `in_progress` or `done`. Defaults to `todo`.
///
/// ## Responses:
/// - `201 Created`: The new `Task`.
/// - `422 Unprocessable Entity`: Validation failed.
#[post("")]
pub async fn create_task(
    state: web::Data<AppState>,
    body: web::Json<CreateTaskInput>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    body.validate()?;
    let task = state.tasks.create_task(user.id(), &body).await?;
    Ok(HttpResponse::Created().json(task))
}

/// Partially updates a task the caller owns.
///
/// ## Responses:
/// - `200 OK`: The updated `Task`.
/// - `404 Not Found`: No such task, or it belongs to another user.
/// - `422 Unprocessable Entity`: Validation failed.
#[patch("/{id}")]
pub async fn update_task(
    state: web::Data<AppState>,
    task_id: web::Path<i32>,
    body: web::Json<UpdateTaskInput>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    body.validate()?;
    let task = state
        .tasks
        .update_task_by_id(user.id(), task_id.into_inner(), &body)
        .await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Deletes a task the caller owns.
///
/// ## Responses:
/// - `204 No Content`: Deleted.
/// - `404 Not Found`: No such task, or it belongs to another user.
#[delete("/{id}")]
pub async fn delete_task(
    state: web::Data<AppState>,
    task_id: web::Path<i32>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    state
        .tasks
        .delete_task_by_id(user.id(), task_id.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
