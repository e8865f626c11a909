pub mod auth;
pub mod health;
pub mod tasks;
pub mod user;

use actix_web::web;

use crate::{error::AppError, state::AppState};

/// Registers the shared state and every route. `/todo` and `/user` sit behind the
/// identity middleware; `/auth` and `/health` do not.
pub fn config(cfg: &mut web::ServiceConfig, state: &AppState) {
    let json_config = web::JsonConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into());

    cfg.app_data(web::Data::new(state.clone()))
        .app_data(json_config)
        .service(health::health)
        .service(
            web::scope("/auth")
                .service(auth::csrf_token)
                .service(auth::signup)
                .service(auth::login)
                .service(auth::logout),
        )
        .service(
            web::scope("/todo")
                .wrap(state.identity())
                .service(tasks::get_tasks)
                .service(tasks::create_task)
                .service(tasks::get_task)
                .service(tasks::update_task)
                .service(tasks::delete_task),
        )
        .service(
            web::scope("/user")
                .wrap(state.identity())
                .service(user::get_login_user)
                .service(user::update_user),
        );
}
