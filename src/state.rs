use actix_web::cookie::SameSite;
use std::sync::Arc;

use crate::auth::{AuthService, IdentityMiddleware, PasswordHasher, TokenService};
use crate::store::{TaskStore, UserStore};
use crate::tasks::TaskService;
use crate::users::UserService;

/// The dependency graph, built once at startup and shared by every worker.
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub tasks: TaskService,
    pub users: UserService,
    pub tokens: TokenService,
    pub user_store: Arc<dyn UserStore>,
    pub cookie_same_site: SameSite,
}

impl AppState {
    pub fn new(
        user_store: Arc<dyn UserStore>,
        task_store: Arc<dyn TaskStore>,
        hasher: PasswordHasher,
        tokens: TokenService,
        cookie_same_site: SameSite,
    ) -> Self {
        Self {
            auth: AuthService::new(user_store.clone(), hasher, tokens.clone()),
            tasks: TaskService::new(task_store),
            users: UserService::new(user_store.clone()),
            tokens,
            user_store,
            cookie_same_site,
        }
    }

    /// A fresh identity middleware wired to this state's token service and user store.
    pub fn identity(&self) -> IdentityMiddleware {
        IdentityMiddleware::new(self.tokens.clone(), self.user_store.clone())
    }
}
