use std::sync::Arc;

use crate::error::AppError;
use crate::models::{PublicUser, UpdateUserInput};
use crate::store::UserStore;

/// Profile updates for the logged-in user. Everything returned is a `PublicUser`.
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserStore>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    pub async fn update_user(&self, caller_id: i32, input: &UpdateUserInput) -> Result<PublicUser, AppError> {
        self.users
            .update_user(caller_id, input)
            .await?
            .map(PublicUser::from)
            .ok_or_else(|| AppError::NotFound("User not found".into()))
    }
}
