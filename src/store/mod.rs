//! Persistence seam. Services only ever see these traits; `PgStore` backs them in
//! production and `MemoryStore` in tests or when `DATABASE_URL=memory://`.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use std::fmt;

use crate::models::{CreateTaskInput, Task, UpdateTaskInput, UpdateUserInput, User};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write. Carries the constraint or column name.
    UniqueViolation(String),
    /// Any other storage failure.
    Backend(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StoreError::UniqueViolation(what) => write!(f, "unique violation on {}", what),
            StoreError::Backend(msg) => write!(f, "store failure: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &error {
            if db_err.is_unique_violation() {
                let what = db_err.constraint().unwrap_or("unknown").to_string();
                return StoreError::UniqueViolation(what);
            }
        }
        StoreError::Backend(error.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with `UniqueViolation` when the email is already registered.
    async fn create_user(&self, email: &str, hashed_password: &str) -> StoreResult<User>;
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;
    async fn find_user_by_id(&self, id: i32) -> StoreResult<Option<User>>;
    async fn update_user(&self, id: i32, input: &UpdateUserInput) -> StoreResult<Option<User>>;
}

#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn create_task(&self, user_id: i32, input: &CreateTaskInput) -> StoreResult<Task>;
    async fn find_task_by_id(&self, id: i32) -> StoreResult<Option<Task>>;
    /// Newest first by `created_at`, ties broken by id.
    async fn list_tasks_by_user(&self, user_id: i32) -> StoreResult<Vec<Task>>;
    /// Writes only if the task exists and belongs to `user_id`; `None` otherwise.
    async fn update_task(
        &self,
        id: i32,
        user_id: i32,
        input: &UpdateTaskInput,
    ) -> StoreResult<Option<Task>>;
    /// Deletes only if the task exists and belongs to `user_id`; returns whether a row went away.
    async fn delete_task(&self, id: i32, user_id: i32) -> StoreResult<bool>;
}
