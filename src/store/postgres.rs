use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use super::{StoreResult, TaskStore, UserStore};
use crate::models::{CreateTaskInput, Task, UpdateTaskInput, UpdateUserInput, User};

const USER_COLUMNS: &str = "id, email, hashed_password, nick_name, created_at, updated_at";
const TASK_COLUMNS: &str = "id, user_id, title, description, status, created_at, updated_at";

/// Postgres-backed store. Expects the tables from `schema.sql`.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, email: &str, hashed_password: &str) -> StoreResult<User> {
        let sql = format!(
            "INSERT INTO users (email, hashed_password) VALUES ($1, $2) RETURNING {}",
            USER_COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .bind(hashed_password)
            .fetch_one(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_user_by_id(&self, id: i32) -> StoreResult<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn update_user(&self, id: i32, input: &UpdateUserInput) -> StoreResult<Option<User>> {
        let sql = format!(
            "UPDATE users \
             SET nick_name = COALESCE($1, nick_name), updated_at = NOW() \
             WHERE id = $2 \
             RETURNING {}",
            USER_COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(&input.nick_name)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }
}

#[async_trait]
impl TaskStore for PgStore {
    async fn create_task(&self, user_id: i32, input: &CreateTaskInput) -> StoreResult<Task> {
        let sql = format!(
            "INSERT INTO tasks (user_id, title, description, status) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {}",
            TASK_COLUMNS
        );
        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(user_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.status)
            .fetch_one(&self.pool)
            .await?;
        Ok(task)
    }

    async fn find_task_by_id(&self, id: i32) -> StoreResult<Option<Task>> {
        let sql = format!("SELECT {} FROM tasks WHERE id = $1", TASK_COLUMNS);
        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(task)
    }

    async fn list_tasks_by_user(&self, user_id: i32) -> StoreResult<Vec<Task>> {
        let sql = format!(
            "SELECT {} FROM tasks WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
            TASK_COLUMNS
        );
        let tasks = sqlx::query_as::<_, Task>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(tasks)
    }

    async fn update_task(
        &self,
        id: i32,
        user_id: i32,
        input: &UpdateTaskInput,
    ) -> StoreResult<Option<Task>> {
        // Ownership is part of the WHERE clause, so check and write are one statement.
        let sql = format!(
            "UPDATE tasks \
             SET title = COALESCE($1, title), \
                 description = COALESCE($2, description), \
                 status = COALESCE($3, status), \
                 updated_at = NOW() \
             WHERE id = $4 AND user_id = $5 \
             RETURNING {}",
            TASK_COLUMNS
        );
        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.status)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(task)
    }

    async fn delete_task(&self, id: i32, user_id: i32) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
