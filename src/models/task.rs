use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the status of a task.
/// Corresponds to the `task_status` SQL enum.
#[derive(Debug, Default, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started.
    #[default]
    Todo,
    /// Being worked on.
    InProgress,
    /// Finished.
    Done,
}

/// Represents a task as stored and returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: i32,
    /// Owner. Never changes after creation.
    pub user_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for `POST /todo`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateTaskInput {
    /// Must be between 1 and 200 characters.
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    /// Maximum length of 1000 characters if provided.
    #[validate(length(max = 1000))]
    pub description: Option<String>,

    /// Defaults to `todo` when omitted.
    #[serde(default)]
    pub status: TaskStatus,
}

/// Payload for `PATCH /todo/{id}`. Absent fields are left untouched.
#[derive(Debug, Default, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateTaskInput {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[validate(length(max = 1000))]
    pub description: Option<String>,

    pub status: Option<TaskStatus>,
}

impl UpdateTaskInput {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.status.is_none()
    }

    /// Applies the provided fields to `task` and bumps `updated_at`.
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(description) = &self.description {
            task.description = Some(description.clone());
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        task.updated_at = Utc::now();
    }
}
