use std::sync::Arc;

use crate::error::AppError;
use crate::models::{CreateTaskInput, Task, UpdateTaskInput};
use crate::store::TaskStore;

const TASK_NOT_FOUND: &str = "Task not found";

/// Owner-scoped task operations. A task that exists but belongs to someone else is
/// reported exactly like a task that does not exist.
#[derive(Clone)]
pub struct TaskService {
    tasks: Arc<dyn TaskStore>,
}

impl TaskService {
    pub fn new(tasks: Arc<dyn TaskStore>) -> Self {
        Self { tasks }
    }

    pub async fn list_tasks(&self, caller_id: i32) -> Result<Vec<Task>, AppError> {
        Ok(self.tasks.list_tasks_by_user(caller_id).await?)
    }

    pub async fn get_task(&self, caller_id: i32, task_id: i32) -> Result<Task, AppError> {
        match self.tasks.find_task_by_id(task_id).await? {
            Some(task) if task.user_id == caller_id => Ok(task),
            _ => Err(AppError::NotFound(TASK_NOT_FOUND.into())),
        }
    }

    pub async fn create_task(&self, caller_id: i32, input: &CreateTaskInput) -> Result<Task, AppError> {
        let task = self.tasks.create_task(caller_id, input).await?;
        log::debug!("user {} created task {}", caller_id, task.id);
        Ok(task)
    }

    pub async fn update_task_by_id(
        &self,
        caller_id: i32,
        task_id: i32,
        input: &UpdateTaskInput,
    ) -> Result<Task, AppError> {
        // Nothing to change: answer with the current record and leave `updated_at` alone.
        if input.is_empty() {
            return self.get_task(caller_id, task_id).await;
        }
        self.tasks
            .update_task(task_id, caller_id, input)
            .await?
            .ok_or_else(|| AppError::NotFound(TASK_NOT_FOUND.into()))
    }

    pub async fn delete_task_by_id(&self, caller_id: i32, task_id: i32) -> Result<(), AppError> {
        if self.tasks.delete_task(task_id, caller_id).await? {
            log::debug!("user {} deleted task {}", caller_id, task_id);
            Ok(())
        } else {
            Err(AppError::NotFound(TASK_NOT_FOUND.into()))
        }
    }
}
