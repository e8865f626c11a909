use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{StoreError, StoreResult, TaskStore, UserStore};
use crate::models::{CreateTaskInput, Task, UpdateTaskInput, UpdateUserInput, User};

#[derive(Default)]
struct Tables {
    users: BTreeMap<i32, User>,
    tasks: BTreeMap<i32, Task>,
    next_user_id: i32,
    next_task_id: i32,
}

/// In-process store with the same contract as `PgStore`. Every operation takes the lock
/// once, so each call is atomic just like a single SQL statement.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, email: &str, hashed_password: &str) -> StoreResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.email == email) {
            return Err(StoreError::UniqueViolation("users_email_key".into()));
        }
        tables.next_user_id += 1;
        let now = Utc::now();
        let user = User {
            id: tables.next_user_id,
            email: email.to_owned(),
            hashed_password: hashed_password.to_owned(),
            nick_name: None,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: i32) -> StoreResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn update_user(&self, id: i32, input: &UpdateUserInput) -> StoreResult<Option<User>> {
        let mut tables = self.tables.write().await;
        Ok(tables.users.get_mut(&id).map(|user| {
            if let Some(nick_name) = &input.nick_name {
                user.nick_name = Some(nick_name.clone());
            }
            user.updated_at = Utc::now();
            user.clone()
        }))
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn create_task(&self, user_id: i32, input: &CreateTaskInput) -> StoreResult<Task> {
        let mut tables = self.tables.write().await;
        tables.next_task_id += 1;
        let now = Utc::now();
        let task = Task {
            id: tables.next_task_id,
            user_id,
            title: input.title.clone(),
            description: input.description.clone(),
            status: input.status,
            created_at: now,
            updated_at: now,
        };
        tables.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn find_task_by_id(&self, id: i32) -> StoreResult<Option<Task>> {
        Ok(self.tables.read().await.tasks.get(&id).cloned())
    }

    async fn list_tasks_by_user(&self, user_id: i32) -> StoreResult<Vec<Task>> {
        let tables = self.tables.read().await;
        let mut tasks: Vec<Task> = tables
            .tasks
            .values()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(tasks)
    }

    async fn update_task(
        &self,
        id: i32,
        user_id: i32,
        input: &UpdateTaskInput,
    ) -> StoreResult<Option<Task>> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .tasks
            .get_mut(&id)
            .filter(|t| t.user_id == user_id)
            .map(|task| {
                input.apply_to(task);
                task.clone()
            }))
    }

    async fn delete_task(&self, id: i32, user_id: i32) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        let owned = tables.tasks.get(&id).is_some_and(|t| t.user_id == user_id);
        if owned {
            tables.tasks.remove(&id);
        }
        Ok(owned)
    }
}
