//! Task repository (受保护的资源存储)
//!
//! The repository does not check ownership; callers go through
//! [`crate::services::TaskService`], which does.

use crate::{error::AppError, models::task::Task};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn insert(&self, task: Task) -> Result<Task, AppError>;

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Task>, AppError>;

    /// 列出某个用户的任务，最新的在前
    async fn list_by_owner(&self, owner_id: &Uuid) -> Result<Vec<Task>, AppError>;

    /// Replace the mutable fields of an existing task. `owner_id` and
    /// `created_at` of the stored task are kept as they are.
    async fn update(&self, task: Task) -> Result<Option<Task>, AppError>;

    async fn delete(&self, id: &Uuid) -> Result<bool, AppError>;
}

#[derive(Default)]
pub struct InMemoryTaskRepository {
    tasks: RwLock<HashMap<Uuid, Task>>,
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn insert(&self, task: Task) -> Result<Task, AppError> {
        let mut tasks = self.tasks.write().await;

        if tasks.contains_key(&task.id) {
            return Err(AppError::Internal(format!("task id collision: {}", task.id)));
        }

        tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Task>, AppError> {
        Ok(self.tasks.read().await.get(id).cloned())
    }

    async fn list_by_owner(&self, owner_id: &Uuid) -> Result<Vec<Task>, AppError> {
        let mut owned: Vec<Task> = self
            .tasks
            .read()
            .await
            .values()
            .filter(|t| t.owner_id == *owner_id)
            .cloned()
            .collect();

        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn update(&self, task: Task) -> Result<Option<Task>, AppError> {
        let mut tasks = self.tasks.write().await;

        let Some(stored) = tasks.get_mut(&task.id) else {
            return Ok(None);
        };

        stored.title = task.title;
        stored.description = task.description;
        stored.completed = task.completed;
        stored.updated_at = task.updated_at;

        Ok(Some(stored.clone()))
    }

    async fn delete(&self, id: &Uuid) -> Result<bool, AppError> {
        Ok(self.tasks.write().await.remove(id).is_some())
    }
}
