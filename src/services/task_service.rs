//! 任务服务：所有读写都先经过所有权校验

use crate::{
    auth::{middleware::AuthContext, ownership::require_owner},
    config::DenialPolicy,
    error::AppError,
    models::task::*,
    repository::task_repo::TaskRepository,
};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

pub struct TaskService {
    tasks: Arc<dyn TaskRepository>,
    denial_policy: DenialPolicy,
}

impl TaskService {
    pub fn new(tasks: Arc<dyn TaskRepository>, denial_policy: DenialPolicy) -> Self {
        Self {
            tasks,
            denial_policy,
        }
    }

    /// 列出调用方自己的任务
    pub async fn list(&self, ctx: &AuthContext) -> Result<Vec<Task>, AppError> {
        self.tasks.list_by_owner(&ctx.user_id).await
    }

    pub async fn get(&self, ctx: &AuthContext, id: Uuid) -> Result<Task, AppError> {
        self.find_owned(ctx, id).await
    }

    /// 创建任务，所有者总是调用方
    pub async fn create(&self, ctx: &AuthContext, req: CreateTaskRequest) -> Result<Task, AppError> {
        let title = req
            .title
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::Validation("Title is required".to_string()))?;

        let now = Utc::now();
        let task = Task {
            id: Uuid::new_v4(),
            owner_id: ctx.user_id,
            title,
            description: req.description,
            completed: false,
            created_at: now,
            updated_at: now,
        };

        let task = self.tasks.insert(task).await?;
        tracing::info!(task_id = %task.id, owner_id = %task.owner_id, "Task created");

        Ok(task)
    }

    pub async fn update(
        &self,
        ctx: &AuthContext,
        id: Uuid,
        req: UpdateTaskRequest,
    ) -> Result<Task, AppError> {
        let mut task = self.find_owned(ctx, id).await?;

        if let Some(title) = req.title {
            if title.is_empty() {
                return Err(AppError::Validation("Title cannot be empty".to_string()));
            }
            task.title = title;
        }
        if let Some(description) = req.description {
            task.description = Some(description);
        }
        if let Some(completed) = req.completed {
            task.completed = completed;
        }
        task.updated_at = Utc::now();

        let task = self.tasks.update(task).await?.ok_or(AppError::NotFound)?;
        tracing::info!(task_id = %task.id, "Task updated");

        Ok(task)
    }

    pub async fn delete(&self, ctx: &AuthContext, id: Uuid) -> Result<(), AppError> {
        self.find_owned(ctx, id).await?;

        if !self.tasks.delete(&id).await? {
            return Err(AppError::NotFound);
        }
        tracing::info!(task_id = %id, "Task deleted");

        Ok(())
    }

    /// 读取任务并校验所有权
    async fn find_owned(&self, ctx: &AuthContext, id: Uuid) -> Result<Task, AppError> {
        let task = self.tasks.find_by_id(&id).await?.ok_or(AppError::NotFound)?;
        require_owner(ctx, &task.owner_id, self.denial_policy)?;
        Ok(task)
    }
}
