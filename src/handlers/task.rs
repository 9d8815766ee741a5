//! 任务的 HTTP 处理器
//! 所有者校验在 TaskService 内完成

use crate::{
    auth::middleware::AuthContext, error::AppError, handlers::body::JsonBody,
    middleware::AppState, models::task::*,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

/// 列出当前用户的任务
pub async fn list_tasks(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
) -> Result<impl IntoResponse, AppError> {
    let tasks = state.task_service.list(&auth_context).await?;

    Ok(Json(json!({
        "tasks": tasks,
        "count": tasks.len()
    })))
}

/// 创建任务
pub async fn create_task(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    JsonBody(req): JsonBody<CreateTaskRequest>,
) -> Result<impl IntoResponse, AppError> {
    let task = state.task_service.create(&auth_context, req).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Task created successfully",
            "task": task
        })),
    ))
}

/// 获取任务详情
pub async fn get_task(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let task = state.task_service.get(&auth_context, parse_task_id(&id)?).await?;

    Ok(Json(json!({ "task": task })))
}

/// 更新任务
pub async fn update_task(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<UpdateTaskRequest>,
) -> Result<impl IntoResponse, AppError> {
    let task = state.task_service.update(&auth_context, parse_task_id(&id)?, req).await?;

    Ok(Json(json!({
        "message": "Task updated successfully",
        "task": task
    })))
}

/// 删除任务
pub async fn delete_task(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.task_service.delete(&auth_context, parse_task_id(&id)?).await?;

    Ok(Json(json!({ "message": "Task deleted successfully" })))
}

/// 不是合法 UUID 的 ID 不可能对应任何任务，按不存在处理
fn parse_task_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound)
}
