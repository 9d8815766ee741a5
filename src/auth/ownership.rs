//! 资源所有权校验

use crate::{auth::middleware::AuthContext, config::DenialPolicy, error::AppError};
use uuid::Uuid;

/// 调用方是否为资源所有者
pub fn is_owner(ctx: &AuthContext, owner_id: &Uuid) -> bool {
    ctx.user_id == *owner_id
}

/// 检查所有权，非所有者按策略返回 404 或 403
pub fn require_owner(
    ctx: &AuthContext,
    owner_id: &Uuid,
    policy: DenialPolicy,
) -> Result<(), AppError> {
    if is_owner(ctx, owner_id) {
        return Ok(());
    }

    tracing::warn!(
        user_id = %ctx.user_id,
        owner_id = %owner_id,
        "Ownership check failed"
    );

    match policy {
        DenialPolicy::NotFound => Err(AppError::NotFound),
        DenialPolicy::Forbidden => Err(AppError::Forbidden),
    }
}
