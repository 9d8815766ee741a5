//! JWT 认证中间件
//! 受保护路由的唯一入口：校验令牌并把身份注入请求扩展

use crate::{
    auth::jwt::TokenService,
    error::{AppError, AuthFailure},
};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use uuid::Uuid;

const BEARER_PREFIX: &str = "Bearer ";

/// 认证上下文（附加到请求扩展）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub email: String,
}

// 实现 FromRequestParts 以便在 handler 中直接提取 AuthContext
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or(AppError::Unauthenticated(AuthFailure::MissingToken))
    }
}

/// 从 Authorization 头提取令牌，前缀必须严格为 "Bearer "
pub fn extract_token(headers: &HeaderMap) -> Result<String, AppError> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .ok_or(AppError::Unauthenticated(AuthFailure::MissingToken))
}

/// JWT 认证中间件 - 必须认证
pub async fn jwt_auth_middleware(
    State(token_service): State<Arc<TokenService>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    // 从 Authorization 头提取令牌
    let token = extract_token(req.headers()).map_err(|e| {
        tracing::debug!(uri = %req.uri(), "No bearer token");
        metrics::counter!("auth_token_rejections_total", "reason" => "missing").increment(1);
        e
    })?;

    // 验证令牌，失败原因只进日志和指标
    let claims = token_service.verify(&token).map_err(|e| {
        tracing::warn!(reason = e.reason(), uri = %req.uri(), "Bearer token rejected");
        metrics::counter!("auth_token_rejections_total", "reason" => e.reason()).increment(1);
        AppError::from(e)
    })?;

    let auth_context = AuthContext {
        user_id: claims.sub,
        email: claims.email,
    };

    tracing::debug!(user_id = %auth_context.user_id, "Request authenticated");

    // 附加到请求扩展
    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}
