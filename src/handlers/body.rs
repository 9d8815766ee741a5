//! JSON 请求体提取器
//! 解析失败统一转成 AppError，保证错误响应格式一致

use crate::error::AppError;
use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

/// 与 `Json<T>` 相同，但空请求体视为所有字段缺失，
/// 其余解析失败返回 400 而不是 axum 的纯文本拒绝
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned + Default + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|e| {
            tracing::debug!(error = %e, "Failed to read request body");
            AppError::Validation("Invalid request body".to_string())
        })?;

        // 空体交给后续的必填字段检查
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(JsonBody(T::default()));
        }

        let Json(value) = Json::<T>::from_bytes(&bytes).map_err(|e| {
            tracing::debug!(error = %e.body_text(), "Rejected JSON body");
            AppError::Validation("Invalid request body".to_string())
        })?;

        Ok(JsonBody(value))
    }
}
