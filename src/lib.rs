//! 任务追踪 API 的认证与授权核心
//! 注册、登录、会话令牌校验与资源所有权检查

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repository;
pub mod routes;
pub mod services;
pub mod telemetry;
