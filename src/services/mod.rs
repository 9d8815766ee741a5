//! Business logic services layer

pub mod auth_service;
pub mod task_service;

pub use auth_service::AuthService;
pub use task_service::TaskService;
