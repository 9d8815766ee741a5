//! 测试公共模块
//! 提供测试配置、应用构建和请求辅助函数

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use secrecy::Secret;
use serde_json::{json, Value};
use std::sync::Arc;
use tasktrack::{
    config::{AppConfig, LoggingConfig, SecurityConfig, ServerConfig},
    middleware::AppState,
    repository::{InMemoryTaskRepository, InMemoryUserRepository},
    routes,
};
use tower::ServiceExt;

pub const TEST_SECRET: &str = "test-secret-key-for-testing-only-min-32-chars";

/// 创建测试配置
pub fn create_test_config() -> AppConfig {
    create_test_config_with_policy("not_found")
}

pub fn create_test_config_with_policy(ownership_denial: &str) -> AppConfig {
    AppConfig {
        server: ServerConfig {
            addr: "127.0.0.1:0".to_string(), // 使用随机端口
            graceful_shutdown_timeout_secs: 5,
            body_limit_bytes: 64 * 1024,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
            format: "pretty".to_string(),
        },
        security: SecurityConfig {
            jwt_secret: Secret::new(TEST_SECRET.to_string()),
            token_ttl_secs: 3600,
            ownership_denial: ownership_denial.to_string(),
        },
    }
}

/// 测试应用：路由加上可直接检查的存储
pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
    pub users: Arc<InMemoryUserRepository>,
    pub tasks: Arc<InMemoryTaskRepository>,
}

pub fn create_test_app() -> TestApp {
    create_test_app_with_config(create_test_config())
}

pub fn create_test_app_with_config(config: AppConfig) -> TestApp {
    let users = Arc::new(InMemoryUserRepository::new());
    let tasks = Arc::new(InMemoryTaskRepository::new());

    let state = Arc::new(
        AppState::with_repositories(config, users.clone(), tasks.clone())
            .expect("Failed to create app state"),
    );

    TestApp {
        router: routes::create_router(state.clone()),
        state,
        users,
        tasks,
    }
}

impl TestApp {
    /// 发送请求并把响应体解析成 JSON
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send_request(request).await
    }

    /// 发送原始请求体，不设置或自定义 Content-Type
    pub async fn send_raw(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        content_type: Option<&str>,
        body: &str,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }

        let request = builder.body(Body::from(body.to_string())).unwrap();
        self.send_request(request).await
    }

    pub async fn send_request(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        (status, json)
    }

    /// 注册用户并返回 (token, user_id)
    pub async fn register(&self, email: &str, password: &str, name: &str) -> (String, String) {
        let (status, body) = self
            .send(
                "POST",
                "/api/auth/register",
                None,
                Some(json!({ "email": email, "password": password, "name": name })),
            )
            .await;

        assert_eq!(status, StatusCode::CREATED, "registration failed: {}", body);

        (
            body["token"].as_str().unwrap().to_string(),
            body["user"]["id"].as_str().unwrap().to_string(),
        )
    }

    /// 创建任务并返回任务 ID
    pub async fn create_task(&self, token: &str, title: &str) -> String {
        let (status, body) = self
            .send("POST", "/api/tasks", Some(token), Some(json!({ "title": title })))
            .await;

        assert_eq!(status, StatusCode::CREATED, "task creation failed: {}", body);
        body["task"]["id"].as_str().unwrap().to_string()
    }
}
