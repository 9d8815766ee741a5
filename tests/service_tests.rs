//! 服务层测试：注册唯一性（含并发）、登录与异常存储数据

use std::sync::Arc;
use tasktrack::{
    auth::jwt::TokenService,
    error::AppError,
    models::{auth::*, user::User},
    repository::{InMemoryUserRepository, UserRepository},
    services::AuthService,
};
use tokio::task::JoinSet;

mod common;
use common::create_test_config;

fn create_auth_service() -> (Arc<AuthService>, Arc<InMemoryUserRepository>) {
    let users = Arc::new(InMemoryUserRepository::new());
    let token_service = Arc::new(TokenService::from_config(&create_test_config()).unwrap());
    let service = AuthService::new(users.clone(), token_service).unwrap();

    (Arc::new(service), users)
}

fn register_request(email: &str, password: &str, name: &str) -> RegisterRequest {
    RegisterRequest {
        email: Some(email.to_string()),
        password: Some(password.to_string()),
        name: Some(name.to_string()),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_same_email_exactly_one_wins() {
    let (service, users) = create_auth_service();

    let mut set = JoinSet::new();
    for i in 0..8 {
        let service = service.clone();
        set.spawn(async move {
            service
                .register(register_request("race@x.com", &format!("pw{}", i), "Racer"))
                .await
        });
    }

    let mut succeeded = 0;
    let mut duplicates = 0;
    while let Some(result) = set.join_next().await {
        match result.unwrap() {
            Ok(_) => succeeded += 1,
            Err(AppError::DuplicateIdentity) => duplicates += 1,
            Err(e) => panic!("unexpected error: {:?}", e),
        }
    }

    assert_eq!(succeeded, 1);
    assert_eq!(duplicates, 7);
    assert_eq!(users.count().await.unwrap(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_distinct_emails_all_succeed() {
    let (service, users) = create_auth_service();

    let mut set = JoinSet::new();
    for i in 0..6 {
        let service = service.clone();
        set.spawn(async move {
            service
                .register(register_request(&format!("user{}@x.com", i), "pw", "User"))
                .await
        });
    }

    while let Some(result) = set.join_next().await {
        assert!(result.unwrap().is_ok());
    }

    assert_eq!(users.count().await.unwrap(), 6);
}

#[tokio::test]
async fn test_register_then_login() {
    let (service, _) = create_auth_service();

    let registered = service
        .register(register_request("a@x.com", "pw", "A"))
        .await
        .unwrap();

    let logged_in = service
        .login(LoginRequest {
            email: Some("a@x.com".to_string()),
            password: Some("pw".to_string()),
        })
        .await
        .unwrap();

    assert_eq!(registered.user.id, logged_in.user.id);
    assert_ne!(registered.token, logged_in.token);
}

#[tokio::test]
async fn test_corrupt_stored_hash_is_invalid_credentials() {
    let (service, users) = create_auth_service();

    users
        .insert(User::new(
            "broken@x.com".to_string(),
            "not-a-phc-hash".to_string(),
            "Broken".to_string(),
        ))
        .await
        .unwrap();

    let result = service
        .login(LoginRequest {
            email: Some("broken@x.com".to_string()),
            password: Some("anything".to_string()),
        })
        .await;

    assert!(matches!(result, Err(AppError::InvalidCredentials)));
}

#[tokio::test]
async fn test_stored_secret_is_hashed() {
    let (service, users) = create_auth_service();

    service
        .register(register_request("a@x.com", "plain-secret", "A"))
        .await
        .unwrap();

    let stored = users.find_by_email("a@x.com").await.unwrap().unwrap();
    assert_ne!(stored.password_hash, "plain-secret");
    assert!(stored.password_hash.starts_with("$argon2id$"));
}
