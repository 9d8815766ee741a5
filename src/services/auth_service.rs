//! 认证服务：注册、登录、当前用户

use crate::{
    auth::{jwt::TokenService, middleware::AuthContext, password::PasswordHasher},
    error::AppError,
    models::{auth::*, user::*},
    repository::user_repo::UserRepository,
};
use std::sync::Arc;

/// Verified against when the email is unknown, so both login failures cost
/// the same amount of hashing work.
const DUMMY_PASSWORD: &str = "tasktrack-timing-equalizer";

pub struct AuthService {
    users: Arc<dyn UserRepository>,
    token_service: Arc<TokenService>,
    hasher: Arc<PasswordHasher>,
    dummy_hash: String,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        token_service: Arc<TokenService>,
    ) -> Result<Self, AppError> {
        let hasher = Arc::new(PasswordHasher::new());
        let dummy_hash = hasher.hash(DUMMY_PASSWORD)?;

        Ok(Self {
            users,
            token_service,
            hasher,
            dummy_hash,
        })
    }

    /// 用户注册
    pub async fn register(&self, req: RegisterRequest) -> Result<AuthResponse, AppError> {
        let (Some(email), Some(password), Some(name)) =
            (present(req.email), present(req.password), present(req.name))
        else {
            return Err(AppError::Validation("All fields are required".to_string()));
        };

        // 哈希在加锁插入之前完成
        let password_hash = self.hash_password(password).await?;

        let user = self
            .users
            .insert(User::new(email, password_hash, name))
            .await
            .map_err(|e| {
                if matches!(e, AppError::DuplicateIdentity) {
                    tracing::info!("Registration rejected: email already registered");
                }
                e
            })?;

        let token = self.token_service.issue(&user)?;

        metrics::counter!("auth_registrations_total").increment(1);
        tracing::info!(user_id = %user.id, "User registered");

        Ok(AuthResponse {
            message: "User registered successfully".to_string(),
            token,
            expires_in: self.token_service.ttl_secs(),
            user: UserResponse::from(user),
        })
    }

    /// 用户登录
    ///
    /// Unknown email and wrong password are the same error to the caller.
    pub async fn login(&self, req: LoginRequest) -> Result<AuthResponse, AppError> {
        let (Some(email), Some(password)) = (present(req.email), present(req.password)) else {
            return Err(AppError::Validation(
                "Email and password are required".to_string(),
            ));
        };

        let user = self.users.find_by_email(&email).await?;

        let Some(user) = user else {
            self.verify_password(password, self.dummy_hash.clone()).await;
            metrics::counter!("auth_logins_total", "outcome" => "unknown_user").increment(1);
            tracing::info!("Login failed: unknown email");
            return Err(AppError::InvalidCredentials);
        };

        if !self
            .verify_password(password, user.password_hash.clone())
            .await
        {
            metrics::counter!("auth_logins_total", "outcome" => "bad_password").increment(1);
            tracing::info!(user_id = %user.id, "Login failed: password mismatch");
            return Err(AppError::InvalidCredentials);
        }

        let token = self.token_service.issue(&user)?;

        metrics::counter!("auth_logins_total", "outcome" => "success").increment(1);
        tracing::info!(user_id = %user.id, "User logged in");

        Ok(AuthResponse {
            message: "Login successful".to_string(),
            token,
            expires_in: self.token_service.ttl_secs(),
            user: UserResponse::from(user),
        })
    }

    /// 当前登录用户的资料
    pub async fn current_user(&self, ctx: &AuthContext) -> Result<UserResponse, AppError> {
        self.users
            .find_by_id(&ctx.user_id)
            .await?
            .map(UserResponse::from)
            .ok_or(AppError::NotFound)
    }

    /// Argon2 is CPU-bound, keep it off the async workers
    async fn hash_password(&self, password: String) -> Result<String, AppError> {
        let hasher = self.hasher.clone();

        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))?
            .map_err(AppError::from)
    }

    /// Any verification failure, including a malformed stored hash, is a mismatch
    async fn verify_password(&self, password: String, hash: String) -> bool {
        let hasher = self.hasher.clone();

        match tokio::task::spawn_blocking(move || hasher.verify(&password, &hash)).await {
            Ok(Ok(matched)) => matched,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Stored password hash could not be verified");
                false
            }
            Err(e) => {
                tracing::error!(error = %e, "Password verification task failed");
                false
            }
        }
    }
}

/// Presence check only: absent and empty are both missing
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
