//! User repository (凭据存储)

use crate::{error::AppError, models::user::User};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Credential store.
///
/// Emails are compared byte for byte (case-sensitive, no trimming).
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user. Fails with [`AppError::DuplicateIdentity`] when the
    /// email is already taken; the uniqueness check and the insert are atomic.
    async fn insert(&self, user: User) -> Result<User, AppError>;

    /// 根据邮箱查找用户
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// 根据 ID 查找用户
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<User>, AppError>;

    /// 统计用户数量
    async fn count(&self) -> Result<usize, AppError>;
}

#[derive(Default)]
struct UserTable {
    by_id: HashMap<Uuid, User>,
    id_by_email: HashMap<String, Uuid>,
}

/// In-memory credential store guarded by a single lock
#[derive(Default)]
pub struct InMemoryUserRepository {
    table: RwLock<UserTable>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: User) -> Result<User, AppError> {
        let mut table = self.table.write().await;

        if table.id_by_email.contains_key(&user.email) || table.by_id.contains_key(&user.id) {
            return Err(AppError::DuplicateIdentity);
        }

        table.id_by_email.insert(user.email.clone(), user.id);
        table.by_id.insert(user.id, user.clone());

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let table = self.table.read().await;

        Ok(table
            .id_by_email
            .get(email)
            .and_then(|id| table.by_id.get(id))
            .cloned())
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<User>, AppError> {
        Ok(self.table.read().await.by_id.get(id).cloned())
    }

    async fn count(&self) -> Result<usize, AppError> {
        Ok(self.table.read().await.by_id.len())
    }
}
