//! In-memory user directory for development and testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::traits::{NewUser, UserDirectory};
use crate::auth::user::User;
use crate::error::{AllServeError, Result};

/// All maps live under one lock so create_user can check both unique indexes
/// and insert in a single atomic step.
#[derive(Default)]
struct DirectoryInner {
    users: HashMap<Uuid, User>,
    by_login: HashMap<String, Uuid>,
    by_email: HashMap<String, Uuid>,
}

/// In-memory `UserDirectory` implementation
#[derive(Clone, Default)]
pub struct MemoryUserDirectory {
    inner: Arc<RwLock<DirectoryInner>>,
}

impl MemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of persisted users
    pub async fn len(&self) -> usize {
        self.inner.read().await.users.len()
    }
}

#[async_trait]
impl UserDirectory for MemoryUserDirectory {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn find_by_login(&self, login: &str) -> Result<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner
            .by_login
            .get(login)
            .and_then(|id| inner.users.get(id))
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner
            .by_email
            .get(email)
            .and_then(|id| inner.users.get(id))
            .cloned())
    }

    async fn create_user(&self, fields: NewUser) -> Result<User> {
        let mut inner = self.inner.write().await;

        if inner.by_login.contains_key(&fields.login) {
            return Err(AllServeError::ProvisioningConflict(format!(
                "login '{}' already exists",
                fields.login
            )));
        }
        if inner.by_email.contains_key(&fields.email) {
            return Err(AllServeError::ProvisioningConflict(format!(
                "email '{}' already exists",
                fields.email
            )));
        }

        let now = chrono::Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: fields.name,
            role: fields.role,
            status: fields.status,
            profile: fields.profile,
            login: fields.login,
            password_hash: fields.password_hash,
            email: fields.email,
            created_at: now,
            updated_at: now,
        };

        inner.by_login.insert(user.login.clone(), user.id);
        inner.by_email.insert(user.email.clone(), user.id);
        inner.users.insert(user.id, user.clone());

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::user::{Profile, UserStatus};

    fn fields(login: &str, email: &str) -> NewUser {
        NewUser {
            name: "Test User".to_string(),
            role: "N/A".to_string(),
            status: UserStatus::Active,
            profile: Profile::Operator,
            login: login.to_string(),
            password_hash: "$argon2id$stub".to_string(),
            email: email.to_string(),
        }
    }

    #[tokio::test]
    async fn create_and_lookup() {
        let directory = MemoryUserDirectory::new();
        let created = directory.create_user(fields("ana", "ana@example.com")).await.unwrap();

        let by_login = directory.find_by_login("ana").await.unwrap().unwrap();
        let by_email = directory.find_by_email("ana@example.com").await.unwrap().unwrap();
        let by_id = directory.find_by_id(created.id).await.unwrap().unwrap();

        assert_eq!(by_login.id, created.id);
        assert_eq!(by_email.id, created.id);
        assert_eq!(by_id.id, created.id);
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let directory = MemoryUserDirectory::new();
        directory.create_user(fields("ana", "ana@example.com")).await.unwrap();

        let result = directory.create_user(fields("ana2", "ana@example.com")).await;
        assert!(matches!(result, Err(AllServeError::ProvisioningConflict(_))));
        assert_eq!(directory.len().await, 1);
    }

    #[tokio::test]
    async fn duplicate_login_conflicts() {
        let directory = MemoryUserDirectory::new();
        directory.create_user(fields("ana", "ana@example.com")).await.unwrap();

        let result = directory.create_user(fields("ana", "other@example.com")).await;
        assert!(matches!(result, Err(AllServeError::ProvisioningConflict(_))));
    }
}
