use std::collections::HashMap;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::users::repo::{StoreError, UserStore};
use crate::users::repo_types::{NewUser, User, UserPatch};

const EMAIL_CONSTRAINT_MESSAGE: &str =
    r#"duplicate key value violates unique constraint "users_email_key""#;

/// In-process store with the same email uniqueness rule as the `users` table.
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<Uuid, User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn email_taken(users: &HashMap<Uuid, User>, email: &str, except: Option<Uuid>) -> bool {
    users
        .values()
        .any(|u| u.email == email && Some(u.user_id) != except)
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        if email_taken(&users, &user.email, None) {
            return Err(StoreError::IntegrityViolation(EMAIL_CONSTRAINT_MESSAGE.into()));
        }
        let record = User {
            user_id: Uuid::new_v4(),
            name: user.name,
            surname: user.surname,
            email: user.email,
            hashed_password: user.hashed_password,
            is_active: true,
            roles: user.roles,
            created_at: OffsetDateTime::now_utc(),
        };
        users.insert(record.user_id, record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(&user_id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn update(&self, user_id: Uuid, patch: &UserPatch) -> Result<Option<Uuid>, StoreError> {
        let mut users = self.users.write().await;
        if let Some(email) = &patch.email {
            if email_taken(&users, email, Some(user_id)) {
                return Err(StoreError::IntegrityViolation(EMAIL_CONSTRAINT_MESSAGE.into()));
            }
        }
        let Some(user) = users.get_mut(&user_id) else {
            return Ok(None);
        };
        if let Some(name) = &patch.name {
            user.name = name.clone();
        }
        if let Some(surname) = &patch.surname {
            user.surname = surname.clone();
        }
        if let Some(email) = &patch.email {
            user.email = email.clone();
        }
        Ok(Some(user_id))
    }

    async fn deactivate(&self, user_id: Uuid) -> Result<Option<Uuid>, StoreError> {
        let mut users = self.users.write().await;
        match users.get_mut(&user_id) {
            Some(user) if user.is_active => {
                user.is_active = false;
                Ok(Some(user_id))
            }
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::repo_types::PortalRole;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Linus".into(),
            surname: "Torvalds".into(),
            email: email.into(),
            hashed_password: "hash".into(),
            roles: PortalRole::default_set(),
        }
    }

    #[tokio::test]
    async fn duplicate_insert_reports_constraint_name() {
        let store = MemoryUserStore::new();
        store.insert(new_user("l@x.com")).await.unwrap();
        let err = store.insert(new_user("l@x.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::IntegrityViolation(ref m) if m.contains("users_email_key")));
    }

    #[tokio::test]
    async fn update_to_own_email_is_not_a_conflict() {
        let store = MemoryUserStore::new();
        let user = store.insert(new_user("l@x.com")).await.unwrap();
        let patch = UserPatch {
            email: Some("l@x.com".into()),
            ..Default::default()
        };
        assert_eq!(store.update(user.user_id, &patch).await.unwrap(), Some(user.user_id));
    }

    #[tokio::test]
    async fn deactivate_only_matches_active_rows() {
        let store = MemoryUserStore::new();
        let user = store.insert(new_user("l@x.com")).await.unwrap();
        assert_eq!(store.deactivate(user.user_id).await.unwrap(), Some(user.user_id));
        assert_eq!(store.deactivate(user.user_id).await.unwrap(), None);
        assert_eq!(store.deactivate(Uuid::new_v4()).await.unwrap(), None);
    }
}
