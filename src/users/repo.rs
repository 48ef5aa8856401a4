use async_trait::async_trait;
use sqlx::{error::ErrorKind, PgPool};
use thiserror::Error;
use uuid::Uuid;

use crate::users::repo_types::{NewUser, User, UserPatch, UserRow};

#[derive(Debug, Error)]
pub enum StoreError {
    /// An integrity constraint (unique, check, foreign key, not null) rejected
    /// the write. Carries the database message, which names the constraint.
    #[error("{0}")]
    IntegrityViolation(String),
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
    #[error("corrupt user row: {0}")]
    Corrupt(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::Database(db)
                if matches!(
                    db.kind(),
                    ErrorKind::UniqueViolation
                        | ErrorKind::CheckViolation
                        | ErrorKind::ForeignKeyViolation
                        | ErrorKind::NotNullViolation
                ) =>
            {
                StoreError::IntegrityViolation(db.message().to_string())
            }
            other => StoreError::Database(other),
        }
    }
}

/// Persistence contract for user records.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn insert(&self, user: NewUser) -> Result<User, StoreError>;
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>, StoreError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    /// Applies the provided fields. `None` when no row has this id.
    async fn update(&self, user_id: Uuid, patch: &UserPatch) -> Result<Option<Uuid>, StoreError>;
    /// Flips `is_active` off. `None` when no active row has this id.
    async fn deactivate(&self, user_id: Uuid) -> Result<Option<Uuid>, StoreError>;
}

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn into_user(row: UserRow) -> Result<User, StoreError> {
    User::try_from(row).map_err(StoreError::Corrupt)
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (user_id, name, surname, email, hashed_password, roles)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING user_id, name, surname, email, hashed_password, is_active, roles, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&user.name)
        .bind(&user.surname)
        .bind(&user.email)
        .bind(&user.hashed_password)
        .bind(user.role_names())
        .fetch_one(&self.db)
        .await?;
        into_user(row)
    }

    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>, StoreError> {
        sqlx::query_as::<_, UserRow>(
            r#"
            SELECT user_id, name, surname, email, hashed_password, is_active, roles, created_at
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .map(into_user)
        .transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        sqlx::query_as::<_, UserRow>(
            r#"
            SELECT user_id, name, surname, email, hashed_password, is_active, roles, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?
        .map(into_user)
        .transpose()
    }

    async fn update(&self, user_id: Uuid, patch: &UserPatch) -> Result<Option<Uuid>, StoreError> {
        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            UPDATE users
               SET name = COALESCE($2, name),
                   surname = COALESCE($3, surname),
                   email = COALESCE($4, email)
             WHERE user_id = $1
            RETURNING user_id
            "#,
        )
        .bind(user_id)
        .bind(patch.name.as_deref())
        .bind(patch.surname.as_deref())
        .bind(patch.email.as_deref())
        .fetch_optional(&self.db)
        .await?;
        Ok(id)
    }

    async fn deactivate(&self, user_id: Uuid) -> Result<Option<Uuid>, StoreError> {
        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            UPDATE users
               SET is_active = FALSE
             WHERE user_id = $1 AND is_active = TRUE
            RETURNING user_id
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(id)
    }
}
