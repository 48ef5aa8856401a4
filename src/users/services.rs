use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    auth::password::hash_password,
    errors::AppError,
    users::{
        repo::UserStore,
        repo_types::{NewUser, PortalRole, User, UserPatch},
    },
};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn is_letters_only(value: &str) -> bool {
    lazy_static! {
        static ref LETTERS_RE: Regex = Regex::new(r"^\p{Alphabetic}+$").unwrap();
    }
    LETTERS_RE.is_match(value)
}

fn validate_letters(field: &str, value: &str) -> Result<(), AppError> {
    if value.is_empty() {
        return Err(AppError::Validation(format!("{field} must not be empty")));
    }
    if !is_letters_only(value) {
        return Err(AppError::Validation(format!(
            "{field} should contain only letters"
        )));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), AppError> {
    if !is_valid_email(email) {
        return Err(AppError::Validation("Invalid email".into()));
    }
    Ok(())
}

fn validate_patch(patch: &UserPatch) -> Result<(), AppError> {
    if patch.is_empty() {
        return Err(AppError::Validation(
            "At least one parameter for user update info should be provided".into(),
        ));
    }
    if let Some(name) = &patch.name {
        validate_letters("Name", name)?;
    }
    if let Some(surname) = &patch.surname {
        validate_letters("Surname", surname)?;
    }
    if let Some(email) = &patch.email {
        validate_email(email)?;
    }
    Ok(())
}

/// Registers a new active user with the default role set.
pub async fn create_user(
    store: &dyn UserStore,
    name: &str,
    surname: &str,
    email: &str,
    password: &str,
) -> Result<User, AppError> {
    validate_letters("Name", name)?;
    validate_letters("Surname", surname)?;
    validate_email(email)?;

    let hashed_password = hash_password(password)?;
    let user = store
        .insert(NewUser {
            name: name.to_string(),
            surname: surname.to_string(),
            email: email.to_string(),
            hashed_password,
            roles: PortalRole::default_set(),
        })
        .await?;

    info!(user_id = %user.user_id, "user created");
    Ok(user)
}

/// Point lookup. A missing user is `Ok(None)`, deactivated users are returned too.
pub async fn fetch_user(store: &dyn UserStore, user_id: Uuid) -> Result<Option<User>, AppError> {
    Ok(store.find_by_id(user_id).await?)
}

/// Applies the provided fields. Shape is checked first, then existence, then the write.
pub async fn update_user(
    store: &dyn UserStore,
    user_id: Uuid,
    patch: UserPatch,
) -> Result<Uuid, AppError> {
    validate_patch(&patch)?;

    if store.find_by_id(user_id).await?.is_none() {
        debug!(%user_id, "update on missing user");
        return Err(AppError::user_not_found(user_id));
    }

    let updated = store
        .update(user_id, &patch)
        .await?
        .ok_or_else(|| AppError::user_not_found(user_id))?;

    info!(user_id = %updated, "user updated");
    Ok(updated)
}

/// Marks the user inactive. The row is kept.
pub async fn delete_user(store: &dyn UserStore, user_id: Uuid) -> Result<Uuid, AppError> {
    let deleted = store
        .deactivate(user_id)
        .await?
        .ok_or_else(|| AppError::user_not_found(user_id))?;

    info!(user_id = %deleted, "user deactivated");
    Ok(deleted)
}
