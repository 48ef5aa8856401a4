use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use tracing::warn;

use crate::{
    auth::jwt::JwtKeys,
    errors::AppError,
    state::AppState,
    users::{repo::UserStore, repo_types::User},
};

const INVALID_CREDENTIALS: &str = "Could not validate credentials";

fn unauthenticated() -> AppError {
    AppError::Unauthenticated(INVALID_CREDENTIALS.into())
}

/// Decodes `token` and re-reads its subject from the store.
///
/// The user is looked up on every call, so an account deactivated after the
/// token was issued is refused on its next request.
pub async fn resolve_session(
    keys: &JwtKeys,
    store: &dyn UserStore,
    token: &str,
) -> Result<User, AppError> {
    let claims = keys.decode(token).map_err(|e| {
        warn!(reason = %e, "token rejected");
        unauthenticated()
    })?;

    let email = claims.subject().ok_or_else(|| {
        warn!("token without subject");
        unauthenticated()
    })?;

    match store.find_by_email(email).await? {
        Some(user) if user.is_active => Ok(user),
        Some(user) => {
            warn!(user_id = %user.user_id, "token for deactivated user");
            Err(unauthenticated())
        }
        None => {
            warn!("token subject no longer exists");
            Err(unauthenticated())
        }
    }
}

/// Token from an `Authorization` value. The scheme name is case-insensitive.
fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Caller resolved from the `Authorization: Bearer` header.
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Read Authorization header
        let auth = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| AppError::Unauthenticated("Not authenticated".into()))?;

        let token = bearer_token(auth)
            .ok_or_else(|| AppError::Unauthenticated("Not authenticated".into()))?;

        let user = resolve_session(&state.keys, state.store.as_ref(), token).await?;
        Ok(CurrentUser(user))
    }
}
