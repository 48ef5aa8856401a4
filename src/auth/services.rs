use tracing::{debug, warn};

use crate::{
    auth::password::verify_password,
    users::{repo::StoreError, repo::UserStore, repo_types::User},
};

/// Looks up `username` (an email) and checks the password against the stored hash.
///
/// Unknown user, wrong password and deactivated account all yield `Ok(None)`
/// so callers cannot tell them apart. Only store failures are errors.
pub async fn authenticate(
    store: &dyn UserStore,
    username: &str,
    password: &str,
) -> Result<Option<User>, StoreError> {
    let Some(user) = store.find_by_email(username).await? else {
        debug!(email = %username, "login unknown email");
        return Ok(None);
    };

    if !verify_password(password, &user.hashed_password) {
        warn!(user_id = %user.user_id, "login invalid password");
        return Ok(None);
    }

    if !user.is_active {
        warn!(user_id = %user.user_id, "login on deactivated account");
        return Ok(None);
    }

    Ok(Some(user))
}
