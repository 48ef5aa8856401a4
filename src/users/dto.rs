use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::users::repo_types::{PortalRole, User, UserPatch};

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub surname: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub email: Option<String>,
}

impl From<UpdateUserRequest> for UserPatch {
    fn from(r: UpdateUserRequest) -> Self {
        Self {
            name: r.name,
            surname: r.surname,
            email: r.email,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
pub struct ShowUser {
    pub user_id: Uuid,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub is_active: bool,
    pub roles: BTreeSet<PortalRole>,
}

impl From<User> for ShowUser {
    fn from(u: User) -> Self {
        Self {
            user_id: u.user_id,
            name: u.name,
            surname: u.surname,
            email: u.email,
            is_active: u.is_active,
            roles: u.roles,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UpdatedUserResponse {
    pub updated_user_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct DeletedUserResponse {
    pub deleted_user_id: Uuid,
}
