use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Portal role a user can hold. Stored as its string identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PortalRole {
    #[serde(rename = "ROLE_PORTAL_USER")]
    User,
    #[serde(rename = "ROLE_PORTAL_ADMIN")]
    Admin,
    #[serde(rename = "ROLE_PORTAL_SUPERADMIN")]
    Superadmin,
}

impl PortalRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            PortalRole::User => "ROLE_PORTAL_USER",
            PortalRole::Admin => "ROLE_PORTAL_ADMIN",
            PortalRole::Superadmin => "ROLE_PORTAL_SUPERADMIN",
        }
    }

    /// Role set assigned on registration.
    pub fn default_set() -> BTreeSet<PortalRole> {
        BTreeSet::from([PortalRole::User])
    }
}

impl fmt::Display for PortalRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PortalRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ROLE_PORTAL_USER" => Ok(PortalRole::User),
            "ROLE_PORTAL_ADMIN" => Ok(PortalRole::Admin),
            "ROLE_PORTAL_SUPERADMIN" => Ok(PortalRole::Superadmin),
            other => Err(format!("unknown role {other}")),
        }
    }
}

/// Raw row from the `users` table.
#[derive(Debug, FromRow)]
pub struct UserRow {
    pub user_id: Uuid,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub hashed_password: String,
    pub is_active: bool,
    pub roles: Vec<String>,
    pub created_at: OffsetDateTime,
}

/// User record.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub user_id: Uuid,
    pub name: String,
    pub surname: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub hashed_password: String, // Argon2 hash, not exposed in JSON
    pub is_active: bool,
    pub roles: BTreeSet<PortalRole>,
    pub created_at: OffsetDateTime,
}

impl TryFrom<UserRow> for User {
    type Error = String;

    fn try_from(r: UserRow) -> Result<Self, Self::Error> {
        let roles = r
            .roles
            .iter()
            .map(|s| s.parse::<PortalRole>())
            .collect::<Result<BTreeSet<_>, _>>()?;
        if roles.is_empty() {
            return Err(format!("user {} has no roles", r.user_id));
        }
        Ok(Self {
            user_id: r.user_id,
            name: r.name,
            surname: r.surname,
            email: r.email,
            hashed_password: r.hashed_password,
            is_active: r.is_active,
            roles,
            created_at: r.created_at,
        })
    }
}

/// Insert payload; the password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub surname: String,
    pub email: String,
    pub hashed_password: String,
    pub roles: BTreeSet<PortalRole>,
}

impl NewUser {
    pub fn role_names(&self) -> Vec<String> {
        self.roles.iter().map(|r| r.as_str().to_string()).collect()
    }
}

/// Sparse update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub email: Option<String>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.surname.is_none() && self.email.is_none()
    }
}
