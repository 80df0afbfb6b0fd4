// crates/sirsi-core/src/user.rs

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AdminError;
use crate::traits::Entity;
use crate::validate;

/// Operator role within the control plane.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserRole {
    Admin,
    Operator,
    #[default]
    Viewer,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::Admin => write!(f, "Admin"),
            UserRole::Operator => write!(f, "Operator"),
            UserRole::Viewer => write!(f, "Viewer"),
        }
    }
}

/// A control-plane user. `email` is unique (case-insensitive).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UserDraft {
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub role: Option<UserRole>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UserPatch {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<UserRole>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFilter {
    #[serde(default)]
    pub role: Option<UserRole>,
}

impl Entity for User {
    type Draft = UserDraft;
    type Patch = UserPatch;
    type Filter = UserFilter;

    const KIND: &'static str = "user";

    fn id(&self) -> Uuid {
        self.id
    }

    fn from_draft(id: Uuid, draft: UserDraft, now: DateTime<Utc>) -> Result<Self, AdminError> {
        validate::email("email", &draft.email)?;
        validate::non_empty("name", &draft.name)?;
        Ok(User {
            id,
            email: draft.email,
            name: draft.name,
            role: draft.role.unwrap_or_default(),
            created_at: now,
        })
    }

    fn apply_patch(&mut self, patch: UserPatch) -> Result<(), AdminError> {
        if let Some(email) = patch.email {
            validate::email("email", &email)?;
            self.email = email;
        }
        if let Some(name) = patch.name {
            validate::non_empty("name", &name)?;
            self.name = name;
        }
        if let Some(role) = patch.role {
            self.role = role;
        }
        Ok(())
    }

    fn matches(&self, filter: &UserFilter) -> bool {
        filter.role.map_or(true, |r| r == self.role)
    }

    fn unique_keys(&self) -> Vec<(&'static str, String)> {
        vec![("email", self.email.to_ascii_lowercase())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_key_is_lowercased() {
        let u = User::from_draft(
            Uuid::now_v7(),
            UserDraft {
                email: "Cylton@Sirsi.ai".to_string(),
                name: "Cylton".to_string(),
                role: Some(UserRole::Admin),
            },
            Utc::now(),
        )
        .unwrap();
        assert_eq!(u.unique_keys(), vec![("email", "cylton@sirsi.ai".to_string())]);
        assert_eq!(u.role.to_string(), "Admin");
    }

    #[test]
    fn test_default_role_is_viewer() {
        let u = User::from_draft(
            Uuid::now_v7(),
            UserDraft {
                email: "v@sirsi.ai".to_string(),
                name: "V".to_string(),
                role: None,
            },
            Utc::now(),
        )
        .unwrap();
        assert_eq!(u.role, UserRole::Viewer);
    }
}
