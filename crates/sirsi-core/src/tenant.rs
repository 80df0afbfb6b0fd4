// crates/sirsi-core/src/tenant.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AdminError;
use crate::traits::Entity;
use crate::validate;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TenantStatus {
    #[default]
    Active,
    Suspended,
    Deactivated,
}

/// A tenant of the platform. `slug` is unique across all tenants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub status: TenantStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TenantDraft {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TenantPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<TenantStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantFilter {
    #[serde(default)]
    pub status: Option<TenantStatus>,
}

impl Entity for Tenant {
    type Draft = TenantDraft;
    type Patch = TenantPatch;
    type Filter = TenantFilter;

    const KIND: &'static str = "tenant";

    fn id(&self) -> Uuid {
        self.id
    }

    fn from_draft(id: Uuid, draft: TenantDraft, now: DateTime<Utc>) -> Result<Self, AdminError> {
        validate::non_empty("name", &draft.name)?;
        validate::slug(&draft.slug)?;
        Ok(Tenant {
            id,
            name: draft.name,
            slug: draft.slug,
            description: draft.description,
            status: TenantStatus::Active,
            created_at: now,
        })
    }

    fn apply_patch(&mut self, patch: TenantPatch) -> Result<(), AdminError> {
        if let Some(name) = patch.name {
            validate::non_empty("name", &name)?;
            self.name = name;
        }
        if let Some(slug) = patch.slug {
            validate::slug(&slug)?;
            self.slug = slug;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        Ok(())
    }

    fn matches(&self, filter: &TenantFilter) -> bool {
        filter.status.map_or(true, |s| s == self.status)
    }

    fn unique_keys(&self) -> Vec<(&'static str, String)> {
        vec![("slug", self.slug.to_ascii_lowercase())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tenant_is_active() {
        let t = Tenant::from_draft(
            Uuid::now_v7(),
            TenantDraft {
                name: "FinalWishes".to_string(),
                slug: "finalwishes".to_string(),
                description: "Legacy management".to_string(),
            },
            Utc::now(),
        )
        .unwrap();
        assert_eq!(t.status, TenantStatus::Active);
        assert_eq!(t.unique_keys(), vec![("slug", "finalwishes".to_string())]);
    }

    #[test]
    fn test_bad_slug_rejected_on_patch() {
        let mut t = Tenant::from_draft(
            Uuid::now_v7(),
            TenantDraft {
                name: "Assiduous".to_string(),
                slug: "assiduous".to_string(),
                description: String::new(),
            },
            Utc::now(),
        )
        .unwrap();
        let res = t.apply_patch(TenantPatch {
            slug: Some("Not A Slug".to_string()),
            ..Default::default()
        });
        assert!(matches!(res, Err(AdminError::Validation(_))));
        assert_eq!(t.slug, "assiduous");
    }
}
