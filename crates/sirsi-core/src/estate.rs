// crates/sirsi-core/src/estate.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AdminError;
use crate::traits::Entity;
use crate::validate;

/// Lifecycle phase of an estate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EstatePhase {
    #[default]
    Planning,
    Funding,
    Active,
    Closed,
}

/// An estate managed through the admin service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Estate {
    /// Assigned at creation, immutable thereafter.
    pub id: Uuid,
    pub name: String,
    pub owner_email: String,
    pub phase: EstatePhase,
    pub created_at: DateTime<Utc>,
}

/// Fields a caller may supply when creating an estate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EstateDraft {
    pub name: String,
    pub owner_email: String,
    #[serde(default)]
    pub phase: Option<EstatePhase>,
}

/// Partial update of an estate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EstatePatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub owner_email: Option<String>,
    #[serde(default)]
    pub phase: Option<EstatePhase>,
}

/// List filter for estates. Absent fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstateFilter {
    #[serde(default)]
    pub phase: Option<EstatePhase>,
    #[serde(default)]
    pub owner_email: Option<String>,
}

impl Entity for Estate {
    type Draft = EstateDraft;
    type Patch = EstatePatch;
    type Filter = EstateFilter;

    const KIND: &'static str = "estate";

    fn id(&self) -> Uuid {
        self.id
    }

    fn from_draft(id: Uuid, draft: EstateDraft, now: DateTime<Utc>) -> Result<Self, AdminError> {
        validate::non_empty("name", &draft.name)?;
        validate::email("ownerEmail", &draft.owner_email)?;
        Ok(Estate {
            id,
            name: draft.name,
            owner_email: draft.owner_email,
            phase: draft.phase.unwrap_or_default(),
            created_at: now,
        })
    }

    fn apply_patch(&mut self, patch: EstatePatch) -> Result<(), AdminError> {
        if let Some(name) = patch.name {
            validate::non_empty("name", &name)?;
            self.name = name;
        }
        if let Some(owner_email) = patch.owner_email {
            validate::email("ownerEmail", &owner_email)?;
            self.owner_email = owner_email;
        }
        if let Some(phase) = patch.phase {
            self.phase = phase;
        }
        Ok(())
    }

    fn matches(&self, filter: &EstateFilter) -> bool {
        filter.phase.map_or(true, |p| p == self.phase)
            && filter
                .owner_email
                .as_deref()
                .map_or(true, |e| e.eq_ignore_ascii_case(&self.owner_email))
    }
}
