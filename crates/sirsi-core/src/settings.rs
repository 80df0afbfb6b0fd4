// crates/sirsi-core/src/settings.rs
//
// The singleton settings document and its partial-update patch.
//
// On-disk and on-wire schema (camelCase):
//   { "maintenanceMode": bool, "activeRegion": string, "sirsiMultiplier": f64 }

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::AdminError;

/// Deployment-wide settings. Exactly one logical instance per deployment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub maintenance_mode: bool,
    pub active_region: String,
    pub sirsi_multiplier: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            maintenance_mode: false,
            active_region: "us-central1".to_string(),
            sirsi_multiplier: 2.0,
        }
    }
}

impl Settings {
    /// Reject documents that could not have been written by a sane operator.
    pub fn validate(&self) -> Result<(), AdminError> {
        if self.active_region.trim().is_empty() {
            return Err(AdminError::Validation(
                "activeRegion must not be empty".to_string(),
            ));
        }
        if !self.sirsi_multiplier.is_finite() || self.sirsi_multiplier <= 0.0 {
            return Err(AdminError::Validation(format!(
                "sirsiMultiplier must be a positive finite number, got {}",
                self.sirsi_multiplier
            )));
        }
        Ok(())
    }

    /// Content version: first 16 hex chars of SHA-256 over the canonical JSON.
    ///
    /// Two documents with equal fields always share a version, so clients can
    /// use it for compare-and-set without the store tracking a counter.
    pub fn version(&self) -> String {
        // Field order is fixed by the struct definition, so this is canonical.
        let json = serde_json::to_vec(self).unwrap_or_default();
        let digest = Sha256::digest(&json);
        digest
            .iter()
            .take(8)
            .map(|b| format!("{:02x}", b))
            .collect()
    }

    /// Return a copy with the patch applied. Does not validate.
    pub fn patched(&self, patch: &SettingsPatch) -> Settings {
        Settings {
            maintenance_mode: patch.maintenance_mode.unwrap_or(self.maintenance_mode),
            active_region: patch
                .active_region
                .clone()
                .unwrap_or_else(|| self.active_region.clone()),
            sirsi_multiplier: patch.sirsi_multiplier.unwrap_or(self.sirsi_multiplier),
        }
    }
}

/// Partial settings update. Absent fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SettingsPatch {
    #[serde(default)]
    pub maintenance_mode: Option<bool>,
    #[serde(default)]
    pub active_region: Option<String>,
    #[serde(default)]
    pub sirsi_multiplier: Option<f64>,
}

impl SettingsPatch {
    pub fn is_empty(&self) -> bool {
        self.maintenance_mode.is_none()
            && self.active_region.is_none()
            && self.sirsi_multiplier.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_compiled_in_document() {
        let s = Settings::default();
        assert!(!s.maintenance_mode);
        assert_eq!(s.active_region, "us-central1");
        assert_eq!(s.sirsi_multiplier, 2.0);
    }

    #[test]
    fn test_camel_case_schema() {
        let json = serde_json::to_value(Settings::default()).unwrap();
        assert_eq!(json["maintenanceMode"], false);
        assert_eq!(json["activeRegion"], "us-central1");
        assert_eq!(json["sirsiMultiplier"], 2.0);
    }

    #[test]
    fn test_patch_keeps_absent_fields() {
        let base = Settings::default();
        let patch = SettingsPatch {
            sirsi_multiplier: Some(3.5),
            ..Default::default()
        };
        let next = base.patched(&patch);
        assert_eq!(next.sirsi_multiplier, 3.5);
        assert_eq!(next.active_region, base.active_region);
        assert_eq!(next.maintenance_mode, base.maintenance_mode);
    }

    #[test]
    fn test_validate_rejects_bad_multiplier() {
        let mut s = Settings::default();
        s.sirsi_multiplier = 0.0;
        assert!(matches!(s.validate(), Err(AdminError::Validation(_))));
        s.sirsi_multiplier = f64::NAN;
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_blank_region() {
        let mut s = Settings::default();
        s.active_region = "  ".to_string();
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_version_tracks_content() {
        let a = Settings::default();
        let mut b = Settings::default();
        assert_eq!(a.version(), b.version());
        assert_eq!(a.version().len(), 16);
        b.maintenance_mode = true;
        assert_ne!(a.version(), b.version());
    }

    #[test]
    fn test_patch_rejects_unknown_fields() {
        let res: Result<SettingsPatch, _> =
            serde_json::from_str(r#"{"multiplier": 3.5}"#);
        assert!(res.is_err());
    }
}
