// crates/sirsi-facade/src/schema.rs
//
// Wire schema versions served by one facade. v2 is additive over v1.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaVersion {
    V1,
    #[default]
    V2,
}

impl SchemaVersion {
    pub const ALL: [SchemaVersion; 2] = [SchemaVersion::V1, SchemaVersion::V2];

    /// Package segment used in service names, e.g. `sirsi.admin.v2`.
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaVersion::V1 => "v1",
            SchemaVersion::V2 => "v2",
        }
    }

    /// Whether the overview carries revenue and the activity feed.
    pub fn has_extended_overview(&self) -> bool {
        matches!(self, SchemaVersion::V2)
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_v2_extends_overview() {
        assert!(!SchemaVersion::V1.has_extended_overview());
        assert!(SchemaVersion::V2.has_extended_overview());
        assert_eq!(SchemaVersion::default(), SchemaVersion::V2);
    }
}
