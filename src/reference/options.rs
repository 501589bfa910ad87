//! Lookup entities served by the dropdown endpoints.
//!
//! The backend is loose about scalar types (numeric ids, `0/1` flags), so
//! decoding accepts both shapes and normalizes them here.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Opaque identifier. Always compared as its decimal/string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Id(String);

impl Id {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Id {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for Id {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawScalar {
    Text(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Flag(bool),
}

impl RawScalar {
    fn into_text(self) -> String {
        match self {
            RawScalar::Text(s) => s,
            RawScalar::Int(n) => n.to_string(),
            RawScalar::UInt(n) => n.to_string(),
            RawScalar::Float(n) => n.to_string(),
            RawScalar::Flag(b) => b.to_string(),
        }
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        RawScalar::deserialize(deserializer).map(|raw| Id(raw.into_text()))
    }
}

/// Accepts `"text"`, numbers, or `null`.
pub(crate) fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let raw = Option::<RawScalar>::deserialize(deserializer)?;
    Ok(raw.map(RawScalar::into_text))
}

fn approval_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let raw = Option::<RawScalar>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawScalar::Flag(b)) => b,
        Some(RawScalar::Int(n)) => n == 1,
        Some(RawScalar::UInt(n)) => n == 1,
        Some(RawScalar::Float(n)) => n == 1.0,
        Some(RawScalar::Text(s)) => matches!(s.trim(), "1" | "true"),
        None => false,
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleOption {
    pub id: Id,
    pub role_name: String,
    #[serde(default, deserialize_with = "approval_flag")]
    pub needs_approval: bool,
}

/// Where a sector hangs in the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ParentSector {
    #[default]
    TopLevel,
    Child(Id),
}

impl Serialize for ParentSector {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ParentSector::TopLevel => serializer.serialize_str("none"),
            ParentSector::Child(id) => id.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for ParentSector {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<RawScalar>::deserialize(deserializer)?.map(RawScalar::into_text);
        Ok(match raw.as_deref().map(str::trim) {
            None | Some("") | Some("none") => ParentSector::TopLevel,
            Some(parent) => ParentSector::Child(Id::new(parent)),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectorOption {
    pub id: Id,
    pub sector_name: String,
    #[serde(default)]
    pub parent_sector: ParentSector,
}

impl SectorOption {
    pub fn is_top_level(&self) -> bool {
        self.parent_sector == ParentSector::TopLevel
    }

    /// Display depth: top-level sectors at 0, everything else indented once.
    pub fn depth(&self) -> usize {
        if self.is_top_level() {
            0
        } else {
            1
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupervisorOption {
    pub id: Id,
    pub user_name: String,
}

/// Anything carrying an `Id`, so one lookup serves all three lists.
pub trait Identified {
    fn id(&self) -> &Id;
}

impl Identified for RoleOption {
    fn id(&self) -> &Id {
        &self.id
    }
}

impl Identified for SectorOption {
    fn id(&self) -> &Id {
        &self.id
    }
}

impl Identified for SupervisorOption {
    fn id(&self) -> &Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_role_decodes_numeric_id_and_flag() {
        let role: RoleOption =
            serde_json::from_value(json!({ "id": 12, "role_name": "Auditor", "needs_approval": 1 })).unwrap();
        assert_eq!(role.id, Id::from("12"));
        assert!(role.needs_approval);

        let role: RoleOption =
            serde_json::from_value(json!({ "id": "4", "role_name": "Clerk", "needs_approval": 0 })).unwrap();
        assert!(!role.needs_approval);
    }

    #[test]
    fn test_id_above_i64_range_stays_exact() {
        let supervisor: SupervisorOption =
            serde_json::from_value(json!({ "id": 18446744073709551615u64, "user_name": "root" })).unwrap();
        assert_eq!(supervisor.id, Id::from("18446744073709551615"));
    }

    #[test]
    fn test_role_missing_flag_defaults_false() {
        let role: RoleOption = serde_json::from_value(json!({ "id": 1, "role_name": "Viewer" })).unwrap();
        assert!(!role.needs_approval);
    }

    #[test]
    fn test_parent_sector_none_marker() {
        let top: SectorOption =
            serde_json::from_value(json!({ "id": 1, "sector_name": "HQ", "parent_sector": "none" })).unwrap();
        let child: SectorOption =
            serde_json::from_value(json!({ "id": 2, "sector_name": "Branch", "parent_sector": 1 })).unwrap();

        assert!(top.is_top_level());
        assert_eq!(top.depth(), 0);
        assert_eq!(child.parent_sector, ParentSector::Child(Id::from("1")));
        assert_eq!(child.depth(), 1);
    }

    #[test]
    fn test_id_serializes_as_plain_string() {
        let ids = vec![Id::from("3"), Id::from("5")];
        assert_eq!(serde_json::to_string(&ids).unwrap(), r#"["3","5"]"#);
    }
}
