use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Placeholder substituted with the project name in role policies.
pub const PROJECT_PLACEHOLDER: &str = "{{PROJECT}}";

/// Names of the templates shipped in the catalog.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum TemplateName {
    #[default]
    Standard,
    Privileged,
    Restricted,
}

impl TemplateName {
    pub const ALL: [TemplateName; 3] = [
        TemplateName::Standard,
        TemplateName::Privileged,
        TemplateName::Restricted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateName::Standard => "standard",
            TemplateName::Privileged => "privileged",
            TemplateName::Restricted => "restricted",
        }
    }
}

impl fmt::Display for TemplateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemplateName {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(TemplateName::Standard),
            "privileged" => Ok(TemplateName::Privileged),
            "restricted" => Ok(TemplateName::Restricted),
            _ => Err(CoreError::template_not_found(s)),
        }
    }
}

/// An API group/kind pair in a resource allow-list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupKind {
    pub group: String,
    pub kind: String,
}

impl GroupKind {
    pub fn new(group: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            kind: kind.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub name: String,
    pub description: String,
    /// Policy statements, each containing the project placeholder.
    pub policies: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrphanedResources {
    pub warn: bool,
}

/// A fixed permission/resource template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub name: TemplateName,
    pub cluster_resource_whitelist: Vec<GroupKind>,
    pub namespace_resource_whitelist: Vec<GroupKind>,
    pub source_namespaces: Vec<String>,
    pub roles: Vec<Role>,
    pub orphaned_resources: OrphanedResources,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_name_from_str() {
        assert_eq!(
            "standard".parse::<TemplateName>().unwrap(),
            TemplateName::Standard
        );
        assert_eq!(
            "privileged".parse::<TemplateName>().unwrap(),
            TemplateName::Privileged
        );
        assert_eq!(
            "restricted".parse::<TemplateName>().unwrap(),
            TemplateName::Restricted
        );
        assert!("Standard".parse::<TemplateName>().is_err());
        assert!("".parse::<TemplateName>().is_err());
    }

    #[test]
    fn test_template_name_display_roundtrip() {
        for name in TemplateName::ALL {
            assert_eq!(name.to_string().parse::<TemplateName>().unwrap(), name);
        }
    }

    #[test]
    fn test_template_name_serde() {
        let json = serde_json::to_string(&TemplateName::Restricted).unwrap();
        assert_eq!(json, "\"restricted\"");
    }
}
