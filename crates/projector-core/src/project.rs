//! The managed project record: user intent plus the status reported back on it.

use crate::error::{CoreError, Result};
use crate::meta::{ObjectMeta, ObjectRef, OwnerReference};
use crate::time::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const API_GROUP: &str = "argocd.platform.io";
pub const API_VERSION: &str = "argocd.platform.io/v1alpha1";
pub const KIND: &str = "ManagedArgoCDProject";
pub const PLURAL: &str = "managedargocdprojects";

/// Lifecycle marker held on a managed project while its AppProject may exist.
pub const FINALIZER: &str = "argocd.platform.io/finalizer";

pub const CONDITION_READY: &str = "Ready";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagedProject {
    #[serde(default = "default_api_version")]
    pub api_version: String,
    #[serde(default = "default_kind")]
    pub kind: String,
    #[serde(default)]
    pub metadata: ObjectMeta,
    pub spec: ManagedProjectSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ManagedProjectStatus>,
}

fn default_api_version() -> String {
    API_VERSION.to_string()
}

fn default_kind() -> String {
    KIND.to_string()
}

impl ManagedProject {
    pub fn new(metadata: ObjectMeta, spec: ManagedProjectSpec) -> Self {
        Self {
            api_version: default_api_version(),
            kind: default_kind(),
            metadata,
            spec,
            status: None,
        }
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn to_value(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn object_ref(&self) -> ObjectRef {
        self.metadata.object_ref()
    }

    /// Generation of the spec as tracked by the store; zero until first persisted.
    pub fn generation(&self) -> i64 {
        self.metadata.generation.unwrap_or(0)
    }

    /// Identity of the AppProject derived from this record.
    pub fn derived_ref(&self) -> ObjectRef {
        ObjectRef::new(self.metadata.namespace.clone(), self.spec.project_name.clone())
    }

    /// Controller owner reference pointing back at this record.
    pub fn controller_reference(&self) -> Result<OwnerReference> {
        let uid = self
            .metadata
            .uid
            .clone()
            .ok_or_else(|| CoreError::missing_field("metadata.uid"))?;
        Ok(OwnerReference {
            api_version: self.api_version.clone(),
            kind: self.kind.clone(),
            name: self.metadata.name.clone(),
            uid,
            controller: Some(true),
            block_owner_deletion: Some(true),
        })
    }

    pub fn status_mut(&mut self) -> &mut ManagedProjectStatus {
        self.status.get_or_insert_with(ManagedProjectStatus::default)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagedProjectSpec {
    pub project_name: String,
    #[serde(default)]
    pub repositories: Vec<String>,
    #[serde(default)]
    pub destinations: Vec<Destination>,
    /// One of `standard`, `privileged`, `restricted`; empty selects `standard`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub template: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Destination {
    pub server: String,
    pub namespace: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
}

impl Destination {
    pub fn new(server: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            namespace: namespace.into(),
            name: String::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Pending,
    Ready,
    Failed,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Pending => "Pending",
            Phase::Ready => "Ready",
            Phase::Failed => "Failed",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagedProjectStatus {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub project_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<Phase>,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub observed_generation: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_sync_time: Option<Timestamp>,
    #[serde(
        default,
        rename = "renderedYAML",
        skip_serializing_if = "String::is_empty"
    )]
    pub rendered_yaml: String,
}

fn is_zero(value: &i64) -> bool {
    *value == 0
}

impl ManagedProjectStatus {
    pub fn condition(&self, condition_type: &str) -> Option<&Condition> {
        self.conditions
            .iter()
            .find(|c| c.condition_type == condition_type)
    }

    /// Replaces the condition of the same type in place, or appends it.
    pub fn upsert_condition(&mut self, condition: Condition) {
        match self
            .conditions
            .iter_mut()
            .find(|c| c.condition_type == condition.condition_type)
        {
            Some(existing) => *existing = condition,
            None => self.conditions.push(condition),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConditionStatus {
    True,
    False,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    #[serde(rename = "type")]
    pub condition_type: String,
    pub status: ConditionStatus,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub observed_generation: i64,
    pub last_transition_time: Timestamp,
    pub reason: String,
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ready(status: ConditionStatus, message: &str) -> Condition {
        Condition {
            condition_type: CONDITION_READY.into(),
            status,
            observed_generation: 1,
            last_transition_time: "2025-01-01T00:00:00Z".parse().unwrap(),
            reason: "Ready".into(),
            message: message.into(),
        }
    }

    #[test]
    fn test_deserialize_managed_project() {
        let project = ManagedProject::from_value(json!({
            "apiVersion": "argocd.platform.io/v1alpha1",
            "kind": "ManagedArgoCDProject",
            "metadata": {"name": "team-a", "namespace": "argocd", "uid": "u-1", "generation": 3},
            "spec": {
                "projectName": "team-a",
                "repositories": ["https://git/x"],
                "destinations": [{"server": "https://cluster1", "namespace": "ns1"}]
            }
        }))
        .unwrap();

        assert_eq!(project.spec.template, "");
        assert_eq!(project.spec.destinations[0].name, "");
        assert_eq!(project.generation(), 3);
        assert!(project.status.is_none());
        assert_eq!(project.derived_ref(), ObjectRef::new("argocd", "team-a"));
    }

    #[test]
    fn test_controller_reference() {
        let mut project = ManagedProject::new(
            ObjectMeta::new("argocd", "team-a"),
            ManagedProjectSpec {
                project_name: "team-a".into(),
                repositories: vec![],
                destinations: vec![],
                template: String::new(),
                description: String::new(),
            },
        );
        assert!(project.controller_reference().is_err());

        project.metadata.uid = Some("u-1".into());
        let owner = project.controller_reference().unwrap();
        assert_eq!(owner.kind, KIND);
        assert_eq!(owner.api_version, API_VERSION);
        assert_eq!(owner.uid, "u-1");
        assert_eq!(owner.controller, Some(true));
    }

    #[test]
    fn test_upsert_condition_replaces_in_place() {
        let mut status = ManagedProjectStatus::default();
        status.upsert_condition(Condition {
            condition_type: "Synced".into(),
            ..ready(ConditionStatus::True, "other")
        });
        status.upsert_condition(ready(ConditionStatus::False, "first"));
        status.upsert_condition(ready(ConditionStatus::True, "second"));

        assert_eq!(status.conditions.len(), 2);
        assert_eq!(status.conditions[1].message, "second");
        assert_eq!(
            status.condition(CONDITION_READY).map(|c| c.status),
            Some(ConditionStatus::True)
        );
    }

    #[test]
    fn test_status_wire_names() {
        let status = ManagedProjectStatus {
            conditions: vec![ready(ConditionStatus::True, "ok")],
            project_name: "team-a".into(),
            phase: Some(Phase::Ready),
            observed_generation: 2,
            last_sync_time: None,
            rendered_yaml: "kind: AppProject\n".into(),
        };
        let value = serde_json::to_value(&status).unwrap();

        assert_eq!(value["phase"], "Ready");
        assert_eq!(value["observedGeneration"], 2);
        assert_eq!(value["renderedYAML"], "kind: AppProject\n");
        assert_eq!(value["conditions"][0]["type"], "Ready");
        assert_eq!(value["conditions"][0]["status"], "True");
        assert!(value.get("lastSyncTime").is_none());
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(Phase::Pending.to_string(), "Pending");
        assert_eq!(Phase::Ready.to_string(), "Ready");
        assert_eq!(Phase::Failed.to_string(), "Failed");
    }
}
