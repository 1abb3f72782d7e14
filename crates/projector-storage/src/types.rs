//! Core types for the resource store abstraction layer.

use std::fmt;

use projector_core::{ObjectMeta, ObjectRef, project, render};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::StorageError;

/// Identifies a kind of object held by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceKind {
    /// API group, empty for the core group.
    pub group: &'static str,
    pub version: &'static str,
    pub kind: &'static str,
    /// Lowercase plural used in API paths.
    pub plural: &'static str,
}

impl ResourceKind {
    /// The managed project records watched by the operator.
    pub const MANAGED_PROJECT: ResourceKind = ResourceKind {
        group: project::API_GROUP,
        version: "v1alpha1",
        kind: project::KIND,
        plural: project::PLURAL,
    };

    /// The AppProject documents derived from managed projects.
    pub const APP_PROJECT: ResourceKind = ResourceKind {
        group: "argoproj.io",
        version: "v1alpha1",
        kind: render::APP_PROJECT_KIND,
        plural: "appprojects",
    };

    /// Returns the `apiVersion` string, `group/version` or bare `version`.
    #[must_use]
    pub fn api_version(&self) -> String {
        if self.group.is_empty() {
            self.version.to_string()
        } else {
            format!("{}/{}", self.group, self.version)
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind)
    }
}

/// An object as persisted by a store backend.
///
/// `meta` is decoded from `value["metadata"]` and always agrees with it.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredObject {
    pub kind: ResourceKind,
    pub meta: ObjectMeta,
    /// The full object content as JSON.
    pub value: Value,
}

impl StoredObject {
    /// Wraps a JSON object returned by a backend.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidObject` if the metadata cannot be decoded.
    pub fn from_value(kind: ResourceKind, value: Value) -> Result<Self, StorageError> {
        let meta = match value.get("metadata") {
            Some(metadata) => serde_json::from_value(metadata.clone())?,
            None => return Err(StorageError::invalid_object("object has no metadata")),
        };
        Ok(Self { kind, meta, value })
    }

    /// Decodes the stored JSON into a typed object.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidObject` if the JSON does not match `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, StorageError> {
        Ok(serde_json::from_value(self.value.clone())?)
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        self.value
    }

    #[must_use]
    pub fn resource_version(&self) -> Option<&str> {
        self.meta.resource_version.as_deref()
    }

    #[must_use]
    pub fn uid(&self) -> Option<&str> {
        self.meta.uid.as_deref()
    }

    #[must_use]
    pub fn object_ref(&self) -> ObjectRef {
        self.meta.object_ref()
    }
}

/// Reads `metadata.namespace` and `metadata.name` from a JSON object.
///
/// # Errors
///
/// Returns `StorageError::InvalidObject` if the name is missing or empty.
pub fn object_ref_of(value: &Value) -> Result<ObjectRef, StorageError> {
    let metadata = value
        .get("metadata")
        .ok_or_else(|| StorageError::invalid_object("object has no metadata"))?;
    let name = metadata
        .get("name")
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| StorageError::invalid_object("metadata.name is required"))?;
    let namespace = metadata
        .get("namespace")
        .and_then(Value::as_str)
        .unwrap_or_default();
    Ok(ObjectRef::new(namespace, name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use projector_core::ManagedProject;
    use serde_json::json;

    #[test]
    fn test_api_version() {
        assert_eq!(
            ResourceKind::MANAGED_PROJECT.api_version(),
            "argocd.platform.io/v1alpha1"
        );
        assert_eq!(
            ResourceKind::APP_PROJECT.api_version(),
            "argoproj.io/v1alpha1"
        );
        let core = ResourceKind {
            group: "",
            version: "v1",
            kind: "ConfigMap",
            plural: "configmaps",
        };
        assert_eq!(core.api_version(), "v1");
        assert_eq!(core.to_string(), "ConfigMap");
    }

    #[test]
    fn test_stored_object_from_value() {
        let stored = StoredObject::from_value(
            ResourceKind::MANAGED_PROJECT,
            json!({
                "metadata": {"name": "team-a", "namespace": "argocd", "uid": "u-1", "resourceVersion": "4"},
                "spec": {"projectName": "team-a"}
            }),
        )
        .unwrap();

        assert_eq!(stored.resource_version(), Some("4"));
        assert_eq!(stored.uid(), Some("u-1"));
        assert_eq!(stored.object_ref(), ObjectRef::new("argocd", "team-a"));

        let project: ManagedProject = stored.decode().unwrap();
        assert_eq!(project.spec.project_name, "team-a");
    }

    #[test]
    fn test_stored_object_requires_metadata() {
        let err = StoredObject::from_value(ResourceKind::APP_PROJECT, json!({"spec": {}}))
            .unwrap_err();
        assert!(matches!(err, StorageError::InvalidObject { .. }));
    }

    #[test]
    fn test_object_ref_of() {
        let value = json!({"metadata": {"name": "team-a", "namespace": "ns1"}});
        assert_eq!(
            object_ref_of(&value).unwrap(),
            ObjectRef::new("ns1", "team-a")
        );
        assert!(object_ref_of(&json!({"metadata": {"name": ""}})).is_err());
        assert!(object_ref_of(&json!({})).is_err());
    }
}
