use crate::Timestamp;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Object metadata shared by every record in the resource store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub namespace: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_timestamp: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deletion_timestamp: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub finalizers: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub owner_references: Vec<OwnerReference>,
}

impl ObjectMeta {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            ..Self::default()
        }
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    /// Returns true once the store has marked the object for deletion.
    pub fn is_deleting(&self) -> bool {
        self.deletion_timestamp.is_some()
    }

    pub fn has_finalizer(&self, finalizer: &str) -> bool {
        self.finalizers.iter().any(|f| f == finalizer)
    }

    /// Adds the finalizer if missing. Returns true if the metadata changed.
    pub fn add_finalizer(&mut self, finalizer: &str) -> bool {
        if self.has_finalizer(finalizer) {
            return false;
        }
        self.finalizers.push(finalizer.to_string());
        true
    }

    /// Removes every occurrence of the finalizer. Returns true if the metadata changed.
    pub fn remove_finalizer(&mut self, finalizer: &str) -> bool {
        let before = self.finalizers.len();
        self.finalizers.retain(|f| f != finalizer);
        self.finalizers.len() != before
    }

    /// Replaces any existing controller reference with `owner`.
    pub fn set_controller_reference(&mut self, owner: OwnerReference) {
        self.owner_references
            .retain(|r| !r.controller.unwrap_or(false) && r.uid != owner.uid);
        self.owner_references.push(owner);
    }

    pub fn object_ref(&self) -> ObjectRef {
        ObjectRef::new(self.namespace.clone(), self.name.clone())
    }
}

/// Back-link from a dependent object to the object that owns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerReference {
    pub api_version: String,
    pub kind: String,
    pub name: String,
    pub uid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub controller: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_owner_deletion: Option<bool>,
}

/// Namespace/name identity of an object within one kind.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectRef {
    pub namespace: String,
    pub name: String,
}

impl ObjectRef {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}/{}", self.namespace, self.name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn owner(uid: &str) -> OwnerReference {
        OwnerReference {
            api_version: "argocd.platform.io/v1alpha1".into(),
            kind: "ManagedArgoCDProject".into(),
            name: "team-a".into(),
            uid: uid.into(),
            controller: Some(true),
            block_owner_deletion: Some(true),
        }
    }

    #[test]
    fn test_finalizer_add_remove() {
        let mut meta = ObjectMeta::new("ns1", "team-a");
        assert!(!meta.has_finalizer("x/finalizer"));

        assert!(meta.add_finalizer("x/finalizer"));
        assert!(!meta.add_finalizer("x/finalizer"));
        assert_eq!(meta.finalizers, vec!["x/finalizer".to_string()]);

        assert!(meta.remove_finalizer("x/finalizer"));
        assert!(!meta.remove_finalizer("x/finalizer"));
        assert!(meta.finalizers.is_empty());
    }

    #[test]
    fn test_remove_finalizer_keeps_others() {
        let mut meta = ObjectMeta::new("ns1", "team-a");
        meta.finalizers = vec!["a".into(), "b".into()];
        meta.remove_finalizer("a");
        assert_eq!(meta.finalizers, vec!["b".to_string()]);
    }

    #[test]
    fn test_set_controller_reference_replaces_previous() {
        let mut meta = ObjectMeta::new("ns1", "team-a");
        meta.set_controller_reference(owner("uid-1"));
        meta.set_controller_reference(owner("uid-2"));
        assert_eq!(meta.owner_references.len(), 1);
        assert_eq!(meta.owner_references[0].uid, "uid-2");

        meta.set_controller_reference(owner("uid-2"));
        assert_eq!(meta.owner_references.len(), 1);
    }

    #[test]
    fn test_meta_serialization_skips_empty() {
        let meta = ObjectMeta::new("ns1", "team-a").with_label("managed-by", "me");
        let value = serde_json::to_value(&meta).unwrap();
        assert_eq!(
            value,
            json!({"name": "team-a", "namespace": "ns1", "labels": {"managed-by": "me"}})
        );
    }

    #[test]
    fn test_meta_deserialization() {
        let meta: ObjectMeta = serde_json::from_value(json!({
            "name": "team-a",
            "namespace": "ns1",
            "uid": "abc",
            "resourceVersion": "7",
            "generation": 2,
            "deletionTimestamp": "2025-01-01T00:00:00Z",
            "finalizers": ["argocd.platform.io/finalizer"]
        }))
        .unwrap();

        assert_eq!(meta.resource_version.as_deref(), Some("7"));
        assert_eq!(meta.generation, Some(2));
        assert!(meta.is_deleting());
        assert!(meta.has_finalizer("argocd.platform.io/finalizer"));
    }

    #[test]
    fn test_object_ref_display() {
        assert_eq!(ObjectRef::new("ns1", "team-a").to_string(), "ns1/team-a");
        assert_eq!(ObjectRef::new("", "team-a").to_string(), "team-a");
    }
}
