//! Rendering of managed projects into Argo CD `AppProject` documents.
//!
//! The document is assembled as typed structs and only turned into a JSON
//! value (or YAML text) at the store or export boundary. Rendering is pure:
//! the same spec and template always produce byte-identical output.

use crate::error::{CoreError, Result};
use crate::meta::{ObjectMeta, OwnerReference};
use crate::name::validate_project_name;
use crate::project::{ManagedProject, ManagedProjectSpec};
use crate::template::{GroupKind, OrphanedResources, PROJECT_PLACEHOLDER, Template};
use serde::{Deserialize, Serialize};

pub const APP_PROJECT_API_VERSION: &str = "argoproj.io/v1alpha1";
pub const APP_PROJECT_KIND: &str = "AppProject";

pub const MANAGED_BY_LABEL: &str = "managed-by";
pub const MANAGED_BY_VALUE: &str = "argocd-project-operator";
pub const TEMPLATE_LABEL: &str = "argocd.platform.io/template";

/// The derived access-project document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppProject {
    pub api_version: String,
    pub kind: String,
    pub metadata: ObjectMeta,
    pub spec: AppProjectSpec,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppProjectSpec {
    pub source_repos: Vec<String>,
    pub destinations: Vec<AppProjectDestination>,
    pub cluster_resource_whitelist: Vec<GroupKind>,
    pub namespace_resource_whitelist: Vec<GroupKind>,
    pub source_namespaces: Vec<String>,
    pub roles: Vec<ProjectRole>,
    pub orphaned_resources: OrphanedResources,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppProjectDestination {
    pub server: String,
    pub namespace: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// A template role with its policies bound to one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRole {
    pub name: String,
    pub description: String,
    pub policies: Vec<String>,
}

impl AppProject {
    pub fn set_owner_reference(&mut self, owner: OwnerReference) {
        self.metadata.set_controller_reference(owner);
    }

    /// Carries the store's version token so the next write is a checked update.
    pub fn set_resource_version(&mut self, resource_version: Option<String>) {
        self.metadata.resource_version = resource_version;
    }

    pub fn to_value(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

/// Replaces every literal project placeholder in `policy` with `project_name`.
pub fn bind_policy(policy: &str, project_name: &str) -> String {
    policy.replace(PROJECT_PLACEHOLDER, project_name)
}

/// Combines a managed project spec with a template into an [`AppProject`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectRenderer;

impl ProjectRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Renders the document for a managed record, placed in the record's namespace.
    pub fn render_project(&self, project: &ManagedProject, template: &Template) -> Result<AppProject> {
        self.render(&project.metadata.namespace, &project.spec, template)
    }

    pub fn render(
        &self,
        namespace: &str,
        spec: &ManagedProjectSpec,
        template: &Template,
    ) -> Result<AppProject> {
        validate_spec(spec)?;

        let destinations = spec
            .destinations
            .iter()
            .map(|d| AppProjectDestination {
                server: d.server.clone(),
                namespace: d.namespace.clone(),
                name: (!d.name.is_empty()).then(|| d.name.clone()),
            })
            .collect();

        let roles = template
            .roles
            .iter()
            .map(|role| ProjectRole {
                name: role.name.clone(),
                description: role.description.clone(),
                policies: role
                    .policies
                    .iter()
                    .map(|p| bind_policy(p, &spec.project_name))
                    .collect(),
            })
            .collect();

        let metadata = ObjectMeta::new(namespace, spec.project_name.clone())
            .with_label(MANAGED_BY_LABEL, MANAGED_BY_VALUE)
            .with_label(TEMPLATE_LABEL, template.name.as_str());

        Ok(AppProject {
            api_version: APP_PROJECT_API_VERSION.to_string(),
            kind: APP_PROJECT_KIND.to_string(),
            metadata,
            spec: AppProjectSpec {
                source_repos: spec.repositories.clone(),
                destinations,
                cluster_resource_whitelist: template.cluster_resource_whitelist.clone(),
                namespace_resource_whitelist: template.namespace_resource_whitelist.clone(),
                source_namespaces: template.source_namespaces.clone(),
                roles,
                orphaned_resources: template.orphaned_resources,
                description: (!spec.description.is_empty()).then(|| spec.description.clone()),
            },
        })
    }
}

fn validate_spec(spec: &ManagedProjectSpec) -> Result<()> {
    validate_project_name(&spec.project_name)?;

    if spec.repositories.is_empty() {
        return Err(CoreError::invalid_spec("repositories must not be empty"));
    }
    if let Some(idx) = spec.repositories.iter().position(|r| r.trim().is_empty()) {
        return Err(CoreError::invalid_spec(format!(
            "repositories[{idx}] must not be blank"
        )));
    }
    if spec.destinations.is_empty() {
        return Err(CoreError::invalid_spec("destinations must not be empty"));
    }
    for (idx, dest) in spec.destinations.iter().enumerate() {
        if dest.server.is_empty() {
            return Err(CoreError::invalid_spec(format!(
                "destinations[{idx}].server is required"
            )));
        }
        if dest.namespace.is_empty() {
            return Err(CoreError::invalid_spec(format!(
                "destinations[{idx}].namespace is required"
            )));
        }
    }
    Ok(())
}
