//! The fixed catalog of project templates.
//!
//! The catalog is built once at process start and shared immutably, typically
//! behind an `Arc`. There is no way to add or edit templates at runtime.

use crate::error::Result;
use crate::template::{GroupKind, OrphanedResources, Role, Template, TemplateName};

/// Immutable lookup from template name to [`Template`].
#[derive(Debug, Clone)]
pub struct TemplateCatalog {
    standard: Template,
    privileged: Template,
    restricted: Template,
}

impl TemplateCatalog {
    /// Builds the catalog of shipped templates.
    pub fn builtin() -> Self {
        Self {
            standard: standard(),
            privileged: privileged(),
            restricted: restricted(),
        }
    }

    /// Resolves a template by the name given on a managed project.
    ///
    /// An empty name selects `standard`; any other name outside the catalog
    /// fails with `CoreError::TemplateNotFound`.
    pub fn resolve(&self, name: &str) -> Result<&Template> {
        let name = if name.is_empty() {
            TemplateName::default()
        } else {
            name.parse::<TemplateName>()?
        };
        Ok(self.get(name))
    }

    pub fn get(&self, name: TemplateName) -> &Template {
        match name {
            TemplateName::Standard => &self.standard,
            TemplateName::Privileged => &self.privileged,
            TemplateName::Restricted => &self.restricted,
        }
    }

    pub fn names(&self) -> Vec<TemplateName> {
        TemplateName::ALL.to_vec()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Template> {
        TemplateName::ALL.into_iter().map(|name| self.get(name))
    }
}

impl Default for TemplateCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn gk(group: &str, kind: &str) -> GroupKind {
    GroupKind::new(group, kind)
}

fn role(name: &str, description: &str, policies: &[&str]) -> Role {
    Role {
        name: name.to_string(),
        description: description.to_string(),
        policies: policies.iter().map(|p| p.to_string()).collect(),
    }
}

fn standard() -> Template {
    Template {
        name: TemplateName::Standard,
        cluster_resource_whitelist: vec![gk("*", "Namespace")],
        namespace_resource_whitelist: vec![
            gk("apps", "*"),
            gk("", "*"),
            gk("batch", "*"),
            gk("networking.k8s.io", "*"),
            gk("autoscaling", "*"),
        ],
        source_namespaces: Vec::new(),
        roles: vec![
            role(
                "read-only",
                "Read-only access to applications",
                &["p, proj:{{PROJECT}}:read-only, applications, get, {{PROJECT}}/*, allow"],
            ),
            role(
                "developer",
                "Developer access with sync capabilities",
                &[
                    "p, proj:{{PROJECT}}:developer, applications, get, {{PROJECT}}/*, allow",
                    "p, proj:{{PROJECT}}:developer, applications, sync, {{PROJECT}}/*, allow",
                ],
            ),
            role(
                "admin",
                "Full administrative access",
                &["p, proj:{{PROJECT}}:admin, applications, *, {{PROJECT}}/*, allow"],
            ),
        ],
        orphaned_resources: OrphanedResources { warn: true },
    }
}

fn privileged() -> Template {
    Template {
        name: TemplateName::Privileged,
        cluster_resource_whitelist: vec![gk("*", "*")],
        namespace_resource_whitelist: vec![gk("*", "*")],
        source_namespaces: Vec::new(),
        roles: vec![role(
            "platform-admin",
            "Platform team full access",
            &[
                "p, proj:{{PROJECT}}:platform-admin, applications, *, {{PROJECT}}/*, allow",
                "p, proj:{{PROJECT}}:platform-admin, clusters, *, *, allow",
                "p, proj:{{PROJECT}}:platform-admin, repositories, *, *, allow",
            ],
        )],
        orphaned_resources: OrphanedResources { warn: false },
    }
}

fn restricted() -> Template {
    Template {
        name: TemplateName::Restricted,
        cluster_resource_whitelist: Vec::new(),
        namespace_resource_whitelist: vec![
            gk("apps", "Deployment"),
            gk("apps", "StatefulSet"),
            gk("apps", "DaemonSet"),
            gk("", "Service"),
            gk("", "ConfigMap"),
            gk("", "Secret"),
            gk("networking.k8s.io", "Ingress"),
            gk("networking.k8s.io", "NetworkPolicy"),
        ],
        source_namespaces: Vec::new(),
        roles: vec![role(
            "read-only",
            "Read-only access only",
            &["p, proj:{{PROJECT}}:read-only, applications, get, {{PROJECT}}/*, allow"],
        )],
        orphaned_resources: OrphanedResources { warn: true },
    }
}
