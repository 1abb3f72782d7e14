use std::fs;

use anyhow::{Context, Result};
use projector_core::{ManagedProject, ProjectRenderer, TemplateCatalog};

use crate::cli::RenderArgs;

/// Namespace used when neither the flag nor the manifest names one.
const FALLBACK_NAMESPACE: &str = "default";

pub fn render(args: &RenderArgs) -> Result<()> {
    let raw = fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let output = render_manifest(&raw, args.namespace.as_deref())?;
    print!("{output}");
    Ok(())
}

/// Renders a managed project manifest to AppProject YAML.
pub fn render_manifest(raw: &str, namespace: Option<&str>) -> Result<String> {
    let project: ManagedProject =
        serde_yaml::from_str(raw).context("failed to parse managed project manifest")?;

    let namespace = namespace
        .filter(|ns| !ns.is_empty())
        .or_else(|| Some(project.metadata.namespace.as_str()).filter(|ns| !ns.is_empty()))
        .unwrap_or(FALLBACK_NAMESPACE);

    let catalog = TemplateCatalog::builtin();
    let template = catalog
        .resolve(&project.spec.template)
        .context("failed to load template")?;
    let app = ProjectRenderer::new()
        .render(namespace, &project.spec, template)
        .context("failed to render project")?;
    Ok(app.to_yaml()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"
apiVersion: argocd.platform.io/v1alpha1
kind: ManagedArgoCDProject
metadata:
  name: team-a
  namespace: argocd
spec:
  projectName: team-a
  repositories:
    - https://git/x
  destinations:
    - server: https://cluster1
      namespace: ns1
"#;

    #[test]
    fn test_render_manifest_uses_manifest_namespace() {
        let yaml = render_manifest(MANIFEST, None).unwrap();
        assert!(yaml.starts_with("apiVersion: argoproj.io/v1alpha1\nkind: AppProject\n"));
        assert!(yaml.contains("namespace: argocd"));
        assert!(yaml.contains("argocd.platform.io/template: standard"));
        assert!(yaml.contains("p, proj:team-a:read-only, applications, get, team-a/*, allow"));
    }

    #[test]
    fn test_render_manifest_namespace_override() {
        let yaml = render_manifest(MANIFEST, Some("platform")).unwrap();
        let app: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(app["metadata"]["namespace"], "platform");
    }

    #[test]
    fn test_render_manifest_unknown_template() {
        let manifest = MANIFEST.replace("  projectName: team-a", "  projectName: team-a\n  template: gold");
        let err = render_manifest(&manifest, None).unwrap_err();
        assert!(format!("{err:#}").contains("template gold not found"));
    }
}
