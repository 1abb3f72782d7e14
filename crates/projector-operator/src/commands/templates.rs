use std::fmt::Write as _;

use projector_core::{TemplateCatalog, TemplateName};

pub fn templates() {
    print!("{}", describe(&TemplateCatalog::builtin()));
}

/// One block per template: name, resource counts and roles.
pub fn describe(catalog: &TemplateCatalog) -> String {
    let mut out = String::new();
    for template in catalog.iter() {
        let default = if template.name == TemplateName::default() {
            " (default)"
        } else {
            ""
        };
        let _ = writeln!(out, "{}{default}", template.name);
        let _ = writeln!(
            out,
            "  cluster resources:   {}",
            template.cluster_resource_whitelist.len()
        );
        let _ = writeln!(
            out,
            "  namespace resources: {}",
            template.namespace_resource_whitelist.len()
        );
        let _ = writeln!(out, "  warn on orphans:     {}", template.orphaned_resources.warn);
        for role in &template.roles {
            let _ = writeln!(out, "  role {}: {}", role.name, role.description);
        }
    }
    out
}
