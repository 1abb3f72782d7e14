use kube::core::{ApiResource, GroupVersionKind};
use projector_storage::ResourceKind;

/// Dynamic API resource descriptor for a store kind.
pub fn api_resource(kind: &ResourceKind) -> ApiResource {
    let gvk = GroupVersionKind::gvk(kind.group, kind.version, kind.kind);
    ApiResource::from_gvk_with_plural(&gvk, kind.plural)
}
