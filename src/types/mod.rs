//! Shared types used throughout the library.

mod direction;
mod transform;

pub use direction::{Axis, Direction};
pub use transform::{BlockTransform, ElementRotation};

/// Namespace assumed for resource locations without a `namespace:` prefix.
pub const DEFAULT_NAMESPACE: &str = "minecraft";

/// Name of the placeholder texture substituted for anything unresolvable.
pub const MISSING_TEXTURE: &str = "missingno";

/// Split a resource location into namespace and path.
/// "minecraft:block/stone" -> ("minecraft", "block/stone")
/// "block/stone" -> ("minecraft", "block/stone")
pub fn split_location(resource_location: &str) -> (&str, &str) {
    if let Some((namespace, path)) = resource_location.split_once(':') {
        (namespace, path)
    } else {
        (DEFAULT_NAMESPACE, resource_location)
    }
}

/// Normalize a resource location to its `namespace:path` form.
pub fn normalize_location(resource_location: &str) -> String {
    if resource_location.contains(':') {
        resource_location.to_string()
    } else {
        format!("{}:{}", DEFAULT_NAMESPACE, resource_location)
    }
}
