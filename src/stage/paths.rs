//! Canonical hierarchy paths for imported models

use std::fmt;

use crate::constants::layout;
use crate::error::{Result, StageError};

/// `/World/Models/glass_Xform/<model>_Xform/Release_<release>/<model>_<sku>`
///
/// Identifiers are passed through as-is; only emptiness is checked.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalPath {
    model: String,
    sku: String,
    release: String,
    path: String,
}

impl CanonicalPath {
    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn sku(&self) -> &str {
        &self.sku
    }

    pub fn release(&self) -> &str {
        &self.release
    }

    pub fn as_str(&self) -> &str {
        &self.path
    }

    /// Name of the leaf scope, `<model>_<sku>`
    pub fn leaf_name(&self) -> String {
        format!("{}_{}", self.model, self.sku)
    }

    /// Path of the per-model group, `/World/Models/glass_Xform/<model>_Xform`
    pub fn model_group(&self) -> String {
        format!("{}/{}{}", bucket_path(), self.model, layout::GROUP_MARKER)
    }
}

impl fmt::Display for CanonicalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

impl AsRef<str> for CanonicalPath {
    fn as_ref(&self) -> &str {
        &self.path
    }
}

/// Path of the fixed bucket group every model lives under
pub fn bucket_path() -> String {
    format!("/{}/{}/{}", layout::WORLD, layout::MODELS, layout::MODEL_BUCKET)
}

/// Derive the canonical path of a model/SKU/release triple
pub fn resolve_path(model: &str, sku: &str, release: &str) -> Result<CanonicalPath> {
    for (field, value) in [("model", model), ("sku", sku), ("release", release)] {
        if value.is_empty() {
            return Err(StageError::InvalidArgument(format!("{} must not be empty", field)));
        }
    }

    let path = format!(
        "{}/{model}{marker}/{prefix}{release}/{model}_{sku}",
        bucket_path(),
        marker = layout::GROUP_MARKER,
        prefix = layout::RELEASE_PREFIX,
    );

    Ok(CanonicalPath {
        model: model.to_string(),
        sku: sku.to_string(),
        release: release.to_string(),
        path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_path() {
        let path = resolve_path("CD40235I", "52E", "261").unwrap();
        assert_eq!(
            path.as_str(),
            "/World/Models/glass_Xform/CD40235I_Xform/Release_261/CD40235I_52E"
        );
        assert_eq!(path.leaf_name(), "CD40235I_52E");
        assert_eq!(path.model_group(), "/World/Models/glass_Xform/CD40235I_Xform");
        assert_eq!(path, resolve_path("CD40235I", "52E", "261").unwrap());
    }

    #[test]
    fn test_empty_identifiers_rejected() {
        assert!(matches!(
            resolve_path("", "52E", "261"),
            Err(StageError::InvalidArgument(_))
        ));
        assert!(resolve_path("CD40235I", "", "261").is_err());
        assert!(resolve_path("CD40235I", "52E", "").is_err());
    }

    #[test]
    fn test_identifiers_passed_through() {
        let path = resolve_path("A B", "x.y", "v2").unwrap();
        assert_eq!(
            path.to_string(),
            "/World/Models/glass_Xform/A B_Xform/Release_v2/A B_x.y"
        );
    }
}
