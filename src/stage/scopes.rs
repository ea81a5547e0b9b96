//! Listing the model scopes a user can pick from

use stagehand_core::{Document, NodePath};

use crate::constants::{layout, scopes};
use crate::error::Result;

/// Names of the selectable scopes below `/World/Models`, in traversal order.
///
/// Material scopes (`*Looks`, `*mtl`), release scopes and anything deeper
/// than the canonical leaf are skipped, as are scopes whose content is not
/// loaded. The `Models` scope itself is not listed.
pub fn selectable_scopes(document: &Document) -> Result<Vec<String>> {
    let models = NodePath::from_segments([layout::WORLD, layout::MODELS])?;

    let names = document
        .traverse()
        .filter_map(|id| document.node(id))
        .filter(|node| node.kind.is_scope())
        .filter(|node| node.path.starts_with(&models) && node.path != models)
        .filter(|node| {
            !scopes::MATERIAL_SUFFIXES
                .iter()
                .any(|suffix| node.name.ends_with(suffix))
        })
        .filter(|node| !node.name.starts_with(layout::RELEASE_PREFIX))
        // the `/`-split path has one more component than segments (the empty root)
        .filter(|node| node.path.depth() < scopes::MAX_PATH_COMPONENTS)
        .filter(|node| document.is_loaded(node.id))
        .map(|node| node.name.clone())
        .collect();

    Ok(names)
}
