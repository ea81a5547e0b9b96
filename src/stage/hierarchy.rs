//! Idempotent creation of hierarchy nodes

use log::debug;
use stagehand_core::{Document, NodeId, NodeKind, NodePath};

use super::paths::{bucket_path, resolve_path};
use crate::constants::{layout, turntable};
use crate::error::{Result, StageError};

/// Node kind for a path segment: `World` and anything containing `_Xform`
/// are groups, everything else is a scope.
pub fn classify_segment(name: &str) -> NodeKind {
    if name == layout::WORLD || name.contains(layout::GROUP_MARKER) {
        NodeKind::Group
    } else {
        NodeKind::Scope
    }
}

/// Parse a caller-supplied node path. The root itself is not a valid target.
pub fn parse_target(path: &str) -> Result<NodePath> {
    let parsed = NodePath::parse(path).map_err(|e| StageError::InvalidArgument(e.to_string()))?;
    if parsed.is_root() {
        return Err(StageError::InvalidArgument(
            "the document root is not a valid target".to_string(),
        ));
    }
    Ok(parsed)
}

/// Ensure every node along `path` exists and return the leaf.
///
/// Missing segments are created with [`classify_segment`]; existing nodes are
/// reused untouched.
pub fn ensure_path(document: &mut Document, path: &NodePath) -> Result<NodeId> {
    let before = document.len();
    let mut leaf = None;

    for prefix in path.prefixes() {
        let kind = classify_segment(prefix.name().unwrap_or_default());
        leaf = Some(document.get_or_create_node(&prefix, kind)?);
    }

    let created = document.len() - before;
    if created > 0 {
        debug!("Created {} node(s) for {}", created, path);
    }

    leaf.ok_or_else(|| StageError::InvalidArgument("empty path".to_string()))
}

/// Ensure `/World` exists as the default node with `/World/Setup` below it
pub fn ensure_bootstrap(document: &mut Document) -> Result<NodeId> {
    let world = ensure_world(document)?;
    let setup = NodePath::from_segments([layout::WORLD, layout::SETUP])?;
    ensure_path(document, &setup)?;
    Ok(world)
}

fn ensure_world(document: &mut Document) -> Result<NodeId> {
    let world = ensure_path(document, &NodePath::from_segments([layout::WORLD])?)?;
    if document.default_node() != Some(world) {
        document.set_default_node(world)?;
    }
    Ok(world)
}

/// Ensure the canonical hierarchy for a model/SKU/release and return the
/// leaf scope. `World` becomes the default node and the model bucket gets
/// its turntable animation.
pub fn ensure_hierarchy(
    document: &mut Document,
    model: &str,
    sku: &str,
    release: &str,
) -> Result<NodeId> {
    let canonical = resolve_path(model, sku, release)?;
    let path = parse_target(canonical.as_str())?;

    let leaf = ensure_path(document, &path)?;
    ensure_world(document)?;

    let bucket = parse_target(&bucket_path())?;
    if let Some(bucket_id) = document.node_at_path(&bucket) {
        author_turntable(document, bucket_id);
    }

    Ok(leaf)
}

/// Key a full Y rotation over the turntable frames. Existing keys on the same
/// frames are replaced.
pub fn author_turntable(document: &mut Document, id: NodeId) -> bool {
    let Some(transform) = document.transform_mut(id) else {
        return false;
    };

    for frame in turntable::FIRST_FRAME..=turntable::LAST_FRAME {
        transform.set_rotate_y(frame, turntable::STEP_DEGREES * frame as f32);
    }
    true
}
