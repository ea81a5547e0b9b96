//! Attaching external asset references to hierarchy nodes

use log::{debug, info};
use stagehand_core::{Document, ExternalReference, LoadPolicy, NodeId, NodePath};

use super::assets::AssetLocator;
use super::hierarchy::{ensure_path, parse_target};
use crate::error::{Result, StageError};

/// A reference that was attached successfully
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachedReference {
    pub node: NodeId,
    pub target_path: NodePath,
    pub reference: ExternalReference,
    /// Nodes created to reach the target
    pub nodes_created: usize,
}

pub type AttachResult = Result<AttachedReference>;

/// Wrap a failure raised by the document while attaching, keeping its text.
///
/// The in-memory arena cannot fail once the target has parsed and the asset
/// exists, so this only surfaces if a document invariant is broken (e.g. a
/// hand-edited snapshot).
fn attach_error(asset_path: &str, target: &NodePath, source: StageError) -> StageError {
    StageError::AttachError {
        asset_path: asset_path.to_string(),
        target: target.to_string(),
        message: source.to_string(),
    }
}

/// Attach `asset_path` to the node at `target_path`, creating the node if
/// needed, and switch the document to load every reference.
///
/// A missing asset fails with [`StageError::NotFound`] before anything is
/// touched. Once mutation has started nothing is rolled back: a failure
/// after node creation leaves the nodes in place.
pub fn attach(
    document: &mut Document,
    locator: &AssetLocator,
    target_path: &str,
    asset_path: &str,
    target_subpath: &str,
) -> AttachResult {
    let target = parse_target(target_path)?;

    if !locator.exists(asset_path) {
        return Err(StageError::NotFound(asset_path.to_string()));
    }

    let wrap = |e: StageError| attach_error(asset_path, &target, e);

    let before = document.len();
    let node = ensure_path(document, &target).map_err(wrap)?;
    let nodes_created = document.len() - before;

    let reference = ExternalReference::new(asset_path, Some(target_subpath.to_string()));
    document
        .attach_reference(node, reference.clone())
        .map_err(|e| wrap(e.into()))?;
    document.set_load_policy(LoadPolicy::LoadAll);
    debug!("Load policy set to {:?}", LoadPolicy::LoadAll);

    info!("Attached {} to {}", asset_path, target);

    Ok(AttachedReference {
        node,
        target_path: target,
        reference: ExternalReference {
            loaded: true,
            ..reference
        },
        nodes_created,
    })
}
