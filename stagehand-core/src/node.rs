//! Node types stored in the document arena

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::path::NodePath;
use crate::transform::Transform;

/// Stable identifier for a node: its index in the document arena
pub type NodeId = usize;

/// Kind of node, fixed at creation time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// Carries a spatial transform (an Xform in the host document)
    Group,
    /// Pure organizational grouping, no transform
    Scope,
}

impl NodeKind {
    pub fn is_group(self) -> bool {
        matches!(self, NodeKind::Group)
    }

    pub fn is_scope(self) -> bool {
        matches!(self, NodeKind::Scope)
    }

    /// Host type name for this kind
    pub fn type_name(self) -> &'static str {
        match self {
            NodeKind::Group => "Xform",
            NodeKind::Scope => "Scope",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Authored visibility opinion. An unauthored node inherits from its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visibility {
    /// Explicitly visible: takes the parent's effective visibility
    Inherited,
    /// Explicitly hidden, hides the whole subtree
    Invisible,
}

/// Lazily-loadable pointer from a node to an external asset document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalReference {
    /// Filesystem path or remote URI
    pub asset_path: String,
    /// Node path inside the referenced document; `None` means its default node
    pub target_subpath: Option<String>,
    /// Whether the referenced content is currently materialized
    pub loaded: bool,
}

impl ExternalReference {
    pub fn new(asset_path: impl Into<String>, target_subpath: Option<String>) -> Self {
        Self {
            asset_path: asset_path.into(),
            target_subpath: target_subpath.filter(|s| !s.is_empty()),
            loaded: false,
        }
    }
}

/// A named node in the document hierarchy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    pub path: NodePath,
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub visibility: Option<Visibility>,
    pub references: Vec<ExternalReference>,
    /// Present for group nodes only
    pub transform: Option<Transform>,
}

impl Node {
    pub(crate) fn new(id: NodeId, path: NodePath, kind: NodeKind, parent: Option<NodeId>) -> Self {
        Self {
            id,
            name: path.name().unwrap_or_default().to_string(),
            path,
            kind,
            parent,
            children: Vec::new(),
            visibility: None,
            references: Vec::new(),
            transform: kind.is_group().then(Transform::new),
        }
    }

    /// Explicitly hidden on this node (ancestors not considered)
    pub fn is_hidden(&self) -> bool {
        self.visibility == Some(Visibility::Invisible)
    }

    /// All references on this node are materialized
    pub fn references_loaded(&self) -> bool {
        self.references.iter().all(|r| r.loaded)
    }
}
