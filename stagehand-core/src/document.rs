//! Scene document: an arena of nodes with path and name indexes

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, Result};
use crate::node::{ExternalReference, Node, NodeId, NodeKind, Visibility};
use crate::path::NodePath;
use crate::transform::Transform;

/// Global policy deciding whether external references are materialized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LoadPolicy {
    LoadAll,
    #[default]
    LoadNone,
}

/// Serialized form of a document. Indexes are rebuilt on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentData {
    pub id: Uuid,
    pub nodes: Vec<Node>,
    pub default_node: Option<NodeId>,
    pub load_policy: LoadPolicy,
}

/// Hierarchical scene document
///
/// Nodes live in an arena and reference each other by [`NodeId`]. Ids are
/// never reused; nodes are only ever added.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "DocumentData", into = "DocumentData")]
pub struct Document {
    id: Uuid,
    nodes: Vec<Node>,
    /// Top-level nodes in creation order
    roots: Vec<NodeId>,
    default_node: Option<NodeId>,
    load_policy: LoadPolicy,
    path_index: HashMap<NodePath, NodeId>,
    name_index: HashMap<String, Vec<NodeId>>,
}

impl Document {
    /// Creates a new empty document
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            nodes: Vec::new(),
            roots: Vec::new(),
            default_node: None,
            load_policy: LoadPolicy::default(),
            path_index: HashMap::new(),
            name_index: HashMap::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes.get_mut(id).ok_or(CoreError::UnknownNode(id))
    }

    /// All nodes in creation order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Top-level nodes in creation order
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn node_at_path(&self, path: &NodePath) -> Option<NodeId> {
        self.path_index.get(path).copied()
    }

    pub fn contains_path(&self, path: &NodePath) -> bool {
        self.path_index.contains_key(path)
    }

    /// Returns the node at `path`, creating it with `kind` if absent.
    ///
    /// The parent must already exist. An existing node is returned as-is;
    /// its kind is never changed.
    pub fn get_or_create_node(&mut self, path: &NodePath, kind: NodeKind) -> Result<NodeId> {
        if let Some(id) = self.node_at_path(path) {
            return Ok(id);
        }

        let parent_path = path.parent().ok_or_else(|| CoreError::InvalidPath {
            path: path.to_string(),
            reason: "the document root cannot be created",
        })?;

        let parent = if parent_path.is_root() {
            None
        } else {
            Some(
                self.node_at_path(&parent_path)
                    .ok_or_else(|| CoreError::MissingParent(path.to_string()))?,
            )
        };

        let id = self.nodes.len();
        let node = Node::new(id, path.clone(), kind, parent);

        match parent {
            Some(parent_id) => self.node_mut(parent_id)?.children.push(id),
            None => self.roots.push(id),
        }
        self.path_index.insert(path.clone(), id);
        self.name_index.entry(node.name.clone()).or_default().push(id);
        self.nodes.push(node);

        Ok(id)
    }

    /// Ids of every node with this name, in creation order
    pub fn ids_named(&self, name: &str) -> &[NodeId] {
        self.name_index.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// First node with this name in traversal order
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.first_in_traversal(self.ids_named(name).iter().copied())
    }

    /// First node of `kind` with this name in traversal order
    pub fn find_by_name_and_kind(&self, name: &str, kind: NodeKind) -> Option<NodeId> {
        self.first_in_traversal(
            self.ids_named(name)
                .iter()
                .copied()
                .filter(|&id| self.nodes[id].kind == kind),
        )
    }

    fn first_in_traversal(&self, candidates: impl Iterator<Item = NodeId>) -> Option<NodeId> {
        let candidates: Vec<NodeId> = candidates.collect();
        match candidates.len() {
            0 => None,
            1 => Some(candidates[0]),
            _ => self.traverse().find(|id| candidates.contains(id)),
        }
    }

    /// Depth-first, pre-order walk of the whole document
    pub fn traverse(&self) -> Traverse<'_> {
        Traverse {
            document: self,
            stack: self.roots.iter().rev().copied().collect(),
        }
    }

    /// Depth-first, pre-order walk of the nodes below `id` (excluding `id`)
    pub fn descendants(&self, id: NodeId) -> Traverse<'_> {
        let stack = self
            .nodes
            .get(id)
            .map(|node| node.children.iter().rev().copied().collect())
            .unwrap_or_default();
        Traverse {
            document: self,
            stack,
        }
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|node| node.parent)
    }

    /// Ancestors of `id`, nearest first
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut ancestors = Vec::new();
        let mut current = self.parent(id);
        while let Some(parent) = current {
            ancestors.push(parent);
            current = self.parent(parent);
        }
        ancestors
    }

    /// Whether `id` lies strictly below `ancestor`
    pub fn is_descendant_of(&self, id: NodeId, ancestor: NodeId) -> bool {
        let mut current = self.parent(id);
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = self.parent(parent);
        }
        false
    }

    /// Author a visibility opinion: `true` → inherited, `false` → invisible
    pub fn set_visible(&mut self, id: NodeId, visible: bool) -> Result<()> {
        self.node_mut(id)?.visibility = Some(if visible {
            Visibility::Inherited
        } else {
            Visibility::Invisible
        });
        Ok(())
    }

    /// Remove any authored visibility opinion
    pub fn clear_visibility(&mut self, id: NodeId) -> Result<()> {
        self.node_mut(id)?.visibility = None;
        Ok(())
    }

    /// Visible once the whole ancestor chain is taken into account
    pub fn is_effectively_visible(&self, id: NodeId) -> bool {
        match self.nodes.get(id) {
            Some(node) if !node.is_hidden() => self
                .ancestors(id)
                .iter()
                .all(|&ancestor| !self.nodes[ancestor].is_hidden()),
            _ => false,
        }
    }

    /// Append a reference to a node. Existing references are kept.
    pub fn attach_reference(&mut self, id: NodeId, mut reference: ExternalReference) -> Result<()> {
        reference.loaded = self.load_policy == LoadPolicy::LoadAll;
        self.node_mut(id)?.references.push(reference);
        Ok(())
    }

    pub fn load_policy(&self) -> LoadPolicy {
        self.load_policy
    }

    /// Change the load policy and (un)materialize every reference accordingly
    pub fn set_load_policy(&mut self, policy: LoadPolicy) {
        self.load_policy = policy;
        let loaded = policy == LoadPolicy::LoadAll;
        for reference in self.nodes.iter_mut().flat_map(|node| node.references.iter_mut()) {
            reference.loaded = loaded;
        }
    }

    /// A node is loaded when neither it nor any ancestor holds an unloaded reference
    pub fn is_loaded(&self, id: NodeId) -> bool {
        match self.nodes.get(id) {
            Some(node) => {
                node.references_loaded()
                    && self
                        .ancestors(id)
                        .iter()
                        .all(|&ancestor| self.nodes[ancestor].references_loaded())
            }
            None => false,
        }
    }

    pub fn default_node(&self) -> Option<NodeId> {
        self.default_node
    }

    /// Mark a node as the document's entry node
    pub fn set_default_node(&mut self, id: NodeId) -> Result<()> {
        self.node_mut(id)?;
        self.default_node = Some(id);
        Ok(())
    }

    /// Mutable transform of a group node; `None` for scopes or unknown ids
    pub fn transform_mut(&mut self, id: NodeId) -> Option<&mut Transform> {
        self.nodes.get_mut(id).and_then(|node| node.transform.as_mut())
    }

    /// Number of nodes with the given kind
    pub fn count_kind(&self, kind: NodeKind) -> usize {
        self.nodes.iter().filter(|node| node.kind == kind).count()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Pre-order iterator over node ids
pub struct Traverse<'a> {
    document: &'a Document,
    stack: Vec<NodeId>,
}

impl Iterator for Traverse<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.document.children(id).iter().rev().copied());
        Some(id)
    }
}

impl TryFrom<DocumentData> for Document {
    type Error = CoreError;

    fn try_from(data: DocumentData) -> Result<Self> {
        let mut document = Document {
            id: data.id,
            nodes: Vec::with_capacity(data.nodes.len()),
            roots: Vec::new(),
            default_node: None,
            load_policy: data.load_policy,
            path_index: HashMap::new(),
            name_index: HashMap::new(),
        };

        // Child lists are rebuilt from the parent links; stored ones are ignored.
        for (index, mut node) in data.nodes.into_iter().enumerate() {
            if node.id != index {
                return Err(CoreError::Inconsistent(format!(
                    "node '{}' stored at index {} has id {}",
                    node.path, index, node.id
                )));
            }
            if node.path.name() != Some(node.name.as_str()) {
                return Err(CoreError::Inconsistent(format!(
                    "node named '{}' has path '{}'",
                    node.name, node.path
                )));
            }

            let expected_parent = node.path.parent().filter(|p| !p.is_root());
            match (node.parent, expected_parent) {
                (Some(parent), Some(parent_path)) if parent < index => {
                    if document.nodes[parent].path != parent_path {
                        return Err(CoreError::Inconsistent(format!(
                            "node '{}' is linked to parent '{}'",
                            node.path, document.nodes[parent].path
                        )));
                    }
                    document.nodes[parent].children.push(index);
                }
                (Some(parent), Some(_)) => {
                    return Err(CoreError::Inconsistent(format!(
                        "node '{}' refers to parent {} created after it",
                        node.path, parent
                    )));
                }
                (None, None) => document.roots.push(index),
                _ => {
                    return Err(CoreError::Inconsistent(format!(
                        "parent link of node '{}' does not match its path",
                        node.path
                    )));
                }
            }

            if document.path_index.insert(node.path.clone(), index).is_some() {
                return Err(CoreError::Inconsistent(format!(
                    "duplicate path '{}'",
                    node.path
                )));
            }
            document
                .name_index
                .entry(node.name.clone())
                .or_default()
                .push(index);
            node.children.clear();
            document.nodes.push(node);
        }

        if let Some(id) = data.default_node {
            document.set_default_node(id)?;
        }

        Ok(document)
    }
}

impl From<Document> for DocumentData {
    fn from(document: Document) -> Self {
        DocumentData {
            id: document.id,
            nodes: document.nodes,
            default_node: document.default_node,
            load_policy: document.load_policy,
        }
    }
}
