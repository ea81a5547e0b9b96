//! Stagehand Core - an in-memory scene document
//!
//! This library provides the arena-backed document that stagehand's
//! hierarchy, reference and visibility operations run against.

pub mod document;
pub mod error;
pub mod node;
pub mod path;
pub mod transform;

pub use document::{Document, DocumentData, LoadPolicy, Traverse};
pub use error::{CoreError, Result};
pub use node::{ExternalReference, Node, NodeId, NodeKind, Visibility};
pub use path::NodePath;
pub use transform::{TimeSample, Transform};

#[cfg(test)]
mod tests {
    use super::*;

    fn path(s: &str) -> NodePath {
        NodePath::parse(s).unwrap()
    }

    fn sample_document() -> Document {
        let mut doc = Document::new();
        for (p, kind) in [
            ("/World", NodeKind::Group),
            ("/World/Models", NodeKind::Scope),
            ("/World/Models/A", NodeKind::Scope),
            ("/World/Models/A/Looks", NodeKind::Scope),
            ("/World/Models/B", NodeKind::Scope),
            ("/World/Setup", NodeKind::Scope),
        ] {
            doc.get_or_create_node(&path(p), kind).unwrap();
        }
        doc
    }

    #[test]
    fn test_basic_document_operations() {
        let mut doc = Document::new();

        let world = doc.get_or_create_node(&path("/World"), NodeKind::Group).unwrap();
        assert_eq!(world, 0);
        assert_eq!(doc.roots(), &[world]);
        assert!(doc.node(world).unwrap().transform.is_some());

        let models = doc.get_or_create_node(&path("/World/Models"), NodeKind::Scope).unwrap();
        assert_eq!(doc.parent(models), Some(world));
        assert_eq!(doc.children(world), &[models]);
        assert!(doc.node(models).unwrap().transform.is_none());

        // Existing nodes keep their kind
        let again = doc.get_or_create_node(&path("/World/Models"), NodeKind::Group).unwrap();
        assert_eq!(again, models);
        assert_eq!(doc.node(models).unwrap().kind, NodeKind::Scope);
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.count_kind(NodeKind::Group), 1);
        assert_eq!(doc.count_kind(NodeKind::Scope), 1);
    }

    #[test]
    fn test_missing_parent_and_root() {
        let mut doc = Document::new();
        let err = doc
            .get_or_create_node(&path("/World/Models"), NodeKind::Scope)
            .unwrap_err();
        assert_eq!(err, CoreError::MissingParent("/World/Models".to_string()));
        assert!(doc.get_or_create_node(&NodePath::root(), NodeKind::Scope).is_err());
        assert!(doc.is_empty());
    }

    #[test]
    fn test_traversal_is_preorder() {
        let doc = sample_document();
        let names: Vec<&str> = doc
            .traverse()
            .map(|id| doc.node(id).unwrap().name.as_str())
            .collect();
        assert_eq!(names, vec!["World", "Models", "A", "Looks", "B", "Setup"]);

        let models = doc.node_at_path(&path("/World/Models")).unwrap();
        let below: Vec<&str> = doc
            .descendants(models)
            .map(|id| doc.node(id).unwrap().name.as_str())
            .collect();
        assert_eq!(below, vec!["A", "Looks", "B"]);
    }

    #[test]
    fn test_ancestry() {
        let doc = sample_document();
        let world = doc.node_at_path(&path("/World")).unwrap();
        let models = doc.node_at_path(&path("/World/Models")).unwrap();
        let looks = doc.node_at_path(&path("/World/Models/A/Looks")).unwrap();
        let setup = doc.node_at_path(&path("/World/Setup")).unwrap();

        assert_eq!(doc.ancestors(looks).len(), 3);
        assert_eq!(doc.ancestors(looks).last(), Some(&world));
        assert!(doc.is_descendant_of(looks, models));
        assert!(!doc.is_descendant_of(setup, models));
        assert!(!doc.is_descendant_of(models, models));
    }

    #[test]
    fn test_find_by_name_uses_traversal_order() {
        let mut doc = sample_document();
        doc.get_or_create_node(&path("/World/Setup/Dup"), NodeKind::Scope).unwrap();
        // Created later, but traversed before /World/Setup/Dup
        doc.get_or_create_node(&path("/World/Models/Dup"), NodeKind::Group).unwrap();

        let first = doc.find_by_name("Dup").unwrap();
        assert_eq!(doc.node(first).unwrap().path.to_string(), "/World/Models/Dup");

        let scope = doc.find_by_name_and_kind("Dup", NodeKind::Scope).unwrap();
        assert_eq!(doc.node(scope).unwrap().path.to_string(), "/World/Setup/Dup");
        assert_eq!(doc.find_by_name("Missing"), None);
    }

    #[test]
    fn test_visibility_composes_down_the_chain() {
        let mut doc = sample_document();
        let models = doc.node_at_path(&path("/World/Models")).unwrap();
        let looks = doc.node_at_path(&path("/World/Models/A/Looks")).unwrap();

        assert!(doc.is_effectively_visible(looks));
        doc.set_visible(models, false).unwrap();
        doc.set_visible(looks, true).unwrap();
        assert!(!doc.is_effectively_visible(looks));

        doc.clear_visibility(models).unwrap();
        assert!(doc.is_effectively_visible(looks));
        assert!(doc.set_visible(99, true).is_err());
    }

    #[test]
    fn test_load_policy_materializes_references() {
        let mut doc = sample_document();
        let a = doc.node_at_path(&path("/World/Models/A")).unwrap();
        let looks = doc.node_at_path(&path("/World/Models/A/Looks")).unwrap();

        doc.attach_reference(a, ExternalReference::new("a.usd", None)).unwrap();
        assert!(!doc.is_loaded(looks));

        doc.set_load_policy(LoadPolicy::LoadAll);
        assert!(doc.is_loaded(looks));

        doc.attach_reference(a, ExternalReference::new("b.usd", Some(String::new()))).unwrap();
        let refs = &doc.node(a).unwrap().references;
        assert_eq!(refs.len(), 2);
        assert!(refs[1].loaded);
        assert_eq!(refs[1].target_subpath, None);
    }

    #[test]
    fn test_snapshot_rebuilds_indexes() {
        let mut doc = sample_document();
        let world = doc.node_at_path(&path("/World")).unwrap();
        doc.set_default_node(world).unwrap();

        let json = serde_json::to_string(&doc).unwrap();
        let restored: Document = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.id(), doc.id());
        assert_eq!(restored.len(), doc.len());
        assert_eq!(restored.default_node(), Some(world));
        assert_eq!(restored.find_by_name("Looks"), doc.find_by_name("Looks"));
        assert_eq!(
            restored.traverse().collect::<Vec<_>>(),
            doc.traverse().collect::<Vec<_>>()
        );
    }

    fn one_node_snapshot(node: serde_json::Value) -> serde_json::Value {
        serde_json::json!({
            "id": "67e55044-10b1-426f-9247-bb680e5fe0c8",
            "nodes": [node],
            "default_node": null,
            "load_policy": "LoadNone"
        })
    }

    fn world_node() -> serde_json::Value {
        serde_json::json!({
            "id": 0,
            "name": "World",
            "path": "/World",
            "kind": "Group",
            "parent": null,
            "children": [],
            "visibility": null,
            "references": [],
            "transform": null
        })
    }

    #[test]
    fn test_snapshot_ignores_stored_children() {
        let mut node = world_node();
        node["children"] = serde_json::json!([0]);

        let doc: Document = serde_json::from_value(one_node_snapshot(node)).unwrap();

        assert_eq!(doc.traverse().take(10).count(), 1);
        assert!(doc.children(0).is_empty());
    }

    #[test]
    fn test_snapshot_children_follow_parent_links() {
        let doc = sample_document();
        let mut data = DocumentData::from(doc.clone());
        for node in &mut data.nodes {
            node.children.reverse();
        }
        data.nodes[0].children.push(0);

        let restored = Document::try_from(data).unwrap();
        assert_eq!(
            restored.traverse().collect::<Vec<_>>(),
            doc.traverse().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_snapshot_rejects_mismatched_links() {
        let mut node = world_node();
        node["name"] = serde_json::json!("Other");
        assert!(serde_json::from_value::<Document>(one_node_snapshot(node)).is_err());

        let doc = sample_document();
        let models = doc.node_at_path(&path("/World/Models")).unwrap();
        let setup = doc.node_at_path(&path("/World/Setup")).unwrap();

        let mut data = DocumentData::from(doc.clone());
        data.nodes[setup].parent = Some(models);
        assert!(matches!(
            Document::try_from(data),
            Err(CoreError::Inconsistent(_))
        ));

        let mut data = DocumentData::from(doc.clone());
        data.nodes[setup].parent = None;
        assert!(matches!(
            Document::try_from(data),
            Err(CoreError::Inconsistent(_))
        ));

        let mut data = DocumentData::from(doc);
        data.nodes[setup].path = path("/Setup");
        data.nodes[setup].parent = None;
        assert!(Document::try_from(data).is_ok());
    }
}
