//! Isolating one scope while keeping infrastructure scopes visible

use std::collections::HashSet;

use log::{debug, warn};
use stagehand_core::{Document, NodeId, NodeKind};

use crate::error::{Result, StageError};

/// Outcome of an isolation pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibilityReport {
    /// Names of nodes made visible, in traversal order
    pub visible: Vec<String>,
    /// Names of scopes hidden, in traversal order
    pub hidden: Vec<String>,
    /// Keep names with no matching scope
    pub missing_keep: Vec<String>,
}

impl VisibilityReport {
    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    pub fn hidden_count(&self) -> usize {
        self.hidden.len()
    }
}

/// Ids kept visible by an isolation: the target's subtree, the subtree of
/// every keep node that does not contain the target, and the ancestors of
/// all of them.
///
/// A keep node above the target only keeps itself and its ancestors; its
/// other descendants are classified like any other node.
fn reachable(document: &Document, target: NodeId, keeps: &[NodeId]) -> HashSet<NodeId> {
    let mut visible = HashSet::new();
    for &root in std::iter::once(&target).chain(keeps) {
        visible.insert(root);
        visible.extend(document.ancestors(root));
        if root == target || !document.is_descendant_of(target, root) {
            visible.extend(document.descendants(root));
        }
    }
    visible
}

/// Make the scope named `target_name` and the scopes named in `keep_names`
/// visible along with their subtrees and ancestors. Keep scopes above the
/// target do not reveal their other branches. Every other scope is
/// explicitly hidden; groups outside that set keep their current opinion.
///
/// Names resolve to the first scope with that name in traversal order.
/// Unknown keep names are reported, not fatal. An unknown target fails with
/// [`StageError::TargetNotFound`] without changing anything.
pub fn isolate<S: AsRef<str>>(
    document: &mut Document,
    target_name: &str,
    keep_names: &[S],
) -> Result<VisibilityReport> {
    let target = document
        .find_by_name_and_kind(target_name, NodeKind::Scope)
        .ok_or_else(|| StageError::TargetNotFound(target_name.to_string()))?;

    let mut report = VisibilityReport::default();
    let mut keeps = Vec::new();
    for name in keep_names {
        let name = name.as_ref();
        match document.find_by_name_and_kind(name, NodeKind::Scope) {
            Some(id) => keeps.push(id),
            None => {
                warn!("Keep scope '{}' not found, skipping", name);
                report.missing_keep.push(name.to_string());
            }
        }
    }

    let visible = reachable(document, target, &keeps);
    let order: Vec<NodeId> = document.traverse().collect();

    for id in order {
        let Some(node) = document.node(id) else {
            continue;
        };
        let name = node.name.clone();
        let is_scope = node.kind.is_scope();

        if visible.contains(&id) {
            document.set_visible(id, true)?;
            report.visible.push(name);
        } else if is_scope {
            document.set_visible(id, false)?;
            report.hidden.push(name);
        }
    }

    debug!(
        "Isolated '{}': {} visible, {} hidden",
        target_name,
        report.visible_count(),
        report.hidden_count()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::hierarchy::{ensure_path, parse_target};

    fn build(paths: &[&str]) -> Document {
        let mut doc = Document::new();
        for p in paths {
            ensure_path(&mut doc, &parse_target(p).unwrap()).unwrap();
        }
        doc
    }

    fn id(doc: &Document, path: &str) -> NodeId {
        doc.node_at_path(&parse_target(path).unwrap()).unwrap()
    }

    #[test]
    fn test_isolate_hides_siblings() {
        let mut doc = build(&[
            "/World/Models/glass_Xform/A_Xform/Release_1/A_1/Mesh",
            "/World/Models/glass_Xform/A_Xform/Release_1/A_2",
            "/World/Setup/Lights",
        ]);

        let report = isolate(&mut doc, "A_1", &["Setup"]).unwrap();

        assert!(doc.is_effectively_visible(id(&doc, "/World/Models/glass_Xform/A_Xform/Release_1/A_1/Mesh")));
        assert!(!doc.is_effectively_visible(id(&doc, "/World/Models/glass_Xform/A_Xform/Release_1/A_2")));
        assert!(doc.is_effectively_visible(id(&doc, "/World/Setup/Lights")));
        assert_eq!(report.hidden, vec!["A_2"]);
        assert!(report.missing_keep.is_empty());
    }

    #[test]
    fn test_previously_hidden_descendants_are_revealed() {
        let mut doc = build(&["/World/Models/A/Inner/Deep", "/World/Models/B"]);
        let inner = id(&doc, "/World/Models/A/Inner");
        doc.set_visible(inner, false).unwrap();
        let models = id(&doc, "/World/Models");
        doc.set_visible(models, false).unwrap();

        isolate(&mut doc, "A", &[] as &[&str]).unwrap();

        assert!(doc.is_effectively_visible(id(&doc, "/World/Models/A/Inner/Deep")));
        assert!(!doc.is_effectively_visible(id(&doc, "/World/Models/B")));
    }

    #[test]
    fn test_groups_outside_are_untouched() {
        let mut doc = build(&["/World/Models/A", "/World/Other_Xform/B"]);
        let other = id(&doc, "/World/Other_Xform");

        isolate(&mut doc, "A", &[] as &[&str]).unwrap();

        assert_eq!(doc.node(other).unwrap().visibility, None);
        assert!(doc.node(id(&doc, "/World/Other_Xform/B")).unwrap().is_hidden());
    }

    #[test]
    fn test_missing_keep_is_reported() {
        let mut doc = build(&["/World/Models/A"]);
        let report = isolate(&mut doc, "A", &["Cameras"]).unwrap();
        assert_eq!(report.missing_keep, vec!["Cameras"]);
    }

    #[test]
    fn test_unknown_target_changes_nothing() {
        let mut doc = build(&["/World/Models/A", "/World/Models/B"]);
        let before = doc.clone();

        let result = isolate(&mut doc, "DoesNotExist", &[] as &[&str]);

        assert!(matches!(result, Err(StageError::TargetNotFound(ref n)) if n == "DoesNotExist"));
        let unchanged = doc.nodes().zip(before.nodes()).all(|(a, b)| a == b);
        assert!(unchanged);
    }

    #[test]
    fn test_target_must_be_scope() {
        let mut doc = build(&["/World/Models/glass_Xform"]);
        assert!(matches!(
            isolate(&mut doc, "glass_Xform", &[] as &[&str]),
            Err(StageError::TargetNotFound(_))
        ));
    }

    #[test]
    fn test_duplicate_names_resolve_to_first_in_traversal() {
        let mut doc = build(&["/World/B/Dup", "/World/A/Dup"]);

        isolate(&mut doc, "Dup", &[] as &[&str]).unwrap();

        assert!(doc.is_effectively_visible(id(&doc, "/World/B/Dup")));
        assert!(!doc.is_effectively_visible(id(&doc, "/World/A/Dup")));
    }

    #[test]
    fn test_keep_above_target_does_not_reveal_siblings() {
        let mut doc = build(&[
            "/World/Models/glass_Xform/A_Xform/Release_1/A_1/Mesh",
            "/World/Models/glass_Xform/A_Xform/Release_1/A_2",
            "/World/Models/Other",
            "/World/Setup/Lights",
        ]);

        let report = isolate(&mut doc, "A_1", &["Models", "Setup"]).unwrap();

        let models = id(&doc, "/World/Models");
        assert!(doc.is_effectively_visible(models));
        assert!(doc.is_effectively_visible(id(&doc, "/World/Models/glass_Xform/A_Xform/Release_1/A_1/Mesh")));
        assert!(!doc.is_effectively_visible(id(&doc, "/World/Models/glass_Xform/A_Xform/Release_1/A_2")));
        assert!(!doc.is_effectively_visible(id(&doc, "/World/Models/Other")));
        assert!(doc.is_effectively_visible(id(&doc, "/World/Setup/Lights")));
        assert_eq!(report.hidden, vec!["A_2", "Other"]);
    }
}
