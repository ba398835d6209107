//! # Component Tree
//!
//! A [`Tree`] is a [`Node`] known to be rooted at a Page. Deserializing a
//! tree whose root is anything else fails, so holders of a `Tree` never
//! re-check the root kind.

use crate::node::{Kind, Node};
use crate::ModelError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Node", into = "Node")]
pub struct Tree {
    root: Arc<Node>,
}

impl Tree {
    pub fn new(root: Node) -> Result<Self, ModelError> {
        match root.kind() {
            Kind::Page => Ok(Self { root: Arc::new(root) }),
            other => Err(ModelError::RootNotPage(other)),
        }
    }

    /// Wraps a node the caller has built as a Page.
    pub(crate) fn from_page(root: Node) -> Self {
        debug_assert_eq!(root.kind(), Kind::Page);
        Self { root: Arc::new(root) }
    }

    pub fn root(&self) -> &Arc<Node> {
        &self.root
    }

    pub fn page_id(&self) -> &str {
        self.root.id()
    }

    pub fn theme_name(&self) -> &str {
        match self.root.as_ref() {
            Node::Page { theme, .. } => theme,
            _ => "",
        }
    }

    /// Top-level Section list, in render order.
    pub fn sections(&self) -> &[Arc<Node>] {
        self.root.children().unwrap_or(&[])
    }

    /// New tree with the same Page attributes and the given top-level children.
    pub fn with_sections(&self, sections: Vec<Arc<Node>>) -> Tree {
        Tree {
            root: Arc::new(self.root.with_children(sections)),
        }
    }

    /// Every non-empty id in the tree, root included.
    pub fn collect_ids(&self) -> HashSet<String> {
        let mut ids = HashSet::new();
        self.root.walk(&mut |node| {
            if !node.id().is_empty() {
                ids.insert(node.id().to_string());
            }
        });
        ids
    }

    /// Checks the structural invariants: non-empty unique ids and legal child kinds.
    ///
    /// Unknown nodes are tolerated; they carry no id and render as nothing.
    pub fn validate(&self) -> Result<(), ModelError> {
        let mut seen = HashSet::new();
        validate_node(&self.root, &mut seen)
    }
}

fn validate_node(node: &Node, seen: &mut HashSet<String>) -> Result<(), ModelError> {
    if node.kind() == Kind::Unknown {
        return Ok(());
    }
    if node.id().is_empty() {
        return Err(ModelError::MissingId(node.kind()));
    }
    if !seen.insert(node.id().to_string()) {
        return Err(ModelError::DuplicateId(node.id().to_string()));
    }

    if let Some(children) = node.children() {
        for child in children {
            if child.kind() != Kind::Unknown && !node.kind().can_contain(child.kind()) {
                return Err(ModelError::IllegalChild {
                    parent: node.kind(),
                    child: child.kind(),
                    child_id: child.id().to_string(),
                });
            }
            validate_node(child, seen)?;
        }
    }

    Ok(())
}

impl TryFrom<Node> for Tree {
    type Error = ModelError;

    fn try_from(node: Node) -> Result<Self, Self::Error> {
        Tree::new(node)
    }
}

impl From<Tree> for Node {
    fn from(tree: Tree) -> Self {
        Arc::try_unwrap(tree.root).unwrap_or_else(|shared| (*shared).clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{SectionVariant, TextRole};
    use crate::starter_template;

    #[test]
    fn test_rejects_non_page_root() {
        let result = Tree::new(Node::text("t", TextRole::P, "x"));
        assert_eq!(result, Err(ModelError::RootNotPage(Kind::Text)));

        let json = r#"{"type":"Section","id":"s","variant":"faq_list","children":[]}"#;
        assert!(serde_json::from_str::<Tree>(json).is_err());
    }

    #[test]
    fn test_json_roundtrip_keeps_shape() {
        let tree = starter_template();
        let value = serde_json::to_value(&tree).unwrap();

        assert_eq!(value["type"], "Page");
        assert_eq!(value["children"][0]["variant"], "hero_centered");

        let back: Tree = serde_json::from_value(value).unwrap();
        assert_eq!(back, tree);
    }

    #[test]
    fn test_validate_starter() {
        assert!(starter_template().validate().is_ok());
    }

    #[test]
    fn test_validate_duplicate_ids() {
        let tree = Tree::new(Node::page(
            "page",
            "default",
            vec![
                Node::section("dup", SectionVariant::FaqList, vec![]),
                Node::section("dup", SectionVariant::FaqList, vec![]),
            ],
        ))
        .unwrap();

        assert_eq!(tree.validate(), Err(ModelError::DuplicateId("dup".to_string())));
    }

    #[test]
    fn test_validate_illegal_child() {
        let tree = Tree::new(Node::page(
            "page",
            "default",
            vec![Node::text("stray", TextRole::P, "not a section")],
        ))
        .unwrap();

        assert!(matches!(
            tree.validate(),
            Err(ModelError::IllegalChild { parent: Kind::Page, child: Kind::Text, .. })
        ));
    }

    #[test]
    fn test_validate_missing_id() {
        let tree = Tree::new(Node::page(
            "page",
            "default",
            vec![Node::section("", SectionVariant::CtaSplit, vec![])],
        ))
        .unwrap();

        assert_eq!(tree.validate(), Err(ModelError::MissingId(Kind::Section)));
    }

    #[test]
    fn test_collect_ids() {
        let ids = starter_template().collect_ids();
        for id in ["page", "hero-1", "hero-title", "hero-description", "hero-actions", "cta-primary", "cta-secondary"] {
            assert!(ids.contains(id), "missing {}", id);
        }
        assert_eq!(ids.len(), 7);
    }
}
