//! # Tree Mutations
//!
//! Pure operations on a [`Tree`]: each takes a tree and returns a new one,
//! never touching the input. Only the nodes on the root-to-target path are
//! rebuilt; every other subtree is shared with the input through its `Arc`.
//!
//! ## Semantics
//!
//! ### Lookup
//! - Depth-first pre-order over the Page's children (the Page itself is
//!   not a lookup target)
//! - First match wins if ids are ever duplicated
//!
//! ### Update
//! - Shallow merge of a [`NodePatch`] into the first match
//! - Patch keys that do not apply to the matched kind are ignored
//!
//! ### Insert
//! - Appends to the end of the parent's child list
//! - Parent may be the Page (by its id) or any descendant container
//! - Non-container parent or illegal child kind is a no-op
//!
//! ### Delete
//! - Removes every node with the id, with its whole subtree
//!
//! ### Reorder
//! - Moves a Section within the Page's child list
//! - Either index out of range is a no-op
//!
//! Bad input never fails: a missing id or an impossible edit returns the
//! input tree unchanged.

use pagekit_model::{
    Align, ButtonVariant, Direction, Justify, Node, Padding, SectionVariant, TextRole, Tree,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// A tree operation as data, so edits can cross the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Mutation {
    Update { node_id: String, patch: NodePatch },
    Insert { parent_id: String, node: Node },
    Delete { node_id: String },
    Reorder { from_index: usize, to_index: usize },
}

impl Mutation {
    pub fn apply(&self, tree: &Tree) -> Tree {
        match self {
            Mutation::Update { node_id, patch } => update(tree, node_id, patch),
            Mutation::Insert { parent_id, node } => insert(tree, parent_id, node.clone()),
            Mutation::Delete { node_id } => delete(tree, node_id),
            Mutation::Reorder {
                from_index,
                to_index,
            } => reorder(tree, *from_index, *to_index),
        }
    }
}

/// Attribute changes for one node. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NodePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<TextRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// Section layout or button style, read according to the matched kind.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    /// An empty string removes the class name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding: Option<Padding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gap: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align: Option<Align>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub justify: Option<Justify>,
}

impl NodePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }

    pub fn with_variant(mut self, variant: impl Into<String>) -> Self {
        self.variant = Some(variant.into());
        self
    }

    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn with_gap(mut self, gap: u32) -> Self {
        self.gap = Some(gap);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Copy of `node` with the applicable keys of this patch merged in.
    pub fn apply_to(&self, node: &Node) -> Node {
        let mut node = node.clone();

        match &mut node {
            Node::Section {
                variant,
                padding,
                class_name,
                ..
            } => {
                set_parsed::<SectionVariant>(variant, self.variant.as_deref());
                set(padding, self.padding);
                self.merge_class_name(class_name);
            }
            Node::Stack {
                direction,
                gap,
                align,
                justify,
                class_name,
                ..
            } => {
                set(direction, self.direction);
                set(gap, self.gap);
                set(align, self.align);
                set(justify, self.justify);
                self.merge_class_name(class_name);
            }
            Node::Text {
                role,
                content,
                class_name,
                ..
            } => {
                set(role, self.role);
                set(content, self.content.clone());
                self.merge_class_name(class_name);
            }
            Node::Button {
                variant,
                label,
                href,
                class_name,
                ..
            } => {
                set_parsed::<ButtonVariant>(variant, self.variant.as_deref());
                set(label, self.label.clone());
                set(href, self.href.clone());
                self.merge_class_name(class_name);
            }
            Node::Image {
                src,
                alt,
                class_name,
                ..
            } => {
                set(src, self.src.clone());
                set(alt, self.alt.clone());
                self.merge_class_name(class_name);
            }
            Node::Page { .. } | Node::Unknown => {}
        }

        node
    }

    fn merge_class_name(&self, class_name: &mut Option<String>) {
        match self.class_name.as_deref() {
            Some("") => *class_name = None,
            Some(value) => *class_name = Some(value.to_string()),
            None => {}
        }
    }
}

fn set<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

fn set_parsed<T: std::str::FromStr>(slot: &mut T, value: Option<&str>) {
    if let Some(raw) = value {
        match raw.parse() {
            Ok(parsed) => *slot = parsed,
            Err(_) => debug!(value = raw, "ignoring unrecognised variant in patch"),
        }
    }
}

/// First node with `id`, in pre-order below the Page.
pub fn find<'a>(tree: &'a Tree, id: &str) -> Option<&'a Arc<Node>> {
    find_in(tree.sections(), id)
}

fn find_in<'a>(children: &'a [Arc<Node>], id: &str) -> Option<&'a Arc<Node>> {
    for child in children {
        if child.has_id(id) {
            return Some(child);
        }
        if let Some(found) = child.children().and_then(|nested| find_in(nested, id)) {
            return Some(found);
        }
    }
    None
}

pub fn update(tree: &Tree, id: &str, patch: &NodePatch) -> Tree {
    match replace_first(tree.sections(), id, &mut |node: &Node| Some(patch.apply_to(node))) {
        Edit::Done(sections) => tree.with_sections(sections),
        Edit::Missing | Edit::Rejected => {
            debug!(id, "update target not found");
            tree.clone()
        }
    }
}

pub fn insert(tree: &Tree, parent_id: &str, node: Node) -> Tree {
    let node = Arc::new(node);

    if tree.root().has_id(parent_id) {
        return match append_child(tree.root(), &node) {
            Some(page) => tree.with_sections(page.children().map(<[_]>::to_vec).unwrap_or_default()),
            None => tree.clone(),
        };
    }

    match replace_first(tree.sections(), parent_id, &mut |parent: &Node| append_child(parent, &node)) {
        Edit::Done(sections) => tree.with_sections(sections),
        Edit::Missing => {
            debug!(parent_id, "insert parent not found");
            tree.clone()
        }
        Edit::Rejected => tree.clone(),
    }
}

fn append_child(parent: &Node, child: &Arc<Node>) -> Option<Node> {
    if !parent.kind().can_contain(child.kind()) {
        debug!(
            parent = %parent.kind(),
            child = %child.kind(),
            "insert rejected: parent cannot hold this kind"
        );
        return None;
    }

    let mut children = parent.children()?.to_vec();
    children.push(Arc::clone(child));
    Some(parent.with_children(children))
}

pub fn delete(tree: &Tree, id: &str) -> Tree {
    if id.is_empty() {
        return tree.clone();
    }

    match remove_all(tree.sections(), id) {
        Some(sections) => tree.with_sections(sections),
        None => {
            debug!(id, "delete target not found");
            tree.clone()
        }
    }
}

/// Children with every `id` match removed, or `None` when nothing matched.
fn remove_all(children: &[Arc<Node>], id: &str) -> Option<Vec<Arc<Node>>> {
    let mut changed = false;
    let mut kept = Vec::with_capacity(children.len());

    for child in children {
        if child.has_id(id) {
            changed = true;
            continue;
        }

        match child.children().and_then(|nested| remove_all(nested, id)) {
            Some(nested) => {
                changed = true;
                kept.push(Arc::new(child.with_children(nested)));
            }
            None => kept.push(Arc::clone(child)),
        }
    }

    changed.then_some(kept)
}

pub fn reorder(tree: &Tree, from_index: usize, to_index: usize) -> Tree {
    let sections = tree.sections();

    if from_index >= sections.len() || to_index >= sections.len() {
        debug!(from_index, to_index, len = sections.len(), "reorder index out of range");
        return tree.clone();
    }
    if from_index == to_index {
        return tree.clone();
    }

    let mut sections = sections.to_vec();
    let moved = sections.remove(from_index);
    sections.insert(to_index, moved);
    tree.with_sections(sections)
}

enum Edit {
    Missing,
    /// Target found but the edit does not apply.
    Rejected,
    Done(Vec<Arc<Node>>),
}

/// Rebuilds the path to the first node with `id`, replacing it with the
/// result of `edit`.
fn replace_first(
    children: &[Arc<Node>],
    id: &str,
    edit: &mut dyn FnMut(&Node) -> Option<Node>,
) -> Edit {
    for (index, child) in children.iter().enumerate() {
        let replacement = if child.has_id(id) {
            match edit(child) {
                Some(node) => node,
                None => return Edit::Rejected,
            }
        } else {
            let Some(nested) = child.children() else {
                continue;
            };
            match replace_first(nested, id, edit) {
                Edit::Missing => continue,
                Edit::Rejected => return Edit::Rejected,
                Edit::Done(nested) => child.with_children(nested),
            }
        };

        let mut rebuilt = children.to_vec();
        rebuilt[index] = Arc::new(replacement);
        return Edit::Done(rebuilt);
    }

    Edit::Missing
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagekit_model::starter_template;

    #[test]
    fn test_find_starter_nodes() {
        let tree = starter_template();

        assert_eq!(find(&tree, "cta-secondary").unwrap().kind().as_str(), "Button");
        assert!(find(&tree, "missing").is_none());
        assert!(find(&tree, "").is_none());
        // The Page is not a lookup target.
        assert!(find(&tree, "page").is_none());
    }

    #[test]
    fn test_update_content_only() {
        let tree = starter_template();
        let updated = update(&tree, "hero-title", &NodePatch::new().with_content("Hi"));

        match find(&updated, "hero-title").unwrap().as_ref() {
            Node::Text { content, role, .. } => {
                assert_eq!(content, "Hi");
                assert_eq!(*role, TextRole::H1);
            }
            other => panic!("expected text, got {:?}", other),
        }
        // input untouched
        assert!(matches!(
            find(&tree, "hero-title").unwrap().as_ref(),
            Node::Text { content, .. } if content == "Welcome to Your Landing Page"
        ));
    }

    #[test]
    fn test_update_shares_untouched_subtrees() {
        let tree = starter_template();
        let updated = update(&tree, "hero-title", &NodePatch::new().with_content("Hi"));

        let before = find(&tree, "hero-actions").unwrap();
        let after = find(&updated, "hero-actions").unwrap();
        assert!(Arc::ptr_eq(before, after));
    }

    #[test]
    fn test_update_ignores_inapplicable_keys() {
        let tree = starter_template();
        let patch = NodePatch::new().with_label("Nope").with_gap(99);
        let updated = update(&tree, "hero-title", &patch);

        assert_eq!(find(&updated, "hero-title"), find(&tree, "hero-title"));
    }

    #[test]
    fn test_update_parses_variant_per_kind() {
        let tree = starter_template();

        let updated = update(&tree, "cta-primary", &NodePatch::new().with_variant("ghost"));
        assert!(matches!(
            find(&updated, "cta-primary").unwrap().as_ref(),
            Node::Button { variant: ButtonVariant::Ghost, .. }
        ));

        let updated = update(&tree, "hero-1", &NodePatch::new().with_variant("cta_split"));
        assert!(matches!(
            find(&updated, "hero-1").unwrap().as_ref(),
            Node::Section { variant: SectionVariant::CtaSplit, .. }
        ));

        // a button style on a section is not a layout
        let updated = update(&tree, "hero-1", &NodePatch::new().with_variant("ghost"));
        assert_eq!(updated, tree);
    }

    #[test]
    fn test_empty_class_name_clears() {
        let tree = starter_template();
        let styled = update(&tree, "hero-title", &NodePatch::new().with_class_name("lead"));
        assert_eq!(find(&styled, "hero-title").unwrap().class_name(), Some("lead"));

        let cleared = update(&styled, "hero-title", &NodePatch::new().with_class_name(""));
        assert_eq!(find(&cleared, "hero-title").unwrap().class_name(), None);
    }

    #[test]
    fn test_insert_into_page_and_stack() {
        let tree = starter_template();

        let tree = insert(&tree, "page", Node::section("s2", SectionVariant::FaqList, vec![]));
        assert_eq!(tree.sections().len(), 2);
        assert_eq!(tree.sections()[1].id(), "s2");

        let tree = insert(&tree, "hero-actions", Node::button("b3", ButtonVariant::Outline, "Docs", "/docs"));
        let actions = find(&tree, "hero-actions").unwrap();
        assert_eq!(actions.children().unwrap().last().unwrap().id(), "b3");
    }

    #[test]
    fn test_insert_into_leaf_is_noop() {
        let tree = starter_template();
        let result = insert(&tree, "hero-title", Node::text("x", TextRole::P, "x"));
        assert_eq!(result, tree);
    }

    #[test]
    fn test_insert_illegal_kind_is_noop() {
        let tree = starter_template();

        // Sections only live under the Page.
        let nested = insert(&tree, "hero-1", Node::section("s2", SectionVariant::FaqList, vec![]));
        assert_eq!(nested, tree);

        // The Page only holds Sections.
        let stray = insert(&tree, "page", Node::text("x", TextRole::P, "x"));
        assert_eq!(stray, tree);
    }

    #[test]
    fn test_delete_removes_subtree() {
        let tree = starter_template();
        let result = delete(&tree, "hero-actions");

        assert!(find(&result, "hero-actions").is_none());
        assert!(find(&result, "cta-primary").is_none());
        assert_eq!(result.sections()[0].children().unwrap().len(), 2);
    }

    #[test]
    fn test_delete_root_id_is_noop() {
        let tree = starter_template();
        assert_eq!(delete(&tree, "page"), tree);
        assert_eq!(delete(&tree, ""), tree);
    }

    #[test]
    fn test_reorder_moves_section() {
        let tree = insert(
            &starter_template(),
            "page",
            Node::section("s2", SectionVariant::FaqList, vec![]),
        );
        let tree = insert(&tree, "page", Node::section("s3", SectionVariant::CtaCentered, vec![]));

        let moved = reorder(&tree, 0, 2);
        let ids: Vec<&str> = moved.sections().iter().map(|s| s.id()).collect();
        assert_eq!(ids, vec!["s2", "s3", "hero-1"]);
    }

    #[test]
    fn test_reorder_out_of_range_is_noop() {
        let tree = starter_template();
        assert_eq!(reorder(&tree, 0, 1), tree);
        assert_eq!(reorder(&tree, 5, 0), tree);
        assert_eq!(reorder(&tree, 0, 0), tree);
    }

    #[test]
    fn test_mutation_wire_format() {
        let json = r#"{"type":"update","nodeId":"hero-title","patch":{"content":"Hi"}}"#;
        let mutation: Mutation = serde_json::from_str(json).unwrap();
        assert_eq!(
            mutation,
            Mutation::Update {
                node_id: "hero-title".to_string(),
                patch: NodePatch::new().with_content("Hi"),
            }
        );

        let json = r#"{"type":"reorder","fromIndex":1,"toIndex":0}"#;
        let mutation: Mutation = serde_json::from_str(json).unwrap();
        assert_eq!(mutation, Mutation::Reorder { from_index: 1, to_index: 0 });

        let json = r#"{"type":"insert","parentId":"hero-actions","node":{"type":"Image","id":"i","src":"/a.png","alt":"A"}}"#;
        let mutation: Mutation = serde_json::from_str(json).unwrap();
        let tree = mutation.apply(&starter_template());
        assert!(find(&tree, "i").is_some());
    }
}
