use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Virtual DOM node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum VNode {
    /// HTML element
    Element {
        tag: String,
        /// Sorted so that serialized output is stable
        attributes: BTreeMap<String, String>,
        styles: BTreeMap<String, String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        classes: Vec<String>,
        children: Vec<VNode>,
        /// Component id reported on primary interaction (edit mode only)
        #[serde(default, skip_serializing_if = "Option::is_none")]
        select: Option<String>,
    },

    /// Text node
    Text { content: String },
}

impl VNode {
    pub fn element(tag: impl Into<String>) -> Self {
        VNode::Element {
            tag: tag.into(),
            attributes: BTreeMap::new(),
            styles: BTreeMap::new(),
            classes: Vec::new(),
            children: Vec::new(),
            select: None,
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        VNode::Text {
            content: content.into(),
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let VNode::Element {
            ref mut attributes, ..
        } = self
        {
            attributes.insert(key.into(), value.into());
        }
        self
    }

    pub fn with_style(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let VNode::Element { ref mut styles, .. } = self {
            styles.insert(key.into(), value.into());
        }
        self
    }

    /// Appends whitespace-separated class names. Empty input is ignored.
    pub fn with_class(mut self, class: &str) -> Self {
        if let VNode::Element {
            ref mut classes, ..
        } = self
        {
            classes.extend(class.split_whitespace().map(str::to_string));
        }
        self
    }

    pub fn with_child(mut self, child: VNode) -> Self {
        if let VNode::Element {
            ref mut children, ..
        } = self
        {
            children.push(child);
        }
        self
    }

    pub fn with_children(mut self, new_children: Vec<VNode>) -> Self {
        if let VNode::Element {
            ref mut children, ..
        } = self
        {
            children.extend(new_children);
        }
        self
    }

    pub fn with_select(mut self, id: impl Into<String>) -> Self {
        if let VNode::Element { ref mut select, .. } = self {
            *select = Some(id.into());
        }
        self
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            VNode::Element { tag, .. } => Some(tag),
            VNode::Text { .. } => None,
        }
    }

    pub fn children(&self) -> &[VNode] {
        match self {
            VNode::Element { children, .. } => children,
            VNode::Text { .. } => &[],
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        match self {
            VNode::Element { classes, .. } => classes.iter().any(|c| c == class),
            VNode::Text { .. } => false,
        }
    }

    pub fn style(&self, key: &str) -> Option<&str> {
        match self {
            VNode::Element { styles, .. } => styles.get(key).map(String::as_str),
            VNode::Text { .. } => None,
        }
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        match self {
            VNode::Element { attributes, .. } => attributes.get(key).map(String::as_str),
            VNode::Text { .. } => None,
        }
    }

    /// Concatenated text of this node and its descendants.
    pub fn text_content(&self) -> String {
        match self {
            VNode::Text { content } => content.clone(),
            VNode::Element { children, .. } => children.iter().map(VNode::text_content).collect(),
        }
    }

    /// First element, in pre-order, that reports `id` on interaction.
    pub fn find_selectable(&self, id: &str) -> Option<&VNode> {
        if let VNode::Element { select: Some(sel), .. } = self {
            if sel == id {
                return Some(self);
            }
        }
        self.children().iter().find_map(|child| child.find_selectable(id))
    }
}

/// Virtual Document (collection of root nodes)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VirtualDocument {
    pub nodes: Vec<VNode>,
}

impl VirtualDocument {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn add_node(&mut self, node: VNode) {
        self.nodes.push(node);
    }

    /// Delivers a primary interaction (click) at `path` to the innermost
    /// selectable element along it.
    ///
    /// `path[0]` indexes the document roots and each further entry indexes
    /// the children of the previous element. Returns whether the callback
    /// fired; documents rendered in preview mode never fire.
    pub fn dispatch_primary(&self, path: &[usize], on_select: &mut dyn FnMut(&str)) -> bool {
        let Some((first, rest)) = path.split_first() else {
            return false;
        };

        let mut current = match self.nodes.get(*first) {
            Some(node) => node,
            None => return false,
        };
        let mut target = selectable_id(current);

        for index in rest {
            match current.children().get(*index) {
                Some(child) => {
                    current = child;
                    if let Some(id) = selectable_id(current) {
                        target = Some(id);
                    }
                }
                None => break,
            }
        }

        match target {
            Some(id) => {
                on_select(id);
                true
            }
            None => false,
        }
    }

    pub fn find_selectable(&self, id: &str) -> Option<&VNode> {
        self.nodes.iter().find_map(|node| node.find_selectable(id))
    }
}

fn selectable_id(node: &VNode) -> Option<&str> {
    match node {
        VNode::Element { select, .. } => select.as_deref(),
        VNode::Text { .. } => None,
    }
}
