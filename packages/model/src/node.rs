//! # Component Nodes
//!
//! One closed sum type with a case per component kind. Each case carries
//! only the attributes valid for that kind, so leaves cannot hold
//! children and containers always do.
//!
//! The JSON shape matches the persisted documents:
//!
//! ```json
//! { "type": "Text", "id": "hero-title", "role": "h1", "content": "Hi" }
//! ```

use crate::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Declares a fieldless enum whose variants serialize to fixed wire names.
macro_rules! wire_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = ModelError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == value)
                    .ok_or_else(|| ModelError::UnknownValue {
                        kind: stringify!($name),
                        value: value.to_string(),
                    })
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

wire_enum!(
    /// Discriminant of a [`Node`].
    Kind {
        Page => "Page",
        Section => "Section",
        Stack => "Stack",
        Text => "Text",
        Button => "Button",
        Image => "Image",
        Unknown => "Unknown",
    }
);

wire_enum!(
    /// Layout family of a section. Each maps to exactly one layout rule.
    SectionVariant {
        HeroCentered => "hero_centered",
        HeroSplit => "hero_split",
        HeroWithBadges => "hero_with_badges",
        FeaturesGrid => "features_grid",
        FeaturesList => "features_list",
        Pricing2Tier => "pricing_2_tier",
        Pricing3Tier => "pricing_3_tier",
        FaqAccordion => "faq_accordion",
        FaqList => "faq_list",
        TestimonialsCards => "testimonials_cards",
        TestimonialsSingle => "testimonials_single",
        CtaCentered => "cta_centered",
        CtaSplit => "cta_split",
    }
);

wire_enum!(
    TextRole {
        H1 => "h1",
        H2 => "h2",
        H3 => "h3",
        H4 => "h4",
        H5 => "h5",
        H6 => "h6",
        P => "p",
        Span => "span",
    }
);

wire_enum!(
    ButtonVariant {
        Primary => "primary",
        Secondary => "secondary",
        Outline => "outline",
        Ghost => "ghost",
    }
);

wire_enum!(
    Direction {
        Horizontal => "horizontal",
        Vertical => "vertical",
    }
);

wire_enum!(
    Align {
        Start => "start",
        Center => "center",
        End => "end",
        Stretch => "stretch",
    }
);

wire_enum!(
    Justify {
        Start => "start",
        Center => "center",
        End => "end",
        Between => "between",
        Around => "around",
    }
);

impl Default for Align {
    fn default() -> Self {
        Align::Start
    }
}

impl Default for Justify {
    fn default() -> Self {
        Justify::Start
    }
}

/// Default stack gap in pixels.
pub const DEFAULT_GAP: u32 = 16;

fn default_gap() -> u32 {
    DEFAULT_GAP
}

fn default_theme_name() -> String {
    "default".to_string()
}

/// Section padding box in pixels. Missing sides take the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Padding {
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

impl Default for Padding {
    fn default() -> Self {
        Self {
            top: 64,
            bottom: 64,
            left: 0,
            right: 0,
        }
    }
}

impl Kind {
    /// Whether nodes of this kind hold an ordered child list.
    pub fn is_container(self) -> bool {
        matches!(self, Kind::Page | Kind::Section | Kind::Stack)
    }

    /// Parent/child legality table.
    pub fn can_contain(self, child: Kind) -> bool {
        match self {
            Kind::Page => child == Kind::Section,
            Kind::Section => matches!(child, Kind::Stack | Kind::Text | Kind::Button | Kind::Image),
            Kind::Stack => matches!(child, Kind::Text | Kind::Button | Kind::Image),
            Kind::Text | Kind::Button | Kind::Image | Kind::Unknown => false,
        }
    }
}

/// Free-function form of [`Kind::is_container`], used by structural operations.
pub fn is_container(kind: Kind) -> bool {
    kind.is_container()
}

/// A component tree node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Node {
    Page {
        #[serde(default)]
        id: String,
        #[serde(default = "default_theme_name")]
        theme: String,
        #[serde(default)]
        children: Vec<Arc<Node>>,
    },

    Section {
        #[serde(default)]
        id: String,
        variant: SectionVariant,
        #[serde(default)]
        padding: Padding,
        #[serde(rename = "className", default, skip_serializing_if = "Option::is_none")]
        class_name: Option<String>,
        #[serde(default)]
        children: Vec<Arc<Node>>,
    },

    Stack {
        #[serde(default)]
        id: String,
        direction: Direction,
        #[serde(default = "default_gap")]
        gap: u32,
        #[serde(default)]
        align: Align,
        #[serde(default)]
        justify: Justify,
        #[serde(rename = "className", default, skip_serializing_if = "Option::is_none")]
        class_name: Option<String>,
        #[serde(default)]
        children: Vec<Arc<Node>>,
    },

    Text {
        #[serde(default)]
        id: String,
        role: TextRole,
        #[serde(default)]
        content: String,
        #[serde(rename = "className", default, skip_serializing_if = "Option::is_none")]
        class_name: Option<String>,
    },

    Button {
        #[serde(default)]
        id: String,
        variant: ButtonVariant,
        #[serde(default)]
        label: String,
        #[serde(default)]
        href: String,
        #[serde(rename = "className", default, skip_serializing_if = "Option::is_none")]
        class_name: Option<String>,
    },

    Image {
        #[serde(default)]
        id: String,
        #[serde(default)]
        src: String,
        #[serde(default)]
        alt: String,
        #[serde(rename = "className", default, skip_serializing_if = "Option::is_none")]
        class_name: Option<String>,
    },

    /// Any `type` this version does not recognise. Rendered as nothing.
    #[serde(other)]
    Unknown,
}

impl Node {
    pub fn page(id: impl Into<String>, theme: impl Into<String>, sections: Vec<Node>) -> Self {
        Node::Page {
            id: id.into(),
            theme: theme.into(),
            children: sections.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn section(id: impl Into<String>, variant: SectionVariant, children: Vec<Node>) -> Self {
        Node::Section {
            id: id.into(),
            variant,
            padding: Padding::default(),
            class_name: None,
            children: children.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn stack(id: impl Into<String>, direction: Direction, children: Vec<Node>) -> Self {
        Node::Stack {
            id: id.into(),
            direction,
            gap: DEFAULT_GAP,
            align: Align::default(),
            justify: Justify::default(),
            class_name: None,
            children: children.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn text(id: impl Into<String>, role: TextRole, content: impl Into<String>) -> Self {
        Node::Text {
            id: id.into(),
            role,
            content: content.into(),
            class_name: None,
        }
    }

    pub fn button(
        id: impl Into<String>,
        variant: ButtonVariant,
        label: impl Into<String>,
        href: impl Into<String>,
    ) -> Self {
        Node::Button {
            id: id.into(),
            variant,
            label: label.into(),
            href: href.into(),
            class_name: None,
        }
    }

    pub fn image(id: impl Into<String>, src: impl Into<String>, alt: impl Into<String>) -> Self {
        Node::Image {
            id: id.into(),
            src: src.into(),
            alt: alt.into(),
            class_name: None,
        }
    }

    pub fn kind(&self) -> Kind {
        match self {
            Node::Page { .. } => Kind::Page,
            Node::Section { .. } => Kind::Section,
            Node::Stack { .. } => Kind::Stack,
            Node::Text { .. } => Kind::Text,
            Node::Button { .. } => Kind::Button,
            Node::Image { .. } => Kind::Image,
            Node::Unknown => Kind::Unknown,
        }
    }

    /// Node id. Unknown nodes have none and report the empty string.
    pub fn id(&self) -> &str {
        match self {
            Node::Page { id, .. }
            | Node::Section { id, .. }
            | Node::Stack { id, .. }
            | Node::Text { id, .. }
            | Node::Button { id, .. }
            | Node::Image { id, .. } => id,
            Node::Unknown => "",
        }
    }

    pub fn set_id(&mut self, new_id: impl Into<String>) {
        match self {
            Node::Page { id, .. }
            | Node::Section { id, .. }
            | Node::Stack { id, .. }
            | Node::Text { id, .. }
            | Node::Button { id, .. }
            | Node::Image { id, .. } => *id = new_id.into(),
            Node::Unknown => {}
        }
    }

    /// Matches by id. Unknown nodes and empty ids never match.
    pub fn has_id(&self, target: &str) -> bool {
        !target.is_empty() && self.id() == target
    }

    pub fn class_name(&self) -> Option<&str> {
        match self {
            Node::Section { class_name, .. }
            | Node::Stack { class_name, .. }
            | Node::Text { class_name, .. }
            | Node::Button { class_name, .. }
            | Node::Image { class_name, .. } => class_name.as_deref(),
            Node::Page { .. } | Node::Unknown => None,
        }
    }

    pub fn children(&self) -> Option<&[Arc<Node>]> {
        match self {
            Node::Page { children, .. }
            | Node::Section { children, .. }
            | Node::Stack { children, .. } => Some(children),
            _ => None,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<Arc<Node>>> {
        match self {
            Node::Page { children, .. }
            | Node::Section { children, .. }
            | Node::Stack { children, .. } => Some(children),
            _ => None,
        }
    }

    /// Copy of this node with its child list replaced. Leaves are returned unchanged.
    pub fn with_children(&self, new_children: Vec<Arc<Node>>) -> Node {
        let mut node = self.clone();
        if let Some(children) = node.children_mut() {
            *children = new_children;
        }
        node
    }

    /// Pre-order visit of this node and all descendants.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Node)) {
        visit(self);
        if let Some(children) = self.children() {
            for child in children {
                child.walk(visit);
            }
        }
    }
}
