//! # Tree Renderer
//!
//! Maps a component tree and theme to a [`VirtualDocument`]. Dispatch is an
//! exhaustive match on the node kind; unrecognised nodes and children of
//! an illegal kind render as nothing instead of failing the page.

use crate::styles::{self, LayoutRule};
use crate::vdom::{VNode, VirtualDocument};
use pagekit_model::{ButtonVariant, Kind, Node, ThemeTokens, Tree};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Interaction mode of a render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode<'a> {
    /// Published view. No selection targets, no highlighting.
    Preview,
    /// Editor canvas. Every node with an id is a selection target and
    /// `selected` is highlighted.
    Edit { selected: Option<&'a str> },
}

impl RenderMode<'_> {
    fn is_edit(&self) -> bool {
        matches!(self, RenderMode::Edit { .. })
    }

    fn is_selected(&self, id: &str) -> bool {
        match self {
            RenderMode::Edit { selected: Some(sel) } => !id.is_empty() && *sel == id,
            _ => false,
        }
    }
}

/// Editor preview width.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Viewport {
    #[default]
    Desktop,
    Mobile,
}

impl Viewport {
    pub const MOBILE_WIDTH: &'static str = "375px";

    pub fn as_str(self) -> &'static str {
        match self {
            Viewport::Desktop => "desktop",
            Viewport::Mobile => "mobile",
        }
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

struct RenderContext<'a> {
    theme: &'a ThemeTokens,
    mode: RenderMode<'a>,
}

/// Render a tree. Deterministic: equal inputs give equal documents.
pub fn render(tree: &Tree, theme: &ThemeTokens, mode: RenderMode<'_>) -> VirtualDocument {
    let ctx = RenderContext { theme, mode };
    let mut doc = VirtualDocument::new();
    doc.add_node(render_page(tree, &ctx));
    doc
}

/// Wraps a rendered document in the editor's preview frame.
pub fn frame(doc: VirtualDocument, viewport: Viewport) -> VirtualDocument {
    let frame = VNode::element("div")
        .with_class("bg-white shadow-lg rounded-lg overflow-hidden transition-all")
        .with_attr("data-viewport", viewport.as_str());

    let frame = match viewport {
        Viewport::Mobile => frame
            .with_class("w-[375px]")
            .with_style("width", Viewport::MOBILE_WIDTH),
        Viewport::Desktop => frame
            .with_class("w-full max-w-7xl")
            .with_style("width", "100%")
            .with_style("max-width", "80rem"),
    };

    let mut framed = VirtualDocument::new();
    framed.add_node(frame.with_children(doc.nodes));
    framed
}

fn render_page(tree: &Tree, ctx: &RenderContext) -> VNode {
    let colors = &ctx.theme.colors;
    let page = VNode::element("div")
        .with_class("min-h-screen")
        .with_style("background-color", colors.background.as_str())
        .with_style("color", colors.foreground.as_str())
        .with_style("font-family", ctx.theme.typography.font_family.as_str());

    page.with_children(render_children(Kind::Page, tree.sections(), ctx))
}

fn render_children(parent: Kind, children: &[std::sync::Arc<Node>], ctx: &RenderContext) -> Vec<VNode> {
    children
        .iter()
        .filter(|child| {
            let legal = parent.can_contain(child.kind());
            if !legal {
                tracing::debug!(parent = %parent, child = %child.kind(), id = child.id(), "skipping node");
            }
            legal
        })
        .filter_map(|child| render_node(child, ctx))
        .collect()
}

fn render_node(node: &Node, ctx: &RenderContext) -> Option<VNode> {
    let rendered = match node {
        Node::Section {
            id,
            variant,
            padding,
            class_name,
            children,
        } => {
            let layout = styles::section_layout(*variant);
            let mut section = VNode::element("section")
                .with_class(layout.classes)
                .with_class(class_name.as_deref().unwrap_or_default())
                .with_style("padding-top", format!("{}px", padding.top))
                .with_style("padding-bottom", format!("{}px", padding.bottom))
                .with_style("padding-left", format!("{}px", padding.left))
                .with_style("padding-right", format!("{}px", padding.right))
                .with_attr("data-variant", variant.as_str());

            for (key, value) in layout.css() {
                section = section.with_style(key, value);
            }

            let body = render_children(Kind::Section, children, ctx);
            let section = match layout.rule {
                LayoutRule::Accordion => section.with_children(body.into_iter().map(accordion_entry).collect()),
                _ => section.with_children(body),
            };
            decorate(section, id, ctx, styles::SECTION_HOVER_CLASSES)
        }

        Node::Stack {
            id,
            direction,
            gap,
            align,
            justify,
            class_name,
            children,
        } => {
            let stack = VNode::element("div")
                .with_class("flex")
                .with_class(styles::direction_class(*direction))
                .with_class(styles::align_class(*align))
                .with_class(styles::justify_class(*justify))
                .with_class(class_name.as_deref().unwrap_or_default())
                .with_style("display", "flex")
                .with_style("flex-direction", styles::direction_css(*direction))
                .with_style("align-items", styles::align_css(*align))
                .with_style("justify-content", styles::justify_css(*justify))
                .with_style("gap", format!("{}px", gap))
                .with_children(render_children(Kind::Stack, children, ctx));
            decorate(stack, id, ctx, styles::NODE_HOVER_CLASSES)
        }

        Node::Text {
            id,
            role,
            content,
            class_name,
        } => {
            let style = styles::text_style(*role);
            let text = VNode::element(style.tag)
                .with_class(style.classes)
                .with_class(class_name.as_deref().unwrap_or_default())
                .with_style("color", ctx.theme.colors.foreground.as_str())
                .with_style("font-size", ctx.theme.typography.font_size.get(style.size))
                .with_style("font-weight", style.weight.to_string())
                .with_child(VNode::text(content.as_str()));
            decorate(text, id, ctx, styles::NODE_HOVER_CLASSES)
        }

        Node::Button {
            id,
            variant,
            label,
            href,
            class_name,
        } => {
            let button = VNode::element("button")
                .with_attr("type", "button")
                .with_class(styles::BUTTON_BASE_CLASSES)
                .with_class(styles::button_classes(*variant))
                .with_class(class_name.as_deref().unwrap_or_default());
            let button = button_colors(button, *variant, ctx.theme)
                .with_style("border-radius", ctx.theme.border_radius.as_str())
                .with_style("padding", "12px 24px")
                .with_child(VNode::text(label.as_str()));
            let button = decorate(button, id, ctx, styles::BUTTON_HOVER_CLASSES);

            if is_navigable(href) {
                VNode::element("a")
                    .with_attr("href", href.as_str())
                    .with_class("inline-block")
                    .with_child(button)
            } else {
                button
            }
        }

        Node::Image {
            id,
            src,
            alt,
            class_name,
        } => {
            let class_name = class_name.as_deref().unwrap_or_default();
            let inner = if is_renderable_src(src) {
                VNode::element("img")
                    .with_attr("src", src.as_str())
                    .with_attr("alt", alt.as_str())
                    .with_attr("width", "800")
                    .with_attr("height", "600")
                    .with_class("rounded-lg w-full h-auto")
                    .with_class(class_name)
                    .with_style("width", "100%")
                    .with_style("height", "auto")
                    .with_style("border-radius", ctx.theme.border_radius.as_str())
            } else {
                VNode::element("div")
                    .with_class("w-full h-64 bg-muted rounded-lg flex items-center justify-center")
                    .with_class(class_name)
                    .with_style("background-color", ctx.theme.colors.muted.as_str())
                    .with_style("border-radius", ctx.theme.border_radius.as_str())
                    .with_style("height", "16rem")
                    .with_style("display", "flex")
                    .with_style("align-items", "center")
                    .with_style("justify-content", "center")
                    .with_child(
                        VNode::element("span")
                            .with_class("text-muted-foreground")
                            .with_child(VNode::text(format!("Image: {}", alt))),
                    )
            };

            let wrapper = VNode::element("div").with_class("relative").with_child(inner);
            decorate(wrapper, id, ctx, styles::NODE_HOVER_CLASSES)
        }

        Node::Page { .. } | Node::Unknown => {
            tracing::debug!(kind = %node.kind(), "node kind not renderable here");
            return None;
        }
    };

    Some(rendered)
}

/// Applies edit-mode affordances: selection target, ring and hover outline.
fn decorate(vnode: VNode, id: &str, ctx: &RenderContext, hover: &str) -> VNode {
    if !ctx.mode.is_edit() {
        return vnode;
    }

    let mut vnode = vnode.with_class(hover);
    if ctx.mode.is_selected(id) {
        vnode = vnode.with_class(styles::SELECTED_CLASSES).with_style(
            "box-shadow",
            format!("0 0 0 2px #ffffff, 0 0 0 4px {}", ctx.theme.colors.primary),
        );
    }
    if !id.is_empty() {
        vnode = vnode.with_select(id);
    }
    vnode
}

fn accordion_entry(child: VNode) -> VNode {
    VNode::element("div")
        .with_class("border-b")
        .with_style("padding-bottom", "16px")
        .with_child(child)
}

fn button_colors(button: VNode, variant: ButtonVariant, theme: &ThemeTokens) -> VNode {
    let colors = &theme.colors;
    match variant {
        ButtonVariant::Primary => button
            .with_style("background-color", colors.primary.as_str())
            .with_style("color", "#ffffff")
            .with_style("border", "none"),
        ButtonVariant::Secondary => button
            .with_style("background-color", colors.secondary.as_str())
            .with_style("color", "#ffffff")
            .with_style("border", "none"),
        ButtonVariant::Outline => button
            .with_style("background-color", colors.background.as_str())
            .with_style("color", colors.foreground.as_str())
            .with_style("border", format!("1px solid {}", colors.accent)),
        ButtonVariant::Ghost => button
            .with_style("background-color", "transparent")
            .with_style("color", colors.foreground.as_str())
            .with_style("border", "none"),
    }
}

/// A button links somewhere only for a non-empty, non-placeholder href.
pub fn is_navigable(href: &str) -> bool {
    !href.is_empty() && href != "#"
}

/// Absolute (`http...`) or root-relative (`/...`) sources render as images.
pub fn is_renderable_src(src: &str) -> bool {
    src.starts_with("http") || src.starts_with('/')
}
