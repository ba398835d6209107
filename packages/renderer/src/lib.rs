//! # Pagekit Renderer
//!
//! Turns a component tree and theme into a virtual DOM, and a virtual DOM
//! into HTML. The editor canvas and the published page share this code;
//! only the [`RenderMode`] differs.

pub mod html;
pub mod render;
pub mod styles;
pub mod vdom;

pub use html::{escape_html, to_html, to_html_document, HtmlOptions};
pub use render::{frame, is_navigable, is_renderable_src, render, RenderMode, Viewport};
pub use styles::{section_layout, text_style, LayoutDirective, LayoutRule, TextStyle};
pub use vdom::{VNode, VirtualDocument};
