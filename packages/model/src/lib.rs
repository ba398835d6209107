//! # Pagekit Model
//!
//! The typed component tree that every other pagekit crate operates on,
//! plus the theme token record the renderer consumes.
//!
//! ```text
//! Page
//!  └─ Section (one of 13 layout variants)
//!      ├─ Stack (row / column)
//!      │   └─ Text | Button | Image
//!      └─ Text | Button | Image
//! ```
//!
//! Trees are immutable values. Children are held behind `Arc` so that
//! copy-on-write edits can share every subtree they do not touch.

mod error;
pub mod id_generator;
pub mod node;
pub mod template;
pub mod theme;
pub mod tree;

pub use error::ModelError;
pub use id_generator::{get_seed, IdGenerator};
pub use node::{
    is_container, Align, ButtonVariant, Direction, Justify, Kind, Node, Padding, SectionVariant,
    TextRole,
};
pub use template::{starter_template, PAGE_ID};
pub use theme::{FontStep, ThemeTokens};
pub use tree::Tree;
