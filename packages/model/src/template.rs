//! Starter tree seeded into every new project.

use crate::node::{Align, ButtonVariant, Direction, Justify, Node, SectionVariant, TextRole};
use crate::tree::Tree;
use std::sync::Arc;

/// Id of the root Page in trees created from the starter template.
pub const PAGE_ID: &str = "page";

pub fn starter_template() -> Tree {
    let actions = Node::Stack {
        id: "hero-actions".to_string(),
        direction: Direction::Horizontal,
        gap: 16,
        align: Align::Center,
        justify: Justify::Center,
        class_name: None,
        children: vec![
            Arc::new(Node::button("cta-primary", ButtonVariant::Primary, "Get Started", "#")),
            Arc::new(Node::button("cta-secondary", ButtonVariant::Secondary, "Learn More", "#")),
        ],
    };

    let hero = Node::section(
        "hero-1",
        SectionVariant::HeroCentered,
        vec![
            Node::text("hero-title", TextRole::H1, "Welcome to Your Landing Page"),
            Node::text(
                "hero-description",
                TextRole::P,
                "Generate sections, edit visually, publish instantly.",
            ),
            actions,
        ],
    );

    Tree::from_page(Node::page(PAGE_ID, "default", vec![hero]))
}
