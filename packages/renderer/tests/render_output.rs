use pagekit_model::{starter_template, Node, SectionVariant, TextRole, ThemeTokens, Tree};
use pagekit_renderer::{render, to_html, to_html_document, HtmlOptions, RenderMode};

#[test]
fn test_render_is_deterministic() {
    let tree = starter_template();
    let theme = ThemeTokens::default();
    let mode = RenderMode::Edit {
        selected: Some("cta-primary"),
    };

    let first = render(&tree, &theme, mode);
    let second = render(&tree, &theme, mode);
    assert_eq!(first, second);
    assert_eq!(
        to_html(&first, HtmlOptions::default()),
        to_html(&second, HtmlOptions::default())
    );
}

#[test]
fn test_published_html_has_no_editor_affordances() {
    let doc = render(&starter_template(), &ThemeTokens::default(), RenderMode::Preview);
    let html = to_html_document(&doc, "Launch", HtmlOptions::default());

    assert!(html.contains("Welcome to Your Landing Page"));
    assert!(html.contains("<section"));
    assert!(!html.contains("data-node-id"));
    assert!(!html.contains("ring-2"));
    assert!(!html.contains("hover:outline"));
}

#[test]
fn test_edit_html_marks_selection_targets() {
    let mode = RenderMode::Edit {
        selected: Some("hero-1"),
    };
    let doc = render(&starter_template(), &ThemeTokens::default(), mode);
    let html = to_html(&doc, HtmlOptions::default());

    for id in ["hero-1", "hero-title", "hero-description", "hero-actions", "cta-primary", "cta-secondary"] {
        assert!(html.contains(&format!("data-node-id=\"{}\"", id)), "missing {}", id);
    }
    assert_eq!(html.matches("ring-2").count(), 1);
}

#[test]
fn test_click_resolves_innermost_node() {
    let mode = RenderMode::Edit { selected: None };
    let doc = render(&starter_template(), &ThemeTokens::default(), mode);

    // page > section > stack > button
    let mut clicked = None;
    assert!(doc.dispatch_primary(&[0, 0, 2, 1, 0], &mut |id| clicked = Some(id.to_string())));
    assert_eq!(clicked.as_deref(), Some("cta-secondary"));

    // page itself is not a selection target
    let mut fired = false;
    assert!(!doc.dispatch_primary(&[0], &mut |_| fired = true));
    assert!(!fired);
}

#[test]
fn test_custom_theme_flows_into_output() {
    let mut theme = ThemeTokens::default();
    theme.colors.foreground = "#111111".to_string();
    theme.typography.font_family = "Georgia, serif".to_string();

    let tree = Tree::new(Node::page(
        "page",
        "custom",
        vec![Node::section(
            "s",
            SectionVariant::TestimonialsSingle,
            vec![Node::text("quote", TextRole::P, "Great product")],
        )],
    ))
    .unwrap();

    let html = to_html(&render(&tree, &theme, RenderMode::Preview), HtmlOptions::default());
    assert!(html.contains("font-family: Georgia, serif"));
    assert!(html.contains("color: #111111"));
    assert!(html.contains("max-width: 48rem"));
}
