use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pagekit_model::{starter_template, ButtonVariant, Direction, Node, SectionVariant, TextRole, ThemeTokens, Tree};
use pagekit_renderer::{render, to_html, HtmlOptions, RenderMode};

fn large_tree() -> Tree {
    let sections = (0..50)
        .map(|i| {
            let cards = (0..6)
                .map(|j| {
                    Node::stack(
                        format!("card-{}-{}", i, j),
                        Direction::Vertical,
                        vec![
                            Node::text(format!("title-{}-{}", i, j), TextRole::H3, "Feature"),
                            Node::text(format!("body-{}-{}", i, j), TextRole::P, "Does a useful thing."),
                            Node::button(format!("cta-{}-{}", i, j), ButtonVariant::Ghost, "More", "/more"),
                        ],
                    )
                })
                .collect();
            Node::section(format!("section-{}", i), SectionVariant::FeaturesGrid, cards)
        })
        .collect();

    Tree::new(Node::page("page", "default", sections)).unwrap()
}

fn render_starter(c: &mut Criterion) {
    let tree = starter_template();
    let theme = ThemeTokens::default();

    c.bench_function("render_starter", |b| {
        b.iter(|| render(black_box(&tree), &theme, RenderMode::Preview))
    });
}

fn render_large_edit_mode(c: &mut Criterion) {
    let tree = large_tree();
    let theme = ThemeTokens::default();

    c.bench_function("render_large_edit_mode", |b| {
        b.iter(|| {
            render(
                black_box(&tree),
                &theme,
                RenderMode::Edit {
                    selected: Some("body-25-3"),
                },
            )
        })
    });
}

fn serialize_large(c: &mut Criterion) {
    let doc = render(&large_tree(), &ThemeTokens::default(), RenderMode::Preview);

    c.bench_function("serialize_large", |b| {
        b.iter(|| to_html(black_box(&doc), HtmlOptions::default()))
    });
}

criterion_group!(benches, render_starter, render_large_edit_mode, serialize_large);
criterion_main!(benches);
