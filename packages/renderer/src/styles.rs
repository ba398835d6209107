//! Fixed style tables. Every lookup here is a pure mapping from a model
//! enum to classes and inline CSS, so the editor canvas and the published
//! page always agree.

use pagekit_model::{Align, ButtonVariant, Direction, FontStep, Justify, SectionVariant, TextRole};

/// How a section arranges its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutRule {
    /// Single centered column, centered text.
    CenteredColumn,
    /// Left-aligned column with a fixed gap.
    Column { gap: u32 },
    /// Two columns with vertically centered content.
    Split,
    Grid { columns: u8, gap: u32 },
    /// Stacked collapsible entries.
    Accordion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutDirective {
    pub rule: LayoutRule,
    pub classes: &'static str,
    /// Content width cap, centered when present.
    pub max_width: Option<&'static str>,
}

impl LayoutDirective {
    /// Inline CSS declarations for this layout.
    pub fn css(&self) -> Vec<(&'static str, String)> {
        let mut css = match self.rule {
            LayoutRule::CenteredColumn => vec![
                ("display", "flex".to_string()),
                ("flex-direction", "column".to_string()),
                ("align-items", "center".to_string()),
                ("justify-content", "center".to_string()),
                ("text-align", "center".to_string()),
            ],
            LayoutRule::Column { gap } => vec![
                ("display", "flex".to_string()),
                ("flex-direction", "column".to_string()),
                ("gap", format!("{}px", gap)),
            ],
            LayoutRule::Split => vec![
                ("display", "grid".to_string()),
                ("grid-template-columns", "repeat(2, minmax(0, 1fr))".to_string()),
                ("gap", "32px".to_string()),
                ("align-items", "center".to_string()),
            ],
            LayoutRule::Grid { columns, gap } => vec![
                ("display", "grid".to_string()),
                ("grid-template-columns", format!("repeat({}, minmax(0, 1fr))", columns)),
                ("gap", format!("{}px", gap)),
            ],
            LayoutRule::Accordion => vec![
                ("display", "flex".to_string()),
                ("flex-direction", "column".to_string()),
                ("gap", "16px".to_string()),
            ],
        };

        if let Some(width) = self.max_width {
            css.push(("max-width", width.to_string()));
            css.push(("margin-left", "auto".to_string()));
            css.push(("margin-right", "auto".to_string()));
        }
        css.push(("width", "100%".to_string()));
        css
    }
}

pub fn section_layout(variant: SectionVariant) -> LayoutDirective {
    use SectionVariant::*;

    let (rule, classes, max_width) = match variant {
        HeroCentered | HeroWithBadges | CtaCentered => (
            LayoutRule::CenteredColumn,
            "w-full flex flex-col items-center justify-center text-center",
            None,
        ),
        HeroSplit | CtaSplit => (
            LayoutRule::Split,
            "w-full grid grid-cols-1 md:grid-cols-2 gap-8 items-center",
            None,
        ),
        FeaturesGrid => (
            LayoutRule::Grid { columns: 3, gap: 32 },
            "w-full grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-8",
            None,
        ),
        FeaturesList => (LayoutRule::Column { gap: 24 }, "w-full flex flex-col gap-6", None),
        Pricing2Tier => (
            LayoutRule::Grid { columns: 2, gap: 32 },
            "w-full grid grid-cols-1 md:grid-cols-2 gap-8 max-w-4xl mx-auto",
            Some("56rem"),
        ),
        Pricing3Tier => (
            LayoutRule::Grid { columns: 3, gap: 32 },
            "w-full grid grid-cols-1 md:grid-cols-3 gap-8 max-w-6xl mx-auto",
            Some("72rem"),
        ),
        FaqAccordion => (
            LayoutRule::Accordion,
            "w-full flex flex-col gap-4 max-w-3xl mx-auto",
            Some("48rem"),
        ),
        FaqList => (
            LayoutRule::Column { gap: 24 },
            "w-full flex flex-col gap-6 max-w-3xl mx-auto",
            Some("48rem"),
        ),
        TestimonialsCards => (
            LayoutRule::Grid { columns: 3, gap: 24 },
            "w-full grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-6",
            None,
        ),
        TestimonialsSingle => (
            LayoutRule::CenteredColumn,
            "w-full flex flex-col items-center text-center max-w-3xl mx-auto",
            Some("48rem"),
        ),
    };

    LayoutDirective {
        rule,
        classes,
        max_width,
    }
}

/// Typographic style of a text role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextStyle {
    pub tag: &'static str,
    pub classes: &'static str,
    pub size: FontStep,
    pub weight: u16,
}

pub fn text_style(role: TextRole) -> TextStyle {
    let (tag, classes, size, weight) = match role {
        TextRole::H1 => ("h1", "text-5xl md:text-6xl font-bold", FontStep::Xl5, 700),
        TextRole::H2 => ("h2", "text-4xl md:text-5xl font-bold", FontStep::Xl4, 700),
        TextRole::H3 => ("h3", "text-3xl md:text-4xl font-semibold", FontStep::Xl3, 600),
        TextRole::H4 => ("h4", "text-2xl md:text-3xl font-semibold", FontStep::Xl2, 600),
        TextRole::H5 => ("h5", "text-xl md:text-2xl font-medium", FontStep::Xl, 500),
        TextRole::H6 => ("h6", "text-lg md:text-xl font-medium", FontStep::Lg, 500),
        TextRole::P => ("p", "text-base md:text-lg", FontStep::Base, 400),
        TextRole::Span => ("span", "text-base", FontStep::Base, 400),
    };
    TextStyle {
        tag,
        classes,
        size,
        weight,
    }
}

pub const BUTTON_BASE_CLASSES: &str = "inline-flex items-center justify-center rounded-md px-6 py-3 text-sm font-medium transition-colors";

pub fn button_classes(variant: ButtonVariant) -> &'static str {
    match variant {
        ButtonVariant::Primary => "bg-primary text-white hover:bg-primary/90",
        ButtonVariant::Secondary => "bg-secondary text-secondary-foreground hover:bg-secondary/80",
        ButtonVariant::Outline => "border border-input bg-background hover:bg-accent",
        ButtonVariant::Ghost => "hover:bg-accent hover:text-accent-foreground",
    }
}

pub fn direction_class(direction: Direction) -> &'static str {
    match direction {
        Direction::Horizontal => "flex-row",
        Direction::Vertical => "flex-col",
    }
}

pub fn direction_css(direction: Direction) -> &'static str {
    match direction {
        Direction::Horizontal => "row",
        Direction::Vertical => "column",
    }
}

pub fn align_class(align: Align) -> &'static str {
    match align {
        Align::Start => "items-start",
        Align::Center => "items-center",
        Align::End => "items-end",
        Align::Stretch => "items-stretch",
    }
}

pub fn align_css(align: Align) -> &'static str {
    match align {
        Align::Start => "flex-start",
        Align::Center => "center",
        Align::End => "flex-end",
        Align::Stretch => "stretch",
    }
}

pub fn justify_class(justify: Justify) -> &'static str {
    match justify {
        Justify::Start => "justify-start",
        Justify::Center => "justify-center",
        Justify::End => "justify-end",
        Justify::Between => "justify-between",
        Justify::Around => "justify-around",
    }
}

pub fn justify_css(justify: Justify) -> &'static str {
    match justify {
        Justify::Start => "flex-start",
        Justify::Center => "center",
        Justify::End => "flex-end",
        Justify::Between => "space-between",
        Justify::Around => "space-around",
    }
}

pub const SELECTED_CLASSES: &str = "ring-2 ring-primary ring-offset-2";
pub const SECTION_HOVER_CLASSES: &str = "hover:outline hover:outline-2 hover:outline-primary/20";
pub const NODE_HOVER_CLASSES: &str = "hover:outline hover:outline-1 hover:outline-primary/20";
pub const BUTTON_HOVER_CLASSES: &str = "hover:scale-105 transition-transform";
