//! Offline section generator.
//!
//! Fills a fixed layout per section family with the product name and
//! one-liner. Output is deterministic and always passes validation, which
//! makes it the default when no model-backed generator is configured.

use async_trait::async_trait;
use pagekit_editor::{GenerateRequest, GenerationError, SectionGenerator};
use pagekit_model::{ButtonVariant, Direction, Node, SectionVariant, TextRole};
use serde_json::Value;

#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateGenerator;

impl TemplateGenerator {
    pub fn new() -> Self {
        Self
    }

    /// The section for `request`, before ids are assigned.
    pub fn section(&self, request: &GenerateRequest) -> Node {
        let product = request.product_name.trim();
        let pitch = request.one_liner.trim();

        let children = match request.section_variant {
            SectionVariant::HeroCentered => hero(product, pitch),
            SectionVariant::HeroSplit => {
                let copy = Node::stack("", Direction::Vertical, hero(product, pitch));
                vec![copy, Node::image("", "", format!("{} preview", product))]
            }
            SectionVariant::HeroWithBadges => {
                let badges = ["Fast setup", "No code", "Free trial"]
                    .iter()
                    .map(|badge| Node::text("", TextRole::Span, *badge))
                    .collect();
                let mut children = vec![Node::stack("", Direction::Horizontal, badges)];
                children.extend(hero(product, pitch));
                children
            }
            SectionVariant::FeaturesGrid | SectionVariant::FeaturesList => features(product),
            SectionVariant::Pricing2Tier => pricing(&TIERS[..2]),
            SectionVariant::Pricing3Tier => pricing(&TIERS),
            SectionVariant::FaqAccordion | SectionVariant::FaqList => faq(product, pitch),
            SectionVariant::TestimonialsCards => testimonials(product, 3),
            SectionVariant::TestimonialsSingle => testimonials(product, 1),
            SectionVariant::CtaCentered | SectionVariant::CtaSplit => cta(product, pitch),
        };

        Node::section("", request.section_variant, children)
    }
}

#[async_trait]
impl SectionGenerator for TemplateGenerator {
    async fn generate(&self, request: &GenerateRequest) -> Result<Value, GenerationError> {
        request.validate()?;
        serde_json::to_value(self.section(request)).map_err(|e| GenerationError::Malformed(e.to_string()))
    }
}

fn hero(product: &str, pitch: &str) -> Vec<Node> {
    vec![
        Node::text("", TextRole::H1, product),
        Node::text("", TextRole::P, pitch),
        Node::stack(
            "",
            Direction::Horizontal,
            vec![
                Node::button("", ButtonVariant::Primary, "Get Started", "#"),
                Node::button("", ButtonVariant::Secondary, "Learn More", "#"),
            ],
        ),
    ]
}

const FEATURES: [(&str, &str); 3] = [
    ("Fast", "Go from idea to live page in minutes."),
    ("Flexible", "Every section adapts to your content."),
    ("Reliable", "Your work is saved as you go."),
];

fn features(product: &str) -> Vec<Node> {
    let mut children = vec![Node::text("", TextRole::H2, format!("Why {}", product))];
    children.extend(FEATURES.iter().map(|(title, body)| {
        Node::stack(
            "",
            Direction::Vertical,
            vec![
                Node::text("", TextRole::H3, *title),
                Node::text("", TextRole::P, *body),
            ],
        )
    }));
    children
}

const TIERS: [(&str, &str); 3] = [("Starter", "$0"), ("Pro", "$29"), ("Team", "$99")];

fn pricing(tiers: &[(&str, &str)]) -> Vec<Node> {
    let mut children = vec![Node::text("", TextRole::H2, "Pricing")];
    children.extend(tiers.iter().enumerate().map(|(i, (name, price))| {
        let variant = if i == 1 {
            ButtonVariant::Primary
        } else {
            ButtonVariant::Outline
        };
        Node::stack(
            "",
            Direction::Vertical,
            vec![
                Node::text("", TextRole::H3, *name),
                Node::text("", TextRole::P, format!("{} / month", price)),
                Node::button("", variant, format!("Choose {}", name), "#"),
            ],
        )
    }));
    children
}

fn faq(product: &str, pitch: &str) -> Vec<Node> {
    let entries = [
        (format!("What is {}?", product), pitch.to_string()),
        (
            "How do I get started?".to_string(),
            "Create a project and publish when you are ready.".to_string(),
        ),
        (
            "Can I cancel anytime?".to_string(),
            "Yes. There are no long-term contracts.".to_string(),
        ),
    ];

    let mut children = vec![Node::text("", TextRole::H2, "Frequently asked questions")];
    children.extend(entries.into_iter().map(|(question, answer)| {
        Node::stack(
            "",
            Direction::Vertical,
            vec![
                Node::text("", TextRole::H3, question),
                Node::text("", TextRole::P, answer),
            ],
        )
    }));
    children
}

const QUOTES: [(&str, &str); 3] = [
    ("Alex Rivera", "We launched our page the same afternoon."),
    ("Sam Chen", "The sections look great out of the box."),
    ("Jordan Lee", "Editing is fast and nothing ever gets lost."),
];

fn testimonials(product: &str, count: usize) -> Vec<Node> {
    let mut children = vec![Node::text(
        "",
        TextRole::H2,
        format!("What people say about {}", product),
    )];
    children.extend(QUOTES.iter().take(count).map(|(name, quote)| {
        Node::stack(
            "",
            Direction::Vertical,
            vec![
                Node::text("", TextRole::P, format!("\"{}\"", quote)),
                Node::text("", TextRole::Span, *name),
            ],
        )
    }));
    children
}

fn cta(product: &str, pitch: &str) -> Vec<Node> {
    vec![
        Node::text("", TextRole::H2, format!("Ready to try {}?", product)),
        Node::text("", TextRole::P, pitch),
        Node::button("", ButtonVariant::Primary, "Get Started", "#"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagekit_editor::prepare_section;
    use pagekit_model::IdGenerator;
    use std::collections::HashSet;

    fn request(variant: SectionVariant) -> GenerateRequest {
        GenerateRequest::new(variant, "Acme", "Rockets for everyone")
    }

    #[tokio::test]
    async fn test_every_variant_validates() {
        let generator = TemplateGenerator::new();
        let mut ids = IdGenerator::from_seed("g".to_string());

        for variant in SectionVariant::ALL {
            let value = generator.generate(&request(*variant)).await.unwrap();
            let section = prepare_section(value, &HashSet::new(), &mut ids).unwrap();
            match section {
                Node::Section { variant: v, ref children, .. } => {
                    assert_eq!(v, *variant);
                    assert!(!children.is_empty());
                }
                other => panic!("expected section, got {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn test_deterministic() {
        let generator = TemplateGenerator::new();
        let a = generator.generate(&request(SectionVariant::Pricing3Tier)).await.unwrap();
        let b = generator.generate(&request(SectionVariant::Pricing3Tier)).await.unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_content_comes_from_request() {
        let section = TemplateGenerator::new().section(&request(SectionVariant::CtaCentered));
        let children = section.children().unwrap();
        assert!(matches!(
            children[0].as_ref(),
            Node::Text { content, .. } if content == "Ready to try Acme?"
        ));
        assert!(matches!(
            children[1].as_ref(),
            Node::Text { content, .. } if content == "Rockets for everyone"
        ));
    }

    #[tokio::test]
    async fn test_requires_fields() {
        let incomplete = GenerateRequest::new(SectionVariant::FaqList, "", "x");
        let err = TemplateGenerator::new().generate(&incomplete).await.unwrap_err();
        assert_eq!(err, GenerationError::MissingField("productName"));
    }
}
