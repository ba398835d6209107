//! # Generated Sections
//!
//! Boundary between the editor and the section generator. Generator output
//! is untrusted: it is parsed, checked to be a Section of a known layout
//! with legal children, and given fresh ids before it may touch a tree.

use async_trait::async_trait;
use pagekit_model::{IdGenerator, Node, SectionVariant};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::{Arc, OnceLock};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Generator unavailable: {0}")]
    Unavailable(String),

    #[error("Malformed generator output: {0}")]
    Malformed(String),

    #[error("Generated node is {0}, expected a Section")]
    NotASection(String),

    #[error("Unrecognised section variant: {0}")]
    UnknownVariant(String),

    #[error("Invalid generated section: {0}")]
    Invalid(String),
}

impl GenerationError {
    /// Everything except a bad request may succeed on another attempt.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, GenerationError::MissingField(_))
    }
}

fn default_tone() -> String {
    "professional".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(alias = "sectionType")]
    pub section_variant: SectionVariant,
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub one_liner: String,
    #[serde(default = "default_tone")]
    pub tone: String,
}

impl GenerateRequest {
    pub fn new(
        section_variant: SectionVariant,
        product_name: impl Into<String>,
        one_liner: impl Into<String>,
    ) -> Self {
        Self {
            section_variant,
            product_name: product_name.into(),
            one_liner: one_liner.into(),
            tone: default_tone(),
        }
    }

    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.product_name.trim().is_empty() {
            return Err(GenerationError::MissingField("productName"));
        }
        if self.one_liner.trim().is_empty() {
            return Err(GenerationError::MissingField("oneLiner"));
        }
        Ok(())
    }
}

/// Produces a candidate Section as raw JSON.
#[async_trait]
pub trait SectionGenerator: Send + Sync {
    async fn generate(&self, request: &GenerateRequest) -> Result<Value, GenerationError>;
}

pub const SYSTEM_PROMPT: &str = "You are a JSON generator for landing page components. Always return valid JSON only, no markdown formatting. The response must be a valid JSON object.";

/// User prompt for a text-completion generator.
pub fn build_prompt(request: &GenerateRequest) -> String {
    let variant = request.section_variant.as_str();
    format!(
        r#"Generate a landing page section JSON for a {variant} section.

Product Name: {product}
One-liner: {one_liner}
Tone: {tone}

Return ONLY valid JSON matching this schema:
{{
  "type": "Section",
  "variant": "{variant}",
  "children": [
    // Array of Text, Button, Image, or Stack components
    // For hero sections, include h1, p, and buttons
    // For features, include multiple feature items
    // For pricing, include pricing tiers
    // For FAQ, include questions and answers
    // For CTA, include heading, description, and button
  ]
}}

Each child component should have:
- type: "Text" | "Button" | "Image" | "Stack"
- id: unique string
- For Text: role ("h1" | "h2" | "h3" | "p"), content
- For Button: variant ("primary" | "secondary"), label, href
- For Stack: direction ("horizontal" | "vertical"), children array

Return ONLY the JSON object, no markdown, no explanation."#,
        variant = variant,
        product = request.product_name,
        one_liner = request.one_liner,
        tone = request.tone,
    )
}

static FENCE_RE: OnceLock<Option<Regex>> = OnceLock::new();

fn fence_re() -> Option<&'static Regex> {
    FENCE_RE
        .get_or_init(|| Regex::new(r"```(?:json)?[ \t]*\r?\n([\s\S]*?)\r?\n[ \t]*```").ok())
        .as_ref()
}

/// Extracts the JSON value from completion text, accepting a bare object
/// or one wrapped in a fenced code block.
pub fn parse_completion(text: &str) -> Result<Value, GenerationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(GenerationError::Malformed("empty completion".to_string()));
    }

    if let Ok(value) = serde_json::from_str(trimmed) {
        return Ok(value);
    }

    let fence = fence_re()
        .ok_or_else(|| GenerationError::Malformed("invalid fence pattern".to_string()))?;

    let body = fence
        .captures(trimmed)
        .and_then(|caps| caps.get(1))
        .ok_or_else(|| GenerationError::Malformed("no JSON object found".to_string()))?;

    serde_json::from_str(body.as_str()).map_err(|e| GenerationError::Malformed(e.to_string()))
}

/// Validates a candidate and assigns ids.
///
/// Every node without an id, or whose id is in `taken` or repeated inside
/// the candidate, gets a fresh one from `ids`. Nothing is returned unless
/// the whole subtree is valid.
pub fn prepare_section(
    candidate: Value,
    taken: &HashSet<String>,
    ids: &mut IdGenerator,
) -> Result<Node, GenerationError> {
    let object = candidate
        .as_object()
        .ok_or_else(|| GenerationError::Malformed("expected a JSON object".to_string()))?;

    match object.get("type").and_then(Value::as_str) {
        Some("Section") => {}
        Some(other) => return Err(GenerationError::NotASection(other.to_string())),
        None => return Err(GenerationError::NotASection("untyped".to_string())),
    }

    let variant = object.get("variant").and_then(Value::as_str).unwrap_or_default();
    if variant.parse::<SectionVariant>().is_err() {
        return Err(GenerationError::UnknownVariant(variant.to_string()));
    }

    let mut section: Node =
        serde_json::from_value(candidate).map_err(|e| GenerationError::Invalid(e.to_string()))?;
    check_children(&section)?;

    let mut used = taken.clone();
    assign_ids(&mut section, &mut used, ids);
    Ok(section)
}

fn check_children(node: &Node) -> Result<(), GenerationError> {
    let Some(children) = node.children() else {
        return Ok(());
    };

    for child in children {
        if !node.kind().can_contain(child.kind()) {
            return Err(GenerationError::Invalid(format!(
                "{} cannot contain {}",
                node.kind(),
                child.kind()
            )));
        }
        check_children(child)?;
    }
    Ok(())
}

fn assign_ids(node: &mut Node, used: &mut HashSet<String>, ids: &mut IdGenerator) {
    if node.id().is_empty() || used.contains(node.id()) {
        let fresh = ids.fresh_id(node.kind(), used);
        node.set_id(fresh);
    }
    used.insert(node.id().to_string());

    if let Some(children) = node.children_mut() {
        for child in children.iter_mut() {
            assign_ids(Arc::make_mut(child), used, ids);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn generator() -> IdGenerator {
        IdGenerator::from_seed("t".to_string())
    }

    #[test]
    fn test_request_defaults_and_alias() {
        let request: GenerateRequest = serde_json::from_value(json!({
            "sectionType": "faq_list",
            "productName": "Acme",
            "oneLiner": "Rockets"
        }))
        .unwrap();

        assert_eq!(request.section_variant, SectionVariant::FaqList);
        assert_eq!(request.tone, "professional");
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_request_requires_fields() {
        let request = GenerateRequest::new(SectionVariant::CtaSplit, "  ", "x");
        assert_eq!(request.validate(), Err(GenerationError::MissingField("productName")));
        assert!(!GenerationError::MissingField("productName").is_retryable());
    }

    #[test]
    fn test_prompt_mentions_request() {
        let request = GenerateRequest::new(SectionVariant::Pricing3Tier, "Acme", "Rockets for all");
        let prompt = build_prompt(&request);

        assert!(prompt.starts_with("Generate a landing page section JSON for a pricing_3_tier section."));
        assert!(prompt.contains("Product Name: Acme"));
        assert!(prompt.contains("\"variant\": \"pricing_3_tier\""));
        assert!(prompt.contains("Tone: professional"));
    }

    #[test]
    fn test_parse_bare_and_fenced() {
        let bare = parse_completion(r#" {"type":"Section"} "#).unwrap();
        assert_eq!(bare["type"], "Section");

        let fenced = parse_completion("Here you go:\n```json\n{\"type\":\"Section\"}\n```\nEnjoy").unwrap();
        assert_eq!(fenced["type"], "Section");

        let plain_fence = parse_completion("```\n{\"a\":1}\n```").unwrap();
        assert_eq!(plain_fence["a"], 1);
    }

    #[test]
    fn test_fence_pattern_compiles_once() {
        let first = fence_re().unwrap() as *const Regex;
        parse_completion("```json\n{\"a\":1}\n```").unwrap();
        assert_eq!(fence_re().unwrap() as *const Regex, first);
    }

    #[test]
    fn test_parse_garbage_is_retryable() {
        let err = parse_completion("sorry, I can't").unwrap_err();
        assert!(matches!(err, GenerationError::Malformed(_)));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_rejects_non_section() {
        let err = prepare_section(json!({"type": "Text", "role": "p"}), &HashSet::new(), &mut generator())
            .unwrap_err();
        assert_eq!(err, GenerationError::NotASection("Text".to_string()));
    }

    #[test]
    fn test_rejects_unknown_variant() {
        let err = prepare_section(
            json!({"type": "Section", "variant": "hero_diagonal", "children": []}),
            &HashSet::new(),
            &mut generator(),
        )
        .unwrap_err();
        assert_eq!(err, GenerationError::UnknownVariant("hero_diagonal".to_string()));
    }

    #[test]
    fn test_rejects_illegal_children() {
        let candidate = json!({
            "type": "Section",
            "variant": "features_grid",
            "children": [{"type": "Section", "variant": "faq_list", "children": []}]
        });
        let err = prepare_section(candidate, &HashSet::new(), &mut generator()).unwrap_err();
        assert!(matches!(err, GenerationError::Invalid(_)));

        let candidate = json!({
            "type": "Section",
            "variant": "features_grid",
            "children": [{"type": "Carousel"}]
        });
        assert!(prepare_section(candidate, &HashSet::new(), &mut generator()).is_err());
    }

    #[test]
    fn test_assigns_missing_and_colliding_ids() {
        let candidate = json!({
            "type": "Section",
            "variant": "hero_centered",
            "children": [
                {"type": "Text", "role": "h1", "content": "Hi"},
                {"type": "Text", "id": "hero-title", "role": "p", "content": "taken"},
                {"type": "Stack", "id": "dup", "direction": "horizontal", "children": [
                    {"type": "Button", "id": "dup", "variant": "primary", "label": "Go", "href": "#"}
                ]}
            ]
        });
        let taken: HashSet<String> = ["page".to_string(), "hero-title".to_string()].into();

        let section = prepare_section(candidate, &taken, &mut generator()).unwrap();

        let mut seen = HashSet::new();
        section.walk(&mut |node| {
            assert!(!node.id().is_empty());
            assert!(!taken.contains(node.id()), "reused {}", node.id());
            assert!(seen.insert(node.id().to_string()), "duplicate {}", node.id());
        });
        assert_eq!(seen.len(), 5);
        assert!(seen.contains("dup"));
        assert!(section.id().starts_with("section-t-"));
    }
}
