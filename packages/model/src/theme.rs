//! # Theme Tokens
//!
//! Flat design values read by the renderer. Every group is
//! `#[serde(default)]`, so a stored theme missing keys still loads with
//! the default values filled in.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ThemeTokens {
    pub colors: Colors,
    pub typography: Typography,
    pub spacing: Spacing,
    pub border_radius: String,
    pub shadows: Shadows,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Colors {
    pub primary: String,
    pub secondary: String,
    pub background: String,
    pub foreground: String,
    pub muted: String,
    pub accent: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Typography {
    pub font_family: String,
    pub font_size: FontScale,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontScale {
    pub sm: String,
    pub base: String,
    pub lg: String,
    pub xl: String,
    #[serde(rename = "2xl")]
    pub xl2: String,
    #[serde(rename = "3xl")]
    pub xl3: String,
    #[serde(rename = "4xl")]
    pub xl4: String,
    #[serde(rename = "5xl")]
    pub xl5: String,
    #[serde(rename = "6xl")]
    pub xl6: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Spacing {
    pub xs: String,
    pub sm: String,
    pub md: String,
    pub lg: String,
    pub xl: String,
    #[serde(rename = "2xl")]
    pub xl2: String,
    #[serde(rename = "3xl")]
    pub xl3: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Shadows {
    pub sm: String,
    pub md: String,
    pub lg: String,
}

/// A step on the font size scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStep {
    Sm,
    Base,
    Lg,
    Xl,
    Xl2,
    Xl3,
    Xl4,
    Xl5,
    Xl6,
}

impl FontScale {
    pub fn get(&self, step: FontStep) -> &str {
        match step {
            FontStep::Sm => &self.sm,
            FontStep::Base => &self.base,
            FontStep::Lg => &self.lg,
            FontStep::Xl => &self.xl,
            FontStep::Xl2 => &self.xl2,
            FontStep::Xl3 => &self.xl3,
            FontStep::Xl4 => &self.xl4,
            FontStep::Xl5 => &self.xl5,
            FontStep::Xl6 => &self.xl6,
        }
    }
}

impl Default for ThemeTokens {
    fn default() -> Self {
        Self {
            colors: Colors::default(),
            typography: Typography::default(),
            spacing: Spacing::default(),
            border_radius: "0.75rem".to_string(),
            shadows: Shadows::default(),
        }
    }
}

impl Default for Colors {
    fn default() -> Self {
        Self {
            primary: "#3b82f6".to_string(),
            secondary: "#64748b".to_string(),
            background: "#ffffff".to_string(),
            foreground: "#0f172a".to_string(),
            muted: "#f1f5f9".to_string(),
            accent: "#e2e8f0".to_string(),
        }
    }
}

impl Default for Typography {
    fn default() -> Self {
        Self {
            font_family: "Inter, sans-serif".to_string(),
            font_size: FontScale::default(),
        }
    }
}

impl Default for FontScale {
    fn default() -> Self {
        Self {
            sm: "0.875rem".to_string(),
            base: "1rem".to_string(),
            lg: "1.125rem".to_string(),
            xl: "1.25rem".to_string(),
            xl2: "1.5rem".to_string(),
            xl3: "1.875rem".to_string(),
            xl4: "2.25rem".to_string(),
            xl5: "3rem".to_string(),
            xl6: "3.75rem".to_string(),
        }
    }
}

impl Default for Spacing {
    fn default() -> Self {
        Self {
            xs: "0.5rem".to_string(),
            sm: "1rem".to_string(),
            md: "1.5rem".to_string(),
            lg: "2rem".to_string(),
            xl: "3rem".to_string(),
            xl2: "4rem".to_string(),
            xl3: "6rem".to_string(),
        }
    }
}

impl Default for Shadows {
    fn default() -> Self {
        Self {
            sm: "0 1px 2px 0 rgb(0 0 0 / 0.05)".to_string(),
            md: "0 4px 6px -1px rgb(0 0 0 / 0.1)".to_string(),
            lg: "0 10px 15px -3px rgb(0 0 0 / 0.1)".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_wire_shape() {
        let value = serde_json::to_value(ThemeTokens::default()).unwrap();
        assert_eq!(value["colors"]["primary"], "#3b82f6");
        assert_eq!(value["typography"]["fontFamily"], "Inter, sans-serif");
        assert_eq!(value["typography"]["fontSize"]["6xl"], "3.75rem");
        assert_eq!(value["spacing"]["3xl"], "6rem");
        assert_eq!(value["borderRadius"], "0.75rem");
    }

    #[test]
    fn test_partial_theme_fills_defaults() {
        let theme: ThemeTokens =
            serde_json::from_str(r##"{"colors":{"primary":"#ff0000"}}"##).unwrap();

        assert_eq!(theme.colors.primary, "#ff0000");
        assert_eq!(theme.colors.background, "#ffffff");
        assert_eq!(theme.typography, Typography::default());
    }

    #[test]
    fn test_font_step_lookup() {
        let scale = FontScale::default();
        assert_eq!(scale.get(FontStep::Xl5), "3rem");
        assert_eq!(scale.get(FontStep::Base), "1rem");
    }

    #[test]
    fn test_empty_object_is_default() {
        let theme: ThemeTokens = serde_json::from_str("{}").unwrap();
        assert_eq!(theme, ThemeTokens::default());
    }
}
