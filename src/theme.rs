use crate::ir::{DiagramKind, VariationStyle};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub background: String,
    pub surface: String,
    pub text_color: String,
    pub muted_text_color: String,
    pub line_color: String,
    pub on_primary: String,
}

impl Theme {
    pub fn napkin(primary: &str, secondary: &str, accent: &str) -> Self {
        Self {
            font_family: "Inter, -apple-system, sans-serif".to_string(),
            primary: primary.to_string(),
            secondary: secondary.to_string(),
            accent: accent.to_string(),
            background: "#F8FAFC".to_string(),
            surface: "#FFFFFF".to_string(),
            text_color: "#1F2937".to_string(),
            muted_text_color: "#6B7280".to_string(),
            line_color: "#94A3B8".to_string(),
            on_primary: "#FFFFFF".to_string(),
        }
    }

    pub fn standard() -> Self {
        Self::napkin("#4F46E5", "#7C3AED", "#6366F1")
    }

    /// Palette used when a diagram is rendered on its own.
    pub fn for_kind(kind: DiagramKind) -> Self {
        let [primary, secondary, accent] = crate::registry::spec_for(kind).palette;
        Self::napkin(primary, secondary, accent)
    }

    pub fn for_style(style: VariationStyle) -> Self {
        match style {
            VariationStyle::Standard => Self::standard(),
            VariationStyle::Detailed => Self::napkin("#059669", "#10B981", "#047857"),
            VariationStyle::Compact => Self::napkin("#7C2D12", "#9A3412", "#5C1911"),
            VariationStyle::Enhanced => Self::napkin("#EA580C", "#FB923C", "#C2410C"),
        }
    }

    /// Palette for variation slots padded with plain fallback data.
    pub fn fallback_variation() -> Self {
        Self::napkin("#3B82F6", "#60A5FA", "#2563EB")
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::standard()
    }
}
