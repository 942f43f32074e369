use napkin_diagrams::fallback::{customize_for_style, fallback_data};
use napkin_diagrams::normalize::normalize;
use napkin_diagrams::{DiagramKind, Theme, VariationStyle, render_diagram};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NapkinRenderOptions {
    style: Option<String>,
    topic: Option<String>,
    font_family: Option<String>,
}

fn build_theme(kind: DiagramKind, style: Option<VariationStyle>, options: &NapkinRenderOptions) -> Theme {
    let mut theme = match style {
        Some(style) => Theme::for_style(style),
        None => Theme::for_kind(kind),
    };
    if let Some(font_family) = &options.font_family {
        theme.font_family = font_family.clone();
    }
    theme
}

fn render(diagram_type: &str, json: &str, options: NapkinRenderOptions) -> Result<String, String> {
    let kind = DiagramKind::resolve(diagram_type);
    let style = match options.style.as_deref() {
        Some(name) => Some(VariationStyle::from_name(name).ok_or_else(|| format!("unknown style `{name}`"))?),
        None => None,
    };

    let data = if json.trim().is_empty() {
        let topic = options.topic.as_deref().unwrap_or("Topic");
        let data = fallback_data(kind, topic);
        match style {
            Some(style) => customize_for_style(data, style, topic),
            None => data,
        }
    } else {
        let raw: serde_json::Value = serde_json::from_str(json).map_err(|error| error.to_string())?;
        normalize(&raw, kind).map_err(|error| error.to_string())?
    };

    render_diagram(&data, &build_theme(kind, style, &options)).map_err(|error| error.to_string())
}

/// Renders diagram JSON (or the canned data for `topic` when `json` is blank).
#[wasm_bindgen]
pub fn render_diagram_svg(diagram_type: &str, json: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let options = if let Some(raw_options) = options_json {
        serde_json::from_str::<NapkinRenderOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string()))?
    } else {
        NapkinRenderOptions::default()
    };

    render(diagram_type, json, options).map_err(|error| JsValue::from_str(&error))
}

#[cfg(test)]
mod tests {
    use crate::{NapkinRenderOptions, render};

    #[test]
    fn renders_swot_quadrants() {
        let json = r#"{
            "strengths": ["Loyal regulars"],
            "weaknesses": ["Small kitchen"],
            "opportunities": ["Catering"],
            "threats": ["Chain competitor"]
        }"#;

        let svg = render("swot", json, NapkinRenderOptions::default()).expect("swot should render");

        assert!(svg.contains("<svg"));
        assert!(svg.contains("Loyal regulars"));
        assert!(svg.contains("Chain competitor"));
    }

    #[test]
    fn blank_json_uses_styled_canned_data() {
        let options = NapkinRenderOptions {
            style: Some("compact".to_string()),
            topic: Some("bakery".to_string()),
            font_family: Some("Georgia".to_string()),
        };
        let svg = render("mind map", "", options).expect("canned mindmap should render");
        assert!(svg.contains("font-family=\"Georgia\""));
    }

    #[test]
    fn rejects_unknown_style() {
        let options = NapkinRenderOptions {
            style: Some("neon".to_string()),
            ..NapkinRenderOptions::default()
        };
        assert!(render("flowchart", "", options).is_err());
    }
}
