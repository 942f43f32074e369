//! Four stylistic renditions of one topic, generated concurrently.

use crate::error::RequestValidationError;
use crate::fallback::{customize_for_style, fallback_data};
use crate::ir::{DiagramData, DiagramKind, VariationStyle};
use crate::llm::CompletionRequest;
use crate::pipeline::{DataOrigin, DiagramOrchestrator, Stage, timestamp_now, unix_timestamp};
use crate::prompt::{diagram_prompt, variation_prompt, variation_system_prompt};
use crate::render::{render_diagram, render_error_svg};
use crate::theme::Theme;
use futures::future::join_all;
use serde::Serialize;
use tracing::{info, warn};

pub const VARIATION_COUNT: usize = 4;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramVariation {
    pub id: String,
    pub template_name: String,
    pub diagram_type: String,
    pub content: String,
    pub is_diagram: bool,
    pub timestamp: String,
    pub description: String,
    pub variation: String,
    pub color_theme: String,
    pub unique_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariationSet {
    pub variations: Vec<DiagramVariation>,
    pub user_input: String,
    pub diagram_type: String,
    pub total_variations: usize,
    pub timestamp: String,
}

fn variation_id(index: usize) -> String {
    format!("variation_{}", index + 1)
}

fn sampling_temperature(index: usize) -> f32 {
    0.3 + index as f32 * 0.2
}

/// Capitalizes the first letter of every word: `swot analysis` -> `Swot Analysis`.
fn title_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut at_word_start = true;
    for ch in name.chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = true;
        }
    }
    out
}

struct Slot<'a> {
    index: usize,
    style: VariationStyle,
    kind: DiagramKind,
    diagram_type: &'a str,
    topic: &'a str,
    stamp: i64,
}

impl Slot<'_> {
    fn entry(&self, content: String, template_name: String, description: String) -> DiagramVariation {
        let id = variation_id(self.index);
        DiagramVariation {
            id: format!("{}_{id}_{}", self.diagram_type, self.stamp),
            template_name,
            diagram_type: self.diagram_type.to_string(),
            content,
            is_diagram: true,
            timestamp: timestamp_now(),
            description,
            variation: self.style.as_str().to_string(),
            color_theme: self.style.color_theme().to_string(),
            unique_id: format!("{id}_{}", self.stamp),
        }
    }

    fn name(&self) -> String {
        format!("{} - {}", title_case(self.diagram_type), self.style.title())
    }

    fn styled_fallback(&self) -> DiagramData {
        customize_for_style(fallback_data(self.kind, self.topic), self.style, self.topic)
    }
}

impl DiagramOrchestrator {
    pub async fn generate_variations(
        &self,
        topic: &str,
        diagram_type: &str,
    ) -> Result<VariationSet, RequestValidationError> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(RequestValidationError::MissingField { field: "User input" });
        }
        let diagram_type = match diagram_type.trim() {
            "" => DiagramKind::Flowchart.as_str(),
            name => name,
        };
        let kind = DiagramKind::resolve(diagram_type);
        let stamp = unix_timestamp();
        info!(kind = %kind, stage = %Stage::Received, count = VARIATION_COUNT, "variations requested");

        let base = diagram_prompt(kind, topic);
        let slots: Vec<Slot<'_>> = VariationStyle::ALL
            .iter()
            .enumerate()
            .map(|(index, style)| Slot {
                index,
                style: *style,
                kind,
                diagram_type,
                topic,
                stamp,
            })
            .collect();
        let rendered = join_all(slots.iter().map(|slot| self.render_slot(slot, &base))).await;

        let mut variations: Vec<DiagramVariation> = rendered.into_iter().flatten().collect();
        if variations.len() < VARIATION_COUNT {
            warn!(kind = %kind, produced = variations.len(), "padding variations with fallback entries");
        }
        while variations.len() < VARIATION_COUNT {
            variations.push(pad_entry(variations.len(), kind, diagram_type, topic, stamp));
        }

        info!(kind = %kind, stage = %Stage::Responded, count = variations.len(), "variations generated");
        Ok(VariationSet {
            total_variations: variations.len(),
            variations,
            user_input: topic.to_string(),
            diagram_type: diagram_type.to_string(),
            timestamp: timestamp_now(),
        })
    }

    async fn render_slot(&self, slot: &Slot<'_>, base: &str) -> Option<DiagramVariation> {
        let request = CompletionRequest {
            model: self.llm().model.clone(),
            system: variation_system_prompt(slot.kind, slot.style),
            prompt: variation_prompt(base, slot.kind, slot.style, slot.topic),
            json_response: true,
            temperature: sampling_temperature(slot.index),
            max_tokens: self.llm().max_tokens,
        };
        let (data, origin) = match self.fetch_data(slot.kind, request).await {
            Ok(data) => (data, DataOrigin::Llm),
            Err(_) => (slot.styled_fallback(), DataOrigin::Fallback),
        };
        let theme = Theme::for_style(slot.style);
        let description = format!("A {} style {} visualization", slot.style, slot.diagram_type);

        match render_diagram(&data, &theme) {
            Ok(svg) => {
                info!(
                    kind = %slot.kind,
                    variation = %slot.style,
                    origin = %origin,
                    "variation rendered"
                );
                Some(slot.entry(svg, slot.name(), description))
            }
            Err(cause) => {
                warn!(kind = %slot.kind, variation = %slot.style, error = %cause, "variation could not be drawn");
                match render_diagram(&slot.styled_fallback(), &theme) {
                    Ok(svg) => {
                        let mut entry = slot.entry(
                            svg,
                            format!("{} (Fallback)", slot.name()),
                            format!("A fallback {} style {} visualization", slot.style, slot.diagram_type),
                        );
                        entry.id = format!(
                            "{}_{}_fallback_{}",
                            slot.diagram_type,
                            variation_id(slot.index),
                            slot.stamp
                        );
                        Some(entry)
                    }
                    Err(_) => None,
                }
            }
        }
    }
}

fn pad_entry(index: usize, kind: DiagramKind, diagram_type: &str, topic: &str, stamp: i64) -> DiagramVariation {
    let content = render_diagram(&fallback_data(kind, topic), &Theme::fallback_variation())
        .unwrap_or_else(|_| render_error_svg(&format!("Failed to generate {kind} diagram")));
    DiagramVariation {
        id: format!("{diagram_type}_fallback_{index}_{stamp}"),
        template_name: format!("{} - Fallback {}", title_case(diagram_type), index + 1),
        diagram_type: diagram_type.to_string(),
        content,
        is_diagram: true,
        timestamp: timestamp_now(),
        description: format!("A fallback {diagram_type} visualization"),
        variation: "fallback".to_string(),
        color_theme: "blue".to_string(),
        unique_id: format!("fallback_{index}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    #[test]
    fn title_case_matches_display_names() {
        assert_eq!(title_case("swot analysis"), "Swot Analysis");
        assert_eq!(title_case("mind map"), "Mind Map");
        assert_eq!(title_case("ERD"), "Erd");
    }

    #[test]
    fn temperatures_climb_per_slot() {
        let temps: Vec<f32> = (0..VARIATION_COUNT).map(sampling_temperature).collect();
        assert!((temps[0] - 0.3).abs() < 1e-6);
        assert!((temps[3] - 0.9).abs() < 1e-6);
    }

    #[test]
    fn offline_variations_have_distinct_styles() {
        let orchestrator = DiagramOrchestrator::offline();
        let set = block_on(orchestrator.generate_variations("coffee shop", "flowchart")).unwrap();
        assert_eq!(set.total_variations, VARIATION_COUNT);
        let styles: Vec<&str> = set.variations.iter().map(|v| v.variation.as_str()).collect();
        assert_eq!(styles, ["standard", "detailed", "compact", "enhanced"]);
        let themes: Vec<&str> = set.variations.iter().map(|v| v.color_theme.as_str()).collect();
        assert_eq!(themes, ["blue", "green", "purple", "orange"]);
        assert_eq!(set.variations[1].template_name, "Flowchart - Detailed");
        assert_eq!(set.variations[2].description, "A compact style flowchart visualization");
        assert!(set.variations[0].id.starts_with("flowchart_variation_1_"));
        assert!(set.variations[3].unique_id.starts_with("variation_4_"));
        assert_ne!(set.variations[0].content, set.variations[1].content);
    }

    #[test]
    fn pads_are_plain_fallbacks() {
        let pad = pad_entry(2, DiagramKind::Erd, "erd", "library", 1_700_000_000);
        assert_eq!(pad.id, "erd_fallback_2_1700000000");
        assert_eq!(pad.template_name, "Erd - Fallback 3");
        assert_eq!(pad.variation, "fallback");
        assert_eq!(pad.unique_id, "fallback_2");
        assert!(pad.content.starts_with("<svg"));
        assert!(pad.content.contains("#3B82F6"));
    }

    #[test]
    fn blank_topic_is_rejected() {
        let orchestrator = DiagramOrchestrator::offline();
        assert!(block_on(orchestrator.generate_variations("   ", "flowchart")).is_err());
    }
}
