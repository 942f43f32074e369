//! Topic in, SVG out: prompt, completion, normalization, layout, serialization.

use crate::config::LlmConfig;
use crate::error::{Error, RenderError, RequestValidationError, snippet};
use crate::fallback::fallback_data;
use crate::ir::{DiagramData, DiagramKind};
use crate::llm::{CompletionClient, CompletionRequest, DisabledClient, extract_json_object};
use crate::normalize::normalize;
use crate::prompt::{REGENERATE_SYSTEM_PROMPT, diagram_prompt, system_prompt};
use crate::render::{render_diagram, render_error_svg};
use crate::theme::Theme;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Request lifecycle, as reported in the `stage` log field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Received,
    Prompting,
    LlmOk,
    LlmFail,
    Normalizing,
    Normalized,
    NormalizeFail,
    Rendering,
    Responded,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Received => "received",
            Stage::Prompting => "prompting",
            Stage::LlmOk => "llm_ok",
            Stage::LlmFail => "llm_fail",
            Stage::Normalizing => "normalizing",
            Stage::Normalized => "normalized",
            Stage::NormalizeFail => "normalize_fail",
            Stage::Rendering => "rendering",
            Stage::Responded => "responded",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataOrigin {
    Llm,
    Fallback,
}

impl fmt::Display for DataOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DataOrigin::Llm => "llm",
            DataOrigin::Fallback => "fallback",
        })
    }
}

/// Validated input of a single-diagram generation.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramRequest {
    pub topic: String,
    /// Type name as the caller sent it; echoed back in responses.
    pub diagram_type: String,
    pub kind: DiagramKind,
    pub template_name: String,
}

impl DiagramRequest {
    pub fn new(
        topic: &str,
        diagram_type: &str,
        template_name: Option<&str>,
    ) -> Result<Self, RequestValidationError> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(RequestValidationError::MissingField { field: "User input" });
        }
        let diagram_type = match diagram_type.trim() {
            "" => DiagramKind::Flowchart.as_str(),
            name => name,
        };
        let kind = DiagramKind::resolve(diagram_type);
        let template_name = template_name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(crate::registry::spec_for(kind).title);
        Ok(Self {
            topic: topic.to_string(),
            diagram_type: diagram_type.to_string(),
            kind,
            template_name: template_name.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedDiagram {
    pub template_name: String,
    pub content: String,
    pub diagram_type: String,
    pub timestamp: String,
    pub origin: DataOrigin,
}

/// A diagram that could not be drawn. `diagram.content` holds the error card.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{cause}")]
pub struct RenderWarning {
    pub diagram: RenderedDiagram,
    pub cause: RenderError,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Regeneration {
    pub svg: String,
    pub success: bool,
    pub using_ai: bool,
    pub message: String,
    pub timestamp: String,
}

/// Local time in the `YYYY-MM-DDTHH:MM:SS.ffffff` form clients expect.
pub fn timestamp_now() -> String {
    chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

pub fn unix_timestamp() -> i64 {
    chrono::Utc::now().timestamp()
}

pub struct DiagramOrchestrator {
    client: Arc<dyn CompletionClient>,
    llm: LlmConfig,
}

impl DiagramOrchestrator {
    pub fn new(client: Arc<dyn CompletionClient>, llm: LlmConfig) -> Self {
        Self { client, llm }
    }

    /// Orchestrator that always answers with canned data.
    pub fn offline() -> Self {
        Self::new(Arc::new(DisabledClient), LlmConfig::default())
    }

    pub fn client_available(&self) -> bool {
        self.client.is_available()
    }

    pub fn llm(&self) -> &LlmConfig {
        &self.llm
    }

    pub fn client(&self) -> &Arc<dyn CompletionClient> {
        &self.client
    }

    /// One completion turned into canonical data. Any failure is returned so
    /// the caller can choose its fallback.
    pub(crate) async fn fetch_data(
        &self,
        kind: DiagramKind,
        request: CompletionRequest,
    ) -> Result<DiagramData, Error> {
        if !self.client.is_available() {
            return Err(Error::External(crate::error::ExternalServiceError::Unavailable));
        }
        debug!(kind = %kind, stage = %Stage::Prompting, model = %request.model, "requesting completion");
        let raw = match self.client.complete(request).await {
            Ok(raw) => raw,
            Err(err) => {
                warn!(kind = %kind, stage = %Stage::LlmFail, error = %err, "completion failed");
                return Err(err.into());
            }
        };
        let value = match extract_json_object(&raw) {
            Ok(value) => value,
            Err(err) => {
                warn!(
                    kind = %kind,
                    stage = %Stage::LlmFail,
                    error = %err,
                    snippet = %snippet(&raw),
                    "completion has no usable JSON"
                );
                return Err(err.into());
            }
        };
        debug!(kind = %kind, stage = %Stage::LlmOk, "completion parsed");

        debug!(kind = %kind, stage = %Stage::Normalizing, "normalizing completion");
        match normalize(&value, kind) {
            Ok(data) => {
                debug!(kind = %kind, stage = %Stage::Normalized, "completion normalized");
                Ok(data)
            }
            Err(err) => {
                warn!(
                    kind = %kind,
                    stage = %Stage::NormalizeFail,
                    error = %err,
                    snippet = %snippet(&value.to_string()),
                    "completion failed schema checks"
                );
                Err(err.into())
            }
        }
    }

    fn generation_request(&self, kind: DiagramKind, topic: &str) -> CompletionRequest {
        CompletionRequest {
            model: self.llm.model.clone(),
            system: system_prompt(kind),
            prompt: diagram_prompt(kind, topic),
            json_response: true,
            temperature: self.llm.temperature,
            max_tokens: self.llm.max_tokens,
        }
    }

    pub async fn generate(&self, request: &DiagramRequest) -> Result<RenderedDiagram, RenderWarning> {
        let kind = request.kind;
        info!(kind = %kind, stage = %Stage::Received, snippet = %snippet(&request.topic), "diagram requested");

        let (data, origin) = match self
            .fetch_data(kind, self.generation_request(kind, &request.topic))
            .await
        {
            Ok(data) => (data, DataOrigin::Llm),
            Err(_) => (fallback_data(kind, &request.topic), DataOrigin::Fallback),
        };

        debug!(kind = %kind, stage = %Stage::Rendering, origin = %origin, "rendering diagram");
        let rendered = render_diagram(&data, &Theme::for_kind(kind));
        let result = match rendered {
            Ok(content) => Ok(RenderedDiagram {
                template_name: request.template_name.clone(),
                content,
                diagram_type: request.diagram_type.clone(),
                timestamp: timestamp_now(),
                origin,
            }),
            Err(cause) => {
                warn!(kind = %kind, stage = %Stage::Rendering, origin = %origin, error = %cause, "diagram could not be drawn");
                Err(RenderWarning {
                    diagram: RenderedDiagram {
                        template_name: request.template_name.clone(),
                        content: render_error_svg(&format!("Failed to generate {kind} diagram")),
                        diagram_type: request.diagram_type.clone(),
                        timestamp: timestamp_now(),
                        origin,
                    },
                    cause,
                })
            }
        };
        info!(kind = %kind, stage = %Stage::Responded, origin = %origin, ok = result.is_ok(), "diagram generated");
        result
    }

    /// Redraw a diagram from an edited prompt.
    pub async fn regenerate(
        &self,
        prompt: &str,
        diagram_type: &str,
        current_svg: &str,
    ) -> Result<Regeneration, RequestValidationError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(RequestValidationError::MissingField { field: "Prompt" });
        }
        let kind = DiagramKind::resolve(diagram_type);
        let using_ai = self.client.is_available();
        info!(kind = %kind, stage = %Stage::Received, using_ai, "regeneration requested");

        if !using_ai && !current_svg.trim().is_empty() {
            return Ok(Regeneration {
                svg: current_svg.to_string(),
                success: true,
                using_ai: false,
                message: "Diagram updated with your text changes (using direct text replacement)".to_string(),
                timestamp: timestamp_now(),
            });
        }

        let request = CompletionRequest {
            model: self.llm.regenerate_model.clone(),
            system: REGENERATE_SYSTEM_PROMPT.to_string(),
            prompt: diagram_prompt(kind, prompt),
            json_response: false,
            temperature: self.llm.regenerate_temperature,
            max_tokens: self.llm.regenerate_max_tokens,
        };
        let (data, origin) = match self.fetch_data(kind, request).await {
            Ok(data) => (data, DataOrigin::Llm),
            Err(_) => (fallback_data(kind, prompt), DataOrigin::Fallback),
        };

        let (svg, success) = match render_diagram(&data, &Theme::for_kind(kind)) {
            Ok(svg) => (svg, true),
            Err(cause) => {
                warn!(kind = %kind, stage = %Stage::Rendering, error = %cause, "regenerated diagram could not be drawn");
                (render_error_svg(&format!("Failed to generate {kind} diagram")), false)
            }
        };
        let mut message = "Diagram regenerated successfully".to_string();
        if origin == DataOrigin::Fallback {
            message.push_str(" (using fallback data)");
        }
        info!(kind = %kind, stage = %Stage::Responded, origin = %origin, success, "diagram regenerated");
        Ok(Regeneration {
            svg,
            success,
            using_ai,
            message,
            timestamp: timestamp_now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExternalServiceError;
    use futures::executor::block_on;
    use futures::future::BoxFuture;

    struct CannedClient(&'static str);

    impl CompletionClient for CannedClient {
        fn complete(&self, _request: CompletionRequest) -> BoxFuture<'_, Result<String, ExternalServiceError>> {
            let reply = self.0.to_string();
            Box::pin(async move { Ok(reply) })
        }
    }

    fn with_reply(reply: &'static str) -> DiagramOrchestrator {
        DiagramOrchestrator::new(Arc::new(CannedClient(reply)), LlmConfig::default())
    }

    #[test]
    fn request_validation() {
        assert_eq!(
            DiagramRequest::new("  ", "flowchart", None),
            Err(RequestValidationError::MissingField { field: "User input" })
        );
        let request = DiagramRequest::new(" tea ", "", None).unwrap();
        assert_eq!(request.topic, "tea");
        assert_eq!(request.kind, DiagramKind::Flowchart);
        assert_eq!(request.diagram_type, "flowchart");
        assert_eq!(request.template_name, "Flowchart");
        let named = DiagramRequest::new("tea", "Gantt", Some("Plan")).unwrap();
        assert_eq!(named.kind, DiagramKind::Gantt);
        assert_eq!(named.diagram_type, "Gantt");
        assert_eq!(named.template_name, "Plan");
    }

    #[test]
    fn offline_generation_uses_fallback() {
        let orchestrator = DiagramOrchestrator::offline();
        let request = DiagramRequest::new("widget manufacturing", "flowchart", None).unwrap();
        let diagram = block_on(orchestrator.generate(&request)).unwrap();
        assert_eq!(diagram.origin, DataOrigin::Fallback);
        assert!(diagram.content.contains("widget manufacturing"));
    }

    #[test]
    fn model_output_is_used_when_valid() {
        let orchestrator =
            with_reply("```json\n{\"steps\": {\"Grind\": [\"Grind the beans\"], \"Brew\": \"Pour water\"}}\n```");
        let request = DiagramRequest::new("coffee", "flowchart", None).unwrap();
        let diagram = block_on(orchestrator.generate(&request)).unwrap();
        assert_eq!(diagram.origin, DataOrigin::Llm);
        assert!(diagram.content.contains("Grind the beans"));
        assert!(diagram.content.contains("Pour water"));
    }

    #[test]
    fn schema_failure_falls_back() {
        let orchestrator = with_reply("{\"steps\": {\"Only\": [\"one\"]}}");
        let request = DiagramRequest::new("coffee", "flowchart", None).unwrap();
        let diagram = block_on(orchestrator.generate(&request)).unwrap();
        assert_eq!(diagram.origin, DataOrigin::Fallback);
    }

    #[test]
    fn regenerate_without_client_keeps_current_svg() {
        let orchestrator = DiagramOrchestrator::offline();
        let result = block_on(orchestrator.regenerate("new text", "flowchart", "<svg>old</svg>")).unwrap();
        assert_eq!(result.svg, "<svg>old</svg>");
        assert!(result.success);
        assert!(!result.using_ai);
        assert!(result.message.contains("direct text replacement"));

        let drawn = block_on(orchestrator.regenerate("new text", "timeline", "")).unwrap();
        assert!(drawn.svg.starts_with("<svg"));
        assert_eq!(drawn.message, "Diagram regenerated successfully (using fallback data)");
    }

    #[test]
    fn regenerate_requires_prompt() {
        let orchestrator = DiagramOrchestrator::offline();
        assert_eq!(
            block_on(orchestrator.regenerate(" ", "flowchart", "")),
            Err(RequestValidationError::MissingField { field: "Prompt" })
        );
    }

    #[test]
    fn failed_completion_regenerates_from_fallback() {
        let orchestrator = with_reply("not json at all");
        let result = block_on(orchestrator.regenerate("bakery", "swot analysis", "<svg/>")).unwrap();
        assert!(result.using_ai);
        assert!(result.success);
        assert_eq!(result.message, "Diagram regenerated successfully (using fallback data)");
        assert!(result.svg.contains("data-diagram-type=\"swot analysis\""));
    }
}
