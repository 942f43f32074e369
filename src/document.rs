//! Markdown documents written from a template's prompt instruction.

use crate::error::{RequestValidationError, snippet};
use crate::llm::CompletionRequest;
use crate::pipeline::{DiagramOrchestrator, timestamp_now};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

const USER_INPUT_PLACEHOLDER: &str = "[USER_INPUT]";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub document_type: &'static str,
    pub prompt_instruction: &'static str,
}

pub const DOCUMENT_TEMPLATES: [DocumentTemplate; 5] = [
    DocumentTemplate {
        id: "business_plan",
        name: "Business Plan",
        description: "Comprehensive business planning document",
        document_type: "business",
        prompt_instruction: "Create a detailed business plan for [USER_INPUT]. Include executive summary, market analysis, financial projections, and implementation strategy.",
    },
    DocumentTemplate {
        id: "technical_spec",
        name: "Technical Specification",
        description: "Detailed technical requirements and specifications",
        document_type: "technical",
        prompt_instruction: "Create a comprehensive technical specification document for [USER_INPUT]. Include system requirements, architecture, APIs, and implementation details.",
    },
    DocumentTemplate {
        id: "project_proposal",
        name: "Project Proposal",
        description: "Professional project proposal document",
        document_type: "proposal",
        prompt_instruction: "Create a detailed project proposal for [USER_INPUT]. Include objectives, scope, timeline, resources, and expected outcomes.",
    },
    DocumentTemplate {
        id: "marketing_strategy",
        name: "Marketing Strategy",
        description: "Strategic marketing plan and approach",
        document_type: "marketing",
        prompt_instruction: "Create a comprehensive marketing strategy for [USER_INPUT]. Include target audience, channels, campaigns, and metrics.",
    },
    DocumentTemplate {
        id: "user_manual",
        name: "User Manual",
        description: "Step-by-step user guide and documentation",
        document_type: "documentation",
        prompt_instruction: "Create a detailed user manual for [USER_INPUT]. Include setup instructions, features, troubleshooting, and best practices.",
    },
];

/// Template as sent by a client; every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TemplateRequest {
    pub name: Option<String>,
    pub document_type: Option<String>,
    pub prompt_instruction: Option<String>,
}

impl TemplateRequest {
    fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("General Document")
    }

    fn document_type(&self) -> &str {
        self.document_type.as_deref().unwrap_or("general")
    }

    fn prompt_for(&self, topic: &str) -> String {
        self.prompt_instruction
            .as_deref()
            .unwrap_or_default()
            .replace(USER_INPUT_PLACEHOLDER, topic)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedDocument {
    pub template_name: String,
    pub content: String,
    pub document_type: String,
    pub timestamp: String,
}

fn generated_on() -> String {
    chrono::Local::now().format("%B %d, %Y").to_string()
}

pub fn fallback_document(name: &str, topic: &str) -> String {
    format!(
        "# {name}\n\n\
         ## Overview\n\
         This document provides a comprehensive overview of {topic}.\n\n\
         ## Key Points\n\
         - Professional approach to {topic}\n\
         - Structured methodology and best practices\n\
         - Clear objectives and deliverables\n\
         - Risk assessment and mitigation strategies\n\n\
         ## Implementation Plan\n\
         1. **Planning Phase**: Define scope and requirements\n\
         2. **Analysis Phase**: Evaluate current state and needs\n\
         3. **Design Phase**: Create detailed specifications\n\
         4. **Execution Phase**: Implement the solution\n\
         5. **Review Phase**: Validate results and optimize\n\n\
         ## Conclusion\n\
         This document serves as a foundation for successful implementation of {topic}.\n\n\
         *Generated on {}*\n\
         *Status: Ready for implementation*",
        generated_on()
    )
}

/// Shorter stand-in used inside batch generation.
pub fn brief_fallback_document(name: &str, topic: &str) -> String {
    format!(
        "# {name}\n\n\
         ## Overview\n\
         This document provides a comprehensive overview of {topic}.\n\n\
         ## Key Points\n\
         - Professional approach to {topic}\n\
         - Structured methodology and best practices\n\
         - Clear objectives and deliverables\n\n\
         ## Implementation\n\
         Detailed implementation plan for {topic}.\n\n\
         *Generated on {}*",
        generated_on()
    )
}

impl DiagramOrchestrator {
    async fn write_document(&self, topic: &str, template: &TemplateRequest, brief: bool) -> GeneratedDocument {
        let document_type = template.document_type();
        let request = CompletionRequest {
            model: self.llm().model.clone(),
            system: format!(
                "You are a professional document writer specializing in {document_type} documents. \
                 Create comprehensive, well-structured, and professional content."
            ),
            prompt: template.prompt_for(topic),
            json_response: false,
            temperature: self.llm().temperature,
            max_tokens: self.llm().document_max_tokens,
        };

        let completion = if self.client_available() {
            self.client().complete(request).await
        } else {
            Err(crate::error::ExternalServiceError::Unavailable)
        };
        let content = match completion {
            Ok(text) if !text.trim().is_empty() => text,
            outcome => {
                if let Err(err) = outcome {
                    warn!(document_type, template = template.name(), error = %err, "document completion failed, using fallback");
                }
                if brief {
                    brief_fallback_document(template.name(), topic)
                } else {
                    fallback_document(template.name(), topic)
                }
            }
        };

        GeneratedDocument {
            template_name: template.name().to_string(),
            content,
            document_type: document_type.to_string(),
            timestamp: timestamp_now(),
        }
    }

    pub async fn generate_document(
        &self,
        topic: &str,
        template: &TemplateRequest,
    ) -> Result<GeneratedDocument, RequestValidationError> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(RequestValidationError::MissingField { field: "User input" });
        }
        info!(template = template.name(), snippet = %snippet(topic), "document requested");
        Ok(self.write_document(topic, template, false).await)
    }

    pub async fn generate_documents(
        &self,
        topic: &str,
        templates: &[TemplateRequest],
    ) -> Result<Vec<GeneratedDocument>, RequestValidationError> {
        let topic = topic.trim();
        if topic.is_empty() || templates.is_empty() {
            return Err(RequestValidationError::MissingDocumentInput);
        }
        info!(count = templates.len(), snippet = %snippet(topic), "documents requested");
        Ok(join_all(templates.iter().map(|template| self.write_document(topic, template, true))).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    #[test]
    fn templates_carry_the_placeholder() {
        let ids: Vec<&str> = DOCUMENT_TEMPLATES.iter().map(|t| t.id).collect();
        assert_eq!(
            ids,
            ["business_plan", "technical_spec", "project_proposal", "marketing_strategy", "user_manual"]
        );
        assert!(DOCUMENT_TEMPLATES.iter().all(|t| t.prompt_instruction.contains(USER_INPUT_PLACEHOLDER)));
    }

    #[test]
    fn request_defaults() {
        let request: TemplateRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request.name(), "General Document");
        assert_eq!(request.document_type(), "general");
        let request: TemplateRequest =
            serde_json::from_str(r#"{"promptInstruction": "Plan for [USER_INPUT] now"}"#).unwrap();
        assert_eq!(request.prompt_for("a bakery"), "Plan for a bakery now");
    }

    #[test]
    fn offline_document_uses_full_fallback() {
        let orchestrator = DiagramOrchestrator::offline();
        let template = TemplateRequest {
            name: Some("Business Plan".to_string()),
            document_type: Some("business".to_string()),
            prompt_instruction: None,
        };
        let doc = block_on(orchestrator.generate_document("a bakery", &template)).unwrap();
        assert_eq!(doc.template_name, "Business Plan");
        assert_eq!(doc.document_type, "business");
        assert!(doc.content.starts_with("# Business Plan\n"));
        assert!(doc.content.contains("## Implementation Plan"));
        assert!(doc.content.contains("*Status: Ready for implementation*"));
    }

    #[test]
    fn batch_uses_brief_fallback() {
        let orchestrator = DiagramOrchestrator::offline();
        let docs = block_on(orchestrator.generate_documents(
            "a bakery",
            &[TemplateRequest::default(), TemplateRequest::default()],
        ))
        .unwrap();
        assert_eq!(docs.len(), 2);
        assert!(docs[0].content.contains("Detailed implementation plan for a bakery."));
        assert!(!docs[0].content.contains("Status:"));
    }

    #[test]
    fn validation_messages() {
        let orchestrator = DiagramOrchestrator::offline();
        let err = block_on(orchestrator.generate_documents("a bakery", &[])).unwrap_err();
        assert_eq!(err.to_string(), "User input and document templates are required");
        let err = block_on(orchestrator.generate_document("", &TemplateRequest::default())).unwrap_err();
        assert_eq!(err.to_string(), "User input is required");
    }
}
