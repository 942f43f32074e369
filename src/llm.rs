//! Chat-completion seam. Orchestrators hold an `Arc<dyn CompletionClient>` and
//! never reach for a global client.

use crate::error::{ExternalServiceError, snippet};
use futures::future::BoxFuture;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub system: String,
    pub prompt: String,
    /// Ask the service to constrain output to a JSON object.
    pub json_response: bool,
    pub temperature: f32,
    pub max_tokens: u32,
}

pub trait CompletionClient: Send + Sync {
    fn complete(&self, request: CompletionRequest) -> BoxFuture<'_, Result<String, ExternalServiceError>>;

    fn is_available(&self) -> bool {
        true
    }
}

/// Stand-in used when no API key is configured; every call falls back.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledClient;

impl CompletionClient for DisabledClient {
    fn complete(&self, _request: CompletionRequest) -> BoxFuture<'_, Result<String, ExternalServiceError>> {
        Box::pin(async { Err(ExternalServiceError::Unavailable) })
    }

    fn is_available(&self) -> bool {
        false
    }
}

static CODE_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\s*```[A-Za-z0-9_-]*\s*$").unwrap());

/// First `{` to last `}` of a completion, after dropping Markdown code fences.
/// Strict JSON is tried first, then the lenient JSON5 grammar.
pub fn extract_json_object(raw: &str) -> Result<Value, ExternalServiceError> {
    let cleaned = CODE_FENCE.replace_all(raw, "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return Err(ExternalServiceError::EmptyResponse);
    }
    let (Some(start), Some(end)) = (cleaned.find('{'), cleaned.rfind('}')) else {
        return Err(ExternalServiceError::NoJsonObject);
    };
    if end <= start {
        return Err(ExternalServiceError::NoJsonObject);
    }
    let candidate = &cleaned[start..=end];
    match serde_json::from_str::<Value>(candidate) {
        Ok(value) => Ok(value),
        Err(strict) => json5::from_str::<Value>(candidate).map_err(|_| {
            ExternalServiceError::InvalidJson(format!("{strict} in `{}`", snippet(candidate)))
        }),
    }
}

#[cfg(feature = "server")]
pub use groq::GroqClient;

#[cfg(feature = "server")]
mod groq {
    use super::*;
    use crate::config::LlmConfig;
    use serde::{Deserialize, Serialize};
    use std::time::Duration;

    /// OpenAI-compatible `/chat/completions` client (Groq by default).
    #[derive(Debug, Clone)]
    pub struct GroqClient {
        http: reqwest::Client,
        base_url: String,
        api_key: String,
    }

    #[derive(Serialize)]
    struct ChatRequest<'a> {
        model: &'a str,
        messages: [ChatMessage<'a>; 2],
        temperature: f32,
        max_tokens: u32,
        #[serde(skip_serializing_if = "Option::is_none")]
        response_format: Option<ResponseFormat>,
    }

    #[derive(Serialize)]
    struct ChatMessage<'a> {
        role: &'static str,
        content: &'a str,
    }

    #[derive(Serialize)]
    struct ResponseFormat {
        #[serde(rename = "type")]
        kind: &'static str,
    }

    #[derive(Deserialize)]
    struct ChatResponse {
        #[serde(default)]
        choices: Vec<ChatChoice>,
    }

    #[derive(Deserialize)]
    struct ChatChoice {
        message: ChatReply,
    }

    #[derive(Deserialize)]
    struct ChatReply {
        #[serde(default)]
        content: Option<String>,
    }

    impl GroqClient {
        pub fn new(config: &LlmConfig, api_key: &str) -> Result<Self, ExternalServiceError> {
            let http = reqwest::Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()
                .map_err(|err| ExternalServiceError::Transport(err.to_string()))?;
            Ok(Self {
                http,
                base_url: config.base_url.trim_end_matches('/').to_string(),
                api_key: api_key.to_string(),
            })
        }

        async fn send(&self, request: CompletionRequest) -> Result<String, ExternalServiceError> {
            let body = ChatRequest {
                model: &request.model,
                messages: [
                    ChatMessage {
                        role: "system",
                        content: &request.system,
                    },
                    ChatMessage {
                        role: "user",
                        content: &request.prompt,
                    },
                ],
                temperature: request.temperature,
                max_tokens: request.max_tokens,
                response_format: request
                    .json_response
                    .then_some(ResponseFormat { kind: "json_object" }),
            };
            let response = self
                .http
                .post(format!("{}/chat/completions", self.base_url))
                .bearer_auth(&self.api_key)
                .json(&body)
                .send()
                .await
                .map_err(|err| ExternalServiceError::Transport(err.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(ExternalServiceError::Status {
                    status: status.as_u16(),
                    body: snippet(&body),
                });
            }
            let parsed: ChatResponse = response
                .json()
                .await
                .map_err(|err| ExternalServiceError::Transport(err.to_string()))?;
            parsed
                .choices
                .into_iter()
                .next()
                .and_then(|choice| choice.message.content)
                .filter(|content| !content.trim().is_empty())
                .ok_or(ExternalServiceError::EmptyResponse)
        }
    }

    impl CompletionClient for GroqClient {
        fn complete(&self, request: CompletionRequest) -> BoxFuture<'_, Result<String, ExternalServiceError>> {
            Box::pin(self.send(request))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strips_fences_and_prose() {
        let raw = "Sure! Here you go:\n```json\n{\"steps\": {\"A\": [\"x\"]}}\n```\nEnjoy.";
        assert_eq!(extract_json_object(raw).unwrap(), json!({"steps": {"A": ["x"]}}));
    }

    #[test]
    fn accepts_lenient_json() {
        let raw = "{steps: {'Brew': ['Grind beans',],},}";
        assert_eq!(
            extract_json_object(raw).unwrap(),
            json!({"steps": {"Brew": ["Grind beans"]}})
        );
    }

    #[test]
    fn reports_missing_objects() {
        assert_eq!(extract_json_object("   "), Err(ExternalServiceError::EmptyResponse));
        assert_eq!(extract_json_object("no braces here"), Err(ExternalServiceError::NoJsonObject));
        assert!(matches!(
            extract_json_object("{\"steps\": [unterminated"),
            Err(ExternalServiceError::NoJsonObject)
        ));
        assert!(matches!(
            extract_json_object("{\"a\": }"),
            Err(ExternalServiceError::InvalidJson(_))
        ));
    }

    #[test]
    fn disabled_client_is_unavailable() {
        let client = DisabledClient;
        assert!(!client.is_available());
        let request = CompletionRequest {
            model: "m".to_string(),
            system: String::new(),
            prompt: String::new(),
            json_response: true,
            temperature: 0.7,
            max_tokens: 10,
        };
        let result = futures::executor::block_on(client.complete(request));
        assert_eq!(result, Err(ExternalServiceError::Unavailable));
    }
}
