//! JSON-over-HTTP surface. Every handler answers 200 except request
//! validation failures, which answer 400 `{error}`.

use crate::config::{Config, LlmConfig, ServerConfig};
use crate::document::{DOCUMENT_TEMPLATES, TemplateRequest};
use crate::error::RequestValidationError;
use crate::ir::DiagramKind;
use crate::llm::{CompletionClient, DisabledClient, GroqClient};
use crate::pipeline::{DiagramOrchestrator, DiagramRequest, RenderedDiagram, timestamp_now};
use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{info, warn};

pub const SERVICE_VERSION: &str = "4.0.0";

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<DiagramOrchestrator>,
    pub server: ServerConfig,
}

impl AppState {
    pub fn new(orchestrator: DiagramOrchestrator, server: ServerConfig) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            server,
        }
    }
}

struct ApiError(RequestValidationError);

impl From<RequestValidationError> for ApiError {
    fn from(value: RequestValidationError) -> Self {
        ApiError(value)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        warn!(error = %self.0, "rejected request");
        (StatusCode::BAD_REQUEST, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

/// Missing, empty or malformed bodies are all reported the same way.
fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(RequestValidationError::EmptyBody.into());
    }
    serde_json::from_slice(body).map_err(|_| RequestValidationError::EmptyBody.into())
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct NapkinTemplate {
    name: Option<String>,
    napkin_type: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct NapkinRequest {
    user_input: String,
    napkin_template: Option<NapkinTemplate>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RegenerateRequest {
    prompt: String,
    diagram_type: Option<String>,
    current_svg: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct VariationsRequest {
    user_input: String,
    diagram_type: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct DocumentRequest {
    user_input: String,
    document_template: TemplateRequest,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct DocumentsRequest {
    user_input: String,
    document_templates: Vec<TemplateRequest>,
}

fn diagram_body(diagram: &RenderedDiagram) -> serde_json::Map<String, Value> {
    let mut body = serde_json::Map::new();
    body.insert("templateName".into(), json!(diagram.template_name));
    body.insert("content".into(), json!(diagram.content));
    body.insert("isDiagram".into(), json!(true));
    body.insert("diagramType".into(), json!(diagram.diagram_type));
    body.insert("timestamp".into(), json!(diagram.timestamp));
    body
}

async fn index() -> Json<Value> {
    Json(json!({
        "service": "napkin-diagrams",
        "version": SERVICE_VERSION,
        "status": "running",
        "endpoints": {
            "health": "GET /health",
            "generate_napkin_diagram": "POST /generate_napkin_diagram",
            "regenerate_diagram": "POST /regenerate_diagram",
            "generate_diagram_variations": "POST /generate_diagram_variations",
            "generate_document": "POST /generate_document",
            "generate_documents": "POST /generate_documents",
            "document_templates": "GET /document_templates",
        },
    }))
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    let supported: Vec<&str> = DiagramKind::ALL.iter().map(|kind| kind.as_str()).collect();
    Json(json!({
        "status": "healthy",
        "timestamp": timestamp_now(),
        "groq_client": if state.orchestrator.client_available() { "connected" } else { "disconnected" },
        "version": SERVICE_VERSION,
        "server_host": state.server.host,
        "server_port": state.server.port,
        "supported_diagrams": supported,
    }))
}

async fn generate_napkin_diagram(State(state): State<AppState>, body: Bytes) -> Result<Json<Value>, ApiError> {
    let request: NapkinRequest = parse_body(&body)?;
    if request.user_input.trim().is_empty() {
        return Err(RequestValidationError::MissingField { field: "User input" }.into());
    }
    let template = request
        .napkin_template
        .ok_or(RequestValidationError::MissingField { field: "Napkin template" })?;
    let request = DiagramRequest::new(
        &request.user_input,
        template.napkin_type.as_deref().unwrap_or_default(),
        template.name.as_deref(),
    )?;

    let body = match state.orchestrator.generate(&request).await {
        Ok(diagram) => diagram_body(&diagram),
        Err(warning) => {
            let mut body = diagram_body(&warning.diagram);
            body.insert("error".into(), json!(warning.cause.to_string()));
            body
        }
    };
    Ok(Json(Value::Object(body)))
}

async fn regenerate_diagram(State(state): State<AppState>, body: Bytes) -> Result<Json<Value>, ApiError> {
    let request: RegenerateRequest = parse_body(&body)?;
    let diagram_type = request.diagram_type.as_deref().unwrap_or("flowchart");
    let result = state
        .orchestrator
        .regenerate(&request.prompt, diagram_type, &request.current_svg)
        .await?;
    Ok(Json(json!({
        "svg": result.svg,
        "success": result.success,
        "timestamp": result.timestamp,
        "using_ai": result.using_ai,
        "message": result.message,
    })))
}

async fn generate_diagram_variations(State(state): State<AppState>, body: Bytes) -> Result<Response, ApiError> {
    let request: VariationsRequest = parse_body(&body)?;
    let diagram_type = request.diagram_type.as_deref().unwrap_or("flowchart");
    let set = state
        .orchestrator
        .generate_variations(&request.user_input, diagram_type)
        .await?;
    Ok(Json(set).into_response())
}

async fn generate_document(State(state): State<AppState>, body: Bytes) -> Result<Response, ApiError> {
    let request: DocumentRequest = parse_body(&body)?;
    let document = state
        .orchestrator
        .generate_document(&request.user_input, &request.document_template)
        .await?;
    Ok(Json(document).into_response())
}

async fn generate_documents(State(state): State<AppState>, body: Bytes) -> Result<Response, ApiError> {
    let request: DocumentsRequest = parse_body(&body)?;
    let documents = state
        .orchestrator
        .generate_documents(&request.user_input, &request.document_templates)
        .await?;
    Ok(Json(documents).into_response())
}

async fn document_templates() -> Response {
    Json(&DOCUMENT_TEMPLATES).into_response()
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/generate_napkin_diagram", post(generate_napkin_diagram))
        .route("/regenerate_diagram", post(regenerate_diagram))
        .route("/generate_diagram_variations", post(generate_diagram_variations))
        .route("/generate_document", post(generate_document))
        .route("/generate_documents", post(generate_documents))
        .route("/document_templates", get(document_templates))
        .with_state(state)
}

/// Groq client when a key is configured, otherwise the always-fallback client.
pub fn build_client(llm: &LlmConfig) -> Arc<dyn CompletionClient> {
    let Some(key) = llm.api_key() else {
        warn!("no completion API key configured, serving canned data");
        return Arc::new(DisabledClient);
    };
    match GroqClient::new(llm, key) {
        Ok(client) => Arc::new(client),
        Err(err) => {
            warn!(error = %err, "completion client unavailable, serving canned data");
            Arc::new(DisabledClient)
        }
    }
}

pub async fn serve(config: &Config) -> anyhow::Result<()> {
    let orchestrator = DiagramOrchestrator::new(build_client(&config.llm), config.llm.clone());
    let state = AppState::new(orchestrator, config.server.clone());
    let address = config.server.address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!(address = %address, llm = state.orchestrator.client_available(), "listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("shutting down");
            }
        })
        .await?;
    Ok(())
}
