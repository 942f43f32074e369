#![cfg(feature = "server")]

use axum::body::{Body, to_bytes};
use axum::http::header::CONTENT_TYPE;
use axum::http::{Request, StatusCode};
use napkin_diagrams::DiagramOrchestrator;
use napkin_diagrams::config::ServerConfig;
use napkin_diagrams::server::{AppState, router};
use serde_json::{Value, json};
use tower::ServiceExt;

fn app() -> axum::Router {
    router(AppState::new(DiagramOrchestrator::offline(), ServerConfig::default()))
}

async fn post_json(uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .expect("request"),
        )
        .await
        .expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    (status, serde_json::from_slice(&bytes).expect("json body"))
}

async fn get_json(uri: &str) -> (StatusCode, Value) {
    let response = app()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
        .await
        .expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    (status, serde_json::from_slice(&bytes).expect("json body"))
}

#[tokio::test]
async fn coffee_shop_flowchart_without_llm() {
    let (status, body) = post_json(
        "/generate_napkin_diagram",
        json!({
            "userInput": "coffee shop",
            "napkinTemplate": {"name": "Coffee Flow", "napkinType": "flowchart"}
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["templateName"], "Coffee Flow");
    assert_eq!(body["isDiagram"], true);
    assert_eq!(body["diagramType"], "flowchart");
    assert!(body.get("error").is_none());
    let content = body["content"].as_str().unwrap();
    assert!(content.matches("class=\"step\"").count() >= 3);
}

#[tokio::test]
async fn blank_input_is_rejected() {
    let (status, body) = post_json(
        "/generate_napkin_diagram",
        json!({"userInput": "  ", "napkinTemplate": {"napkinType": "erd"}}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "User input is required");

    let (status, body) = post_json("/generate_napkin_diagram", json!({"userInput": "tea"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Napkin template is required");
}

#[tokio::test]
async fn empty_body_is_rejected() {
    let response = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/generate_diagram_variations")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    let body: Value = serde_json::from_slice(&bytes).expect("json body");
    assert_eq!(body["error"], "No JSON data received");
}

#[tokio::test]
async fn variations_endpoint_returns_four() {
    let (status, body) = post_json(
        "/generate_diagram_variations",
        json!({"userInput": "pet adoption", "diagramType": "mind map"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalVariations"], 4);
    assert_eq!(body["userInput"], "pet adoption");
    let variations = body["variations"].as_array().unwrap();
    assert_eq!(variations.len(), 4);
    assert_eq!(variations[0]["templateName"], "Mind Map - Standard");
    assert_eq!(variations[3]["colorTheme"], "orange");
    assert_eq!(variations[2]["isDiagram"], true);
}

#[tokio::test]
async fn regenerate_echoes_current_svg_offline() {
    let (status, body) = post_json(
        "/regenerate_diagram",
        json!({"prompt": "add a step", "diagramType": "flowchart", "currentSvg": "<svg>old</svg>"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["svg"], "<svg>old</svg>");
    assert_eq!(body["using_ai"], false);
    assert_eq!(body["success"], true);

    let (status, body) = post_json("/regenerate_diagram", json!({"diagramType": "flowchart"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Prompt is required");
}

#[tokio::test]
async fn health_reports_disconnected_client() {
    let (status, body) = get_json("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["groq_client"], "disconnected");
    assert_eq!(body["version"], "4.0.0");
    assert_eq!(body["server_port"], 5000);
    let supported = body["supported_diagrams"].as_array().unwrap();
    assert_eq!(supported.len(), 12);
    assert!(supported.contains(&json!("swot analysis")));
}

#[tokio::test]
async fn document_endpoints() {
    let (status, templates) = get_json("/document_templates").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(templates.as_array().unwrap().len(), 5);
    assert_eq!(templates[1]["documentType"], "technical");

    let (status, document) = post_json(
        "/generate_document",
        json!({"userInput": "a food truck", "documentTemplate": templates[0].clone()}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(document["templateName"], "Business Plan");
    assert!(document["content"].as_str().unwrap().contains("a food truck"));

    let (status, documents) = post_json(
        "/generate_documents",
        json!({"userInput": "a food truck", "documentTemplates": [templates[2].clone(), templates[3].clone()]}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(documents.as_array().unwrap().len(), 2);

    let (status, body) = post_json("/generate_documents", json!({"userInput": "a food truck"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "User input and document templates are required");
}

#[tokio::test]
async fn index_lists_endpoints() {
    let (status, body) = get_json("/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["endpoints"].get("generate_napkin_diagram").is_some());
}
