//! HTTP API for the Payslip Engine.
//!
//! This module exposes the validator and the derived payslip figures
//! over a small REST API built on [`axum`](https://crates.io/crates/axum).
//! Request bodies carrying a payslip document are raw text, exactly
//! what a user would paste into the editor; every response is JSON.
//!
//! The server keeps one shared [`PayslipSession`], the same register
//! an editor would hold: submit a document, select a payslip, fetch
//! its summary.  `POST /api/validate` is a stateless alternative.

use crate::config::ServerConfig;
use crate::engine::{summarize_all, PayslipSummary};
use crate::error::ValidationError;
use crate::models::PayslipDocument;
use crate::overlay::{apply_profiles, ClientProfile, OrganizationProfile};
use crate::session::{FailurePolicy, PayslipSession, Submission};
use crate::validate::{format_json, validate};
use anyhow::Result;
use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Application state shared across requests.
pub struct AppState {
    pub session: RwLock<PayslipSession>,
}

impl AppState {
    pub fn new(policy: FailurePolicy) -> Self {
        Self {
            session: RwLock::new(PayslipSession::new(policy)),
        }
    }
}

/// Build the API router around a fresh session.  Returns the router
/// and a handle to the state.
pub fn build_router(config: &ServerConfig) -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(config.failure_policy));
    let router = Router::new()
        .route("/api/validate", post(validate_handler))
        .route("/api/format", post(format_handler))
        .route("/api/overlay", post(overlay_handler))
        .route(
            "/api/session",
            get(session_handler)
                .put(submit_handler)
                .delete(clear_handler),
        )
        .route("/api/session/select/:index", post(select_handler))
        .route("/api/session/summary", get(summary_handler))
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .with_state(state.clone());
    (router, state)
}

fn rejection(err: &ValidationError) -> Response {
    let body = Json(json!({"error": err.to_string()}));
    (StatusCode::UNPROCESSABLE_ENTITY, body).into_response()
}

/// Request bodies are read as bytes so that text which is not UTF-8
/// gets the same JSON rejection as any other malformed document.
fn body_text(body: Bytes) -> Result<String, ValidationError> {
    String::from_utf8(body.to_vec()).map_err(|err| ValidationError::MalformedInput(err.to_string()))
}

fn not_found(message: &str) -> Response {
    (StatusCode::NOT_FOUND, Json(json!({"error": message}))).into_response()
}

#[derive(Serialize)]
struct ValidateResponse {
    document: PayslipDocument,
    summaries: Vec<PayslipSummary>,
}

#[derive(Serialize)]
struct SessionView<'a> {
    document: Option<&'a PayslipDocument>,
    error: Option<String>,
    selected: usize,
    /// One label per payslip, for a payslip picker.
    labels: Vec<String>,
}

impl<'a> SessionView<'a> {
    fn of(session: &'a PayslipSession) -> Self {
        let document = session.document();
        Self {
            document,
            error: session.error().map(ToString::to_string),
            selected: session.selected_index(),
            labels: document
                .map(|d| d.payslips.iter().map(|p| p.selector_label()).collect())
                .unwrap_or_default(),
        }
    }
}

#[derive(Deserialize)]
struct OverlayRequest {
    document: String,
    #[serde(default)]
    organization: Option<OrganizationProfile>,
    #[serde(default)]
    client: Option<ClientProfile>,
}

/// Handler for POST /api/validate
async fn validate_handler(body: Bytes) -> Response {
    let body = match body_text(body) {
        Ok(text) => text,
        Err(err) => return rejection(&err),
    };
    match validate(&body) {
        Ok(document) => {
            let summaries = summarize_all(&document);
            (StatusCode::OK, Json(ValidateResponse { document, summaries })).into_response()
        }
        Err(err) => rejection(&err),
    }
}

/// Handler for POST /api/format
async fn format_handler(body: Bytes) -> Response {
    match body_text(body).and_then(|text| format_json(&text)) {
        Ok(pretty) => (StatusCode::OK, Json(json!({"document": pretty}))).into_response(),
        Err(err) => rejection(&err),
    }
}

/// Handler for POST /api/overlay
async fn overlay_handler(Json(request): Json<OverlayRequest>) -> Response {
    match apply_profiles(
        &request.document,
        request.organization.as_ref(),
        request.client.as_ref(),
    ) {
        Ok(document) => (StatusCode::OK, Json(json!({"document": document}))).into_response(),
        Err(err) => rejection(&err),
    }
}

/// Handler for GET /api/session
async fn session_handler(State(app_state): State<Arc<AppState>>) -> Response {
    let session = app_state.session.read().await;
    Json(SessionView::of(&session)).into_response()
}

/// Handler for PUT /api/session
async fn submit_handler(State(app_state): State<Arc<AppState>>, body: Bytes) -> Response {
    let body = match body_text(body) {
        Ok(text) => text,
        Err(err) => return rejection(&err),
    };
    let mut session = app_state.session.write().await;
    match session.submit(&body) {
        Submission::Accepted { payslips } => {
            info!("session document replaced ({} payslips)", payslips);
            Json(SessionView::of(&session)).into_response()
        }
        Submission::Ignored => {
            debug!("blank session submission ignored");
            Json(SessionView::of(&session)).into_response()
        }
        Submission::Rejected(err) => rejection(&err),
    }
}

/// Handler for DELETE /api/session
async fn clear_handler(State(app_state): State<Arc<AppState>>) -> Response {
    let mut session = app_state.session.write().await;
    session.clear();
    Json(SessionView::of(&session)).into_response()
}

/// Handler for POST /api/session/select/:index
async fn select_handler(
    State(app_state): State<Arc<AppState>>,
    Path(index): Path<usize>,
) -> Response {
    let mut session = app_state.session.write().await;
    if session.select(index).is_none() {
        return not_found("no payslip at that index");
    }
    Json(SessionView::of(&session)).into_response()
}

/// Handler for GET /api/session/summary
async fn summary_handler(State(app_state): State<Arc<AppState>>) -> Response {
    let session = app_state.session.read().await;
    match session.selected_summary() {
        Some(summary) => Json(summary).into_response(),
        None => not_found("no payslip selected"),
    }
}

/// Launch the API server and block until it terminates.
pub async fn serve(config: ServerConfig) -> Result<()> {
    let (router, _state) = build_router(&config);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("Server listening on {}", config.bind_addr);
    axum::serve(listener, router).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn document() -> Bytes {
        Bytes::from(json!({
            "organization": {"name": "Acme", "address": "123 St", "email": "hr@acme.test"},
            "payslips": [
                {
                    "month": "March", "year": 2024, "currencySymbol": "$",
                    "employee": {"id": "E1", "name": "A"},
                    "salaryComponents": [
                        {"name": "Basic", "amount": 50000, "type": "earning"},
                        {"name": "Tax", "amount": 16200, "type": "deduction"}
                    ]
                },
                {
                    "month": "April", "year": 2024,
                    "employee": {"id": "E2", "name": "B"},
                    "salaryComponents": [],
                    "client": {"contact_email": "ops@globex.test"}
                }
            ]
        })
        .to_string())
    }

    fn state() -> Arc<AppState> {
        Arc::new(AppState::new(FailurePolicy::RetainDocument))
    }

    #[tokio::test]
    async fn validate_returns_document_and_summaries() {
        let response = validate_handler(document()).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["summaries"][0]["netPay"], 33800.0);
        assert_eq!(body["summaries"][0]["identity"]["email"], "hr@acme.test");
        assert_eq!(body["summaries"][1]["identity"]["kind"], "client");
        assert!(body["document"]["payslips"][1]["client"]["id"]
            .as_str()
            .unwrap()
            .starts_with("client-"));
    }

    #[tokio::test]
    async fn validate_rejects_with_message() {
        let response = validate_handler(Bytes::from_static(b"{\"payslips\": []}")).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(body["error"], ValidationError::NoIdentitySource.to_string());
    }

    #[tokio::test]
    async fn session_flow_submit_select_summarize() {
        let state = state();
        let response = submit_handler(State(state.clone()), document()).await;
        assert_eq!(response.status(), StatusCode::OK);
        let view = body_json(response).await;
        assert_eq!(view["labels"], json!(["A - March 2024", "B - April 2024"]));

        let response = select_handler(State(state.clone()), Path(1)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let summary = body_json(summary_handler(State(state.clone())).await).await;
        assert_eq!(summary["label"], "B - April 2024");
        assert_eq!(summary["netPayInWords"], "Zero");
        assert_eq!(summary["identity"]["email"], "ops@globex.test");

        let response = select_handler(State(state.clone()), Path(9)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn failed_submission_keeps_document_under_retain_policy() {
        let state = state();
        submit_handler(State(state.clone()), document()).await;
        let response = submit_handler(State(state.clone()), Bytes::from_static(b"not json")).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let view = body_json(session_handler(State(state.clone())).await).await;
        assert!(view["document"].is_object());
        assert!(view["error"].as_str().unwrap().starts_with("Invalid JSON format: "));

        let view = body_json(clear_handler(State(state.clone())).await).await;
        assert!(view["document"].is_null());
        let response = summary_handler(State(state)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn format_and_overlay() {
        let body = body_json(format_handler(Bytes::from_static(b"{\"a\":1}")).await).await;
        assert_eq!(body["document"], "{\n  \"a\": 1\n}");

        let request = OverlayRequest {
            document: "{\"payslips\": []}".to_string(),
            organization: Some(OrganizationProfile {
                name: Some("Acme".into()),
                address: Some("123 St".into()),
                ..Default::default()
            }),
            client: None,
        };
        let body = body_json(overlay_handler(Json(request)).await).await;
        let merged: Value = serde_json::from_str(body["document"].as_str().unwrap()).unwrap();
        assert_eq!(merged["organization"]["name"], "Acme");
    }

    #[tokio::test]
    async fn non_utf8_bodies_are_rejected_as_malformed() {
        let invalid = || Bytes::from_static(&[0xff, 0xfe, b'{']);
        for response in [
            validate_handler(invalid()).await,
            format_handler(invalid()).await,
            submit_handler(State(state()), invalid()).await,
        ] {
            assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
            let body = body_json(response).await;
            assert!(body["error"].as_str().unwrap().starts_with("Invalid JSON format: "));
        }
    }

    #[test]
    fn router_builds_with_configured_policy() {
        let config = ServerConfig {
            failure_policy: FailurePolicy::ClearDocument,
            ..ServerConfig::default()
        };
        let (_router, state) = build_router(&config);
        assert_eq!(
            state.session.try_read().unwrap().policy(),
            FailurePolicy::ClearDocument
        );
    }
}
