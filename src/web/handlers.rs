//! HTTP request handlers

use super::state::AppState;
use crate::backend::PersonRecord;
use crate::greeting::PersonName;
use crate::person::{update_summary, PersonUpdate};
use crate::query::ToolArgs;
use crate::results::{TopicOutcome, TopicReport};
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Form, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;
use tera::Context;

/// Query parameters for the embed page
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct IndexParams {
    pub name: String,
}

/// Query parameters for the gallery page
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GalleryParams {
    /// Topics, delimited by `;`, `|` or `,`
    pub topics: String,
    pub name: String,
}

/// Body of a call-start request
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct WidgetCallRequest {
    pub name: String,
}

/// Query parameters for the person lookup helper
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PersonParams {
    pub name: String,
}

/// One rendered slot in the gallery: a card or a status line
#[derive(Debug, Serialize)]
pub struct CardView {
    pub topic: String,
    pub status: Option<String>,
    /// Backend error message shown under the status line
    pub detail: Option<String>,
    pub failed: bool,
    pub image: Option<ImageCard>,
}

#[derive(Debug, Serialize)]
pub struct ImageCard {
    pub id: String,
    pub src: String,
    pub alt: String,
    pub score: f64,
    pub score_label: String,
    pub download_name: String,
    pub description: String,
}

/// Result of a person form submission
#[derive(Debug, Serialize)]
pub struct PersonUpdateView {
    pub status: String,
    /// `success` or `error`
    pub kind: &'static str,
    /// Pretty-printed backend answer
    pub result: String,
}

impl PersonUpdateView {
    fn success(answer: &Value) -> Self {
        Self {
            status: update_summary(answer),
            kind: "success",
            result: serde_json::to_string_pretty(answer).unwrap_or_default(),
        }
    }

    fn error(message: String, result: Value) -> Self {
        Self {
            status: message,
            kind: "error",
            result: serde_json::to_string_pretty(&result).unwrap_or_default(),
        }
    }
}

impl CardView {
    fn from_report(report: &TopicReport, state: &AppState) -> Self {
        let image = report.outcome.chosen().map(|result| {
            let id = if result.id.is_empty() {
                None
            } else {
                Some(result.id.clone())
            };
            ImageCard {
                src: state.settings.backend.resolve_asset(&result.path),
                alt: id.clone().unwrap_or_else(|| "result".to_string()),
                score: result.score,
                score_label: format!("{:.3}", result.score),
                download_name: format!("{}.jpg", id.as_deref().unwrap_or("image")),
                description: result.description.clone().unwrap_or_default(),
                id: result.id.clone(),
            }
        });

        Self {
            topic: report.topic.clone(),
            status: report.outcome.status_message(),
            detail: report.outcome.detail(),
            failed: matches!(report.outcome, TopicOutcome::Failed { .. }),
            image,
        }
    }
}

fn render(state: &AppState, template: &str, ctx: &Context) -> Response {
    match state.templates.render_with_context(template, ctx) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("Template error: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
        }
    }
}

/// Embed page handler
pub async fn index(State(state): State<AppState>, Query(params): Query<IndexParams>) -> Response {
    let mut session = state.widget_session(&params.name);
    if !params.name.trim().is_empty() {
        session.refresh_greeting(&state.greeter).await;
    }

    let mut ctx = Context::new();
    ctx.insert("instance_name", state.instance_name());
    ctx.insert("name", session.name());
    ctx.insert("widget", session.settings());
    ctx.insert("attributes", &session.attributes());

    render(&state, "index.html", &ctx)
}

/// Gallery handler: one card or status line per topic
pub async fn gallery(
    State(state): State<AppState>,
    Query(params): Query<GalleryParams>,
) -> Response {
    let aggregation = state.show_image.run(&ToolArgs::topic(params.topics)).await;

    let cards: Vec<CardView> = aggregation
        .reports
        .iter()
        .map(|report| CardView::from_report(report, &state))
        .collect();

    let mut ctx = Context::new();
    ctx.insert("instance_name", state.instance_name());
    ctx.insert("name", &params.name);
    ctx.insert("thumb_size", &state.settings.widget.thumb_size);
    ctx.insert("cards", &cards);

    render(&state, "gallery.html", &ctx)
}

/// Client tool dispatch
pub async fn call_tool(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Bytes,
) -> Response {
    let args: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);

    match state.tools.invoke(&name, args).await {
        Some(output) => Json(output).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("unknown tool: {}", name) })),
        )
            .into_response(),
    }
}

/// List registered client tools
pub async fn list_tools(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.tools.list())
}

/// Call-start hook: refreshed widget attributes plus client tools
pub async fn widget_call(State(state): State<AppState>, body: Bytes) -> impl IntoResponse {
    let request: WidgetCallRequest = serde_json::from_slice(&body).unwrap_or_default();
    let mut session = state.widget_session(&request.name);
    let config = session.start_call(&state.greeter, &state.tools).await;
    Json(config)
}

/// Raw person lookup
pub async fn person(State(state): State<AppState>, Query(params): Query<PersonParams>) -> Response {
    let name = PersonName::parse(&params.name);
    if name.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "name is required" })),
        )
            .into_response();
    }

    match state.people.lookup(&name).await {
        Ok(PersonRecord::Json(value)) => Json(value).into_response(),
        Ok(PersonRecord::Text(text)) => text.into_response(),
        Err(e) => {
            tracing::warn!("Person lookup for '{}' failed: {}", name.full(), e);
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": format!("Request failed: {}", e) })),
            )
                .into_response()
        }
    }
}

/// Person form submission: validate, forward to the backend, summarize
pub async fn update_person(
    State(state): State<AppState>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    let update = PersonUpdate::from_form(&form);

    let (code, view) = match update.validate() {
        Err(e) => (
            StatusCode::BAD_REQUEST,
            PersonUpdateView::error(e.to_string(), json!({})),
        ),
        Ok(()) => match state.people.update(&update).await {
            Ok(answer) => (StatusCode::OK, PersonUpdateView::success(&answer)),
            Err(e) => {
                tracing::warn!("Person update failed: {}", e);
                let message = e.to_string();
                (
                    StatusCode::BAD_GATEWAY,
                    PersonUpdateView::error(message.clone(), json!({ "error": message })),
                )
            }
        },
    };

    let mut ctx = Context::new();
    ctx.insert("instance_name", state.instance_name());
    ctx.insert("update", &view);

    let mut response = render(&state, "person.html", &ctx);
    if response.status().is_success() {
        *response.status_mut() = code;
    }
    response
}

/// Health check handler
pub async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": crate::VERSION
    }))
}

/// Metrics snapshot
pub async fn stats(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.metrics.snapshot())
}
