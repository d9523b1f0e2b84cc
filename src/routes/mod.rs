//! API routes

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, Json},
    routing::{get, post},
    Router,
};
use serde::Serialize;

use crate::conversation::Message;
use crate::core::{ChatRequest, ChatResponse};
use crate::AppState;

/// The bundled single-page chat UI.
const CHAT_PAGE: &str = include_str!("../../assets/chat.html");

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Serialize)]
struct SessionResponse {
    messages: Vec<Message>,
}

async fn index() -> Html<&'static str> {
    Html(CHAT_PAGE)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, (StatusCode, Json<ErrorResponse>)> {
    // Blank submissions never reach the engine; they are a no-op turn.
    if request.message.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "message must not be empty".into(),
            }),
        ));
    }

    Ok(Json(state.chat_engine.chat(request).await))
}

async fn session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionResponse>, StatusCode> {
    match state.chat_engine.session_messages(&session_id).await {
        Some(messages) => Ok(Json(SessionResponse { messages })),
        None => Err(StatusCode::NOT_FOUND),
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/v1/chat", post(chat))
        .route("/v1/session/:session_id", get(session))
}
