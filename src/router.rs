use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use log::error;
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};

use crate::config::AppConfig;

pub struct RouterState {
  pub config: AppConfig,
  pub http: reqwest::Client,
}

impl RouterState {
  pub fn new(config: AppConfig) -> Self {
    Self {
      config,
      http: reqwest::Client::new(),
    }
  }
}

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
  #[error("messages must be array")]
  BadRequest,
  #[error("upstream returned {status}")]
  Upstream { status: StatusCode, body: String },
  #[error(transparent)]
  Transport(#[from] reqwest::Error),
}

impl IntoResponse for RelayError {
  fn into_response(self) -> Response {
    match self {
      RelayError::BadRequest => (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": "messages must be array" })),
      )
        .into_response(),
      RelayError::Upstream { status, body } => (status, body).into_response(),
      RelayError::Transport(_) => server_error_response(),
    }
  }
}

// The transport cause is logged at the call site, never surfaced to the caller.
fn server_error_response() -> Response {
  (
    StatusCode::INTERNAL_SERVER_ERROR,
    Json(json!({ "error": "Server error" })),
  )
    .into_response()
}

pub async fn run_router(listener: tokio::net::TcpListener, state: RouterState) -> anyhow::Result<()> {
  let app = Router::new()
    .route("/health", get(health))
    .route("/api/chat", post(chat))
    .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
    .with_state(Arc::new(state));

  axum::serve(listener, app).await?;
  Ok(())
}

async fn health(State(state): State<Arc<RouterState>>) -> Json<Value> {
  Json(json!({
    "status": "ok",
    "model": state.config.model
  }))
}

async fn chat(State(state): State<Arc<RouterState>>, Json(body): Json<Value>) -> Response {
  let messages = match parse_messages(&body) {
    Ok(messages) => messages,
    Err(err) => return err.into_response(),
  };

  match forward_chat(&state, messages).await {
    Ok((status, data)) => (status, Json(data)).into_response(),
    Err(err) => {
      match &err {
        RelayError::Upstream { status, body } => error!("upstream error {}: {}", status, body),
        RelayError::Transport(cause) => error!("relay transport failure: {}", cause),
        RelayError::BadRequest => {}
      }
      err.into_response()
    }
  }
}

fn parse_messages(body: &Value) -> Result<&Vec<Value>, RelayError> {
  body
    .get("messages")
    .and_then(|m| m.as_array())
    .ok_or(RelayError::BadRequest)
}

// Caller messages pass through untouched; model parameters are fixed
// configuration, never caller-controlled.
fn upstream_payload(config: &AppConfig, messages: &[Value]) -> Value {
  json!({
    "model": config.model,
    "messages": messages,
    "max_tokens": config.max_tokens,
    "temperature": config.temperature,
  })
}

async fn forward_chat(state: &RouterState, messages: &[Value]) -> Result<(StatusCode, Value), RelayError> {
  let url = format!(
    "{}/v1/chat/completions",
    state.config.api_base.trim_end_matches('/')
  );

  let resp = state
    .http
    .post(url)
    .bearer_auth(state.config.api_key.as_deref().unwrap_or_default())
    .json(&upstream_payload(&state.config, messages))
    .send()
    .await?;

  let status = StatusCode::from_u16(resp.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
  if !status.is_success() {
    let body = resp.text().await.unwrap_or_default();
    return Err(RelayError::Upstream { status, body });
  }

  let data = resp.json::<Value>().await?;
  Ok((status, data))
}
