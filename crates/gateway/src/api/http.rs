//! HTTP routes.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};

use taleweaver_domain::AgentAddress;
use taleweaver_shared::{
    AgentReply, InitContextRequest, InitContextResponse, SendMessageRequest, SendMessageResponse,
};

use crate::app::App;

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/", get(health))
        .route("/api/health", get(health))
        .route("/init", post(set_initial_context))
        .route("/send-message", post(send_message))
}

async fn health() -> &'static str {
    "OK"
}

/// Seed one agent's scene-setting context. Unconditionally overwrites.
async fn set_initial_context(
    State(app): State<Arc<App>>,
    Json(request): Json<InitContextRequest>,
) -> Json<InitContextResponse> {
    let address = AgentAddress::new(request.agent_address.clone());
    app.registry.set(address, request.initial_context);
    tracing::info!(agent = %request.agent_address, "Initial context set");

    Json(InitContextResponse {
        status: "success".to_string(),
        message: format!("Initial context set for {}", request.agent_address),
    })
}

/// Fan one message out to every recipient and collect all outcomes.
async fn send_message(
    State(app): State<Arc<App>>,
    Json(request): Json<SendMessageRequest>,
) -> Json<SendMessageResponse> {
    let recipients: Vec<AgentAddress> = request
        .recipients
        .iter()
        .map(|address| AgentAddress::new(address.clone()))
        .collect();

    let results = app
        .dispatcher
        .dispatch(&request.sender, &recipients, &request.message)
        .await;

    let results: HashMap<String, AgentReply> = results
        .into_iter()
        .map(|(address, text)| (address.to_string(), AgentReply { text }))
        .collect();

    Json(SendMessageResponse {
        status: "completed".to_string(),
        results,
    })
}
