//! Hosted NPC agent runtime.
//!
//! Each configured agent runs its own small HTTP server exposing the query
//! endpoint the dispatcher fans out to: `POST /query {message} -> {text}`.
//! An agent answers by handing the message to the completion service; if the
//! service is unavailable it abstains with the silence sentinel instead of
//! surfacing an error into arbitration.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};

use taleweaver_domain::SILENCE;
use taleweaver_shared::{AgentQueryRequest, AgentQueryResponse};

use crate::infrastructure::llm::ChatClient;
use crate::roster::AgentConfig;

/// One hosted agent: a name for logs and its completion client.
pub struct AgentHost {
    name: String,
    llm: ChatClient,
}

impl AgentHost {
    pub fn new(name: impl Into<String>, llm: ChatClient) -> Self {
        Self {
            name: name.into(),
            llm,
        }
    }

    /// The agent's query router.
    pub fn router(self) -> Router {
        Router::new()
            .route("/query", post(handle_query))
            .with_state(Arc::new(self))
    }
}

async fn handle_query(
    State(agent): State<Arc<AgentHost>>,
    Json(request): Json<AgentQueryRequest>,
) -> Json<AgentQueryResponse> {
    tracing::info!(agent = %agent.name, "Received query");

    let text = match agent.llm.complete(&request.message).await {
        Ok(text) => text,
        Err(e) => {
            tracing::error!(agent = %agent.name, error = %e, "Completion failed, staying silent");
            SILENCE.to_string()
        }
    };
    Json(AgentQueryResponse { text })
}

/// Serve every configured agent on its own port until shutdown.
pub async fn serve_all(
    host: &str,
    roster: &[AgentConfig],
    llm: &ChatClient,
) -> anyhow::Result<()> {
    let mut handles = Vec::with_capacity(roster.len());
    for agent in roster {
        let router = AgentHost::new(agent.name.clone(), llm.clone()).router();
        let addr: SocketAddr = format!("{host}:{}", agent.port).parse()?;
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!(agent = %agent.name, %addr, "Agent listening");
        handles.push(tokio::spawn(async move {
            axum::serve(listener, router).await
        }));
    }

    for handle in handles {
        handle.await??;
    }
    Ok(())
}
