//! Taleweaver Gateway - Main entry point.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use taleweaver_gateway::infrastructure::{
    ChatClient, ChatConfig, ContextRegistry, DispatchConfig, FanoutDispatcher, HttpAgentClient,
};
use taleweaver_gateway::{agents, api, roster, App};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv_from_repo_root();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taleweaver_gateway=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Taleweaver Gateway");

    // Load configuration
    let llm_url = require_env("LLM_URL")?;
    let llm_model = require_env("LLM_MODEL")?;
    let llm_token = require_env("LLM_API_TOKEN")?;
    let roster_path =
        std::env::var("AGENTS_CONFIG").unwrap_or_else(|_| "demos/agents.json".into());
    let server_host = std::env::var("GATEWAY_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let server_port: u16 = std::env::var("GATEWAY_PORT")
        .unwrap_or_else(|_| "9080".into())
        .parse()
        .unwrap_or(9080);
    let agent_timeout_secs: u64 = std::env::var("AGENT_TIMEOUT_SECS")
        .unwrap_or_else(|_| "15".into())
        .parse()
        .unwrap_or(15);

    let roster = roster::load(&roster_path)?;
    tracing::info!(agents = roster.len(), path = %roster_path, "Loaded agent roster");

    // Wire up the dispatch side
    let agent_timeout = Duration::from_secs(agent_timeout_secs);
    let registry = Arc::new(ContextRegistry::new());
    let transport = Arc::new(HttpAgentClient::new(agent_timeout));
    let dispatcher = FanoutDispatcher::new(
        &roster,
        registry.clone(),
        transport,
        DispatchConfig { agent_timeout },
    );
    let app = Arc::new(App::new(registry, dispatcher));

    // Host the NPC agents themselves
    let llm = ChatClient::new(ChatConfig::new(llm_url, llm_model, llm_token));
    let agent_host = server_host.clone();
    let agent_roster = roster.clone();
    let agent_task = tokio::spawn(async move {
        if let Err(e) = agents::serve_all(&agent_host, &agent_roster, &llm).await {
            tracing::error!(error = %e, "Agent runtime stopped");
        }
    });

    // Serve the gateway API
    let router = api::http::routes()
        .with_state(app)
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{server_host}:{server_port}").parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    agent_task.await?;
    Ok(())
}

fn require_env(name: &str) -> anyhow::Result<String> {
    std::env::var(name).map_err(|_| anyhow::anyhow!("Missing required environment variable: {name}"))
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
