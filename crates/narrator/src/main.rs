//! Taleweaver Narrator - Main entry point.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use taleweaver_narrator::infrastructure::{
    CompletionClient, CompletionConfig, GatewayClient,
};
use taleweaver_narrator::{api, roster, App};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv_from_repo_root();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taleweaver_narrator=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Taleweaver Narrator");

    // Load configuration
    let llm_url = require_env("LLM_URL")?;
    let llm_model = require_env("LLM_MODEL")?;
    let llm_token = require_env("LLM_API_TOKEN")?;
    let gateway_url =
        std::env::var("GATEWAY_URL").unwrap_or_else(|_| "http://127.0.0.1:9080".into());
    let roster_path =
        std::env::var("AGENTS_CONFIG").unwrap_or_else(|_| "demos/agents.json".into());
    let server_host = std::env::var("NARRATOR_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let server_port: u16 = std::env::var("NARRATOR_PORT")
        .unwrap_or_else(|_| "7999".into())
        .parse()
        .unwrap_or(7999);
    let completion_timeout_secs: u64 = std::env::var("COMPLETION_TIMEOUT_SECS")
        .unwrap_or_else(|_| "15".into())
        .parse()
        .unwrap_or(15);
    let agent_timeout_secs: u64 = std::env::var("AGENT_TIMEOUT_SECS")
        .unwrap_or_else(|_| "15".into())
        .parse()
        .unwrap_or(15);

    let roster = roster::load_addresses(&roster_path)?;
    tracing::info!(agents = roster.len(), path = %roster_path, "Loaded agent roster");

    // A broadcast waits on the gateway's full fan-out, so give the gateway
    // call a margin beyond the per-agent deadline.
    let gateway_timeout = Duration::from_secs(agent_timeout_secs + 5);
    let dispatch = Arc::new(GatewayClient::new(&gateway_url, gateway_timeout));

    let completion_config = CompletionConfig::new(llm_url, llm_model, llm_token)
        .with_timeout(Duration::from_secs(completion_timeout_secs));
    let completion = Arc::new(CompletionClient::new(completion_config));

    // Create application
    let app = Arc::new(App::new(roster, dispatch, completion));

    let router = api::http::routes()
        .with_state(app)
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr: SocketAddr = format!("{server_host}:{server_port}").parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

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
