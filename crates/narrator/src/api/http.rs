//! HTTP routes.

use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};

use taleweaver_domain::{CharacterId, PlayerId};
use taleweaver_shared::{ActionRequest, ActionResponse, InitializeRequest};

use crate::app::App;
use crate::use_cases::{CharacterSpec, InitializeError, TurnError, TurnOutcome, SILENCE_NARRATION};

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/", get(health))
        .route("/api/health", get(health))
        .route("/initialize", post(initialize))
        .route("/action", post(action))
}

async fn health() -> &'static str {
    "OK"
}

/// Initialize a player session with characters and a narrator prompt.
async fn initialize(
    State(app): State<Arc<App>>,
    Json(request): Json<InitializeRequest>,
) -> Result<(), ApiError> {
    let characters = request
        .characters
        .into_iter()
        .map(|c| CharacterSpec {
            character_id: CharacterId::new(c.agent_id),
            name: c.name,
            init_prompt: c.init_prompt,
        })
        .collect();

    app.use_cases
        .initialize
        .execute(
            PlayerId::new(request.player_id),
            request.narrator_prompt,
            characters,
        )
        .await?;
    Ok(())
}

/// Process a player action and return the winning character response.
async fn action(
    State(app): State<Arc<App>>,
    Json(request): Json<ActionRequest>,
) -> Result<Json<ActionResponse>, ApiError> {
    let outcome = app
        .use_cases
        .turn
        .execute(PlayerId::new(request.player_id), &request.player_action)
        .await?;

    let response = match outcome {
        TurnOutcome::AllSilent => ActionResponse {
            agent_id: CharacterId::NONE.as_i32(),
            message: SILENCE_NARRATION.to_string(),
        },
        TurnOutcome::Winner {
            character_id,
            message,
        } => ActionResponse {
            agent_id: character_id.as_i32(),
            message,
        },
    };
    Ok(Json(response))
}

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Internal(String),
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiError::NotFound(msg) => (axum::http::StatusCode::NOT_FOUND, msg).into_response(),
            ApiError::BadRequest(msg) => {
                (axum::http::StatusCode::BAD_REQUEST, msg).into_response()
            }
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal error",
                )
                    .into_response()
            }
        }
    }
}

impl From<TurnError> for ApiError {
    fn from(e: TurnError) -> Self {
        match e {
            TurnError::SessionNotFound(_) => ApiError::NotFound("Player session not found".into()),
            TurnError::Dispatch(inner) => ApiError::Internal(inner.to_string()),
            TurnError::NoValidResponse => ApiError::Internal("No valid response found".into()),
        }
    }
}

impl From<InitializeError> for ApiError {
    fn from(e: InitializeError) -> Self {
        match e {
            InitializeError::CharacterCountMismatch { .. } | InitializeError::Invalid(_) => {
                ApiError::BadRequest(e.to_string())
            }
            InitializeError::ContextSeed { .. } => ApiError::Internal(e.to_string()),
        }
    }
}
