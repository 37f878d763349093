use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{error, warn};

use crate::calendar::CalendarCache;
use crate::error::CalendarError;
use crate::pandascore::LeagueId;

const CALENDAR_CONTENT_TYPE: &str = "text/calendar; charset=utf-8";

#[derive(Clone)]
pub struct AppState {
    pub cache: CalendarCache,
}

/// Build the Axum router serving the league feeds.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/calendar/:league_id", get(calendar_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

/// GET /calendar/:league_id
async fn calendar_handler(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<impl IntoResponse, FeedError> {
    let league_id = parse_league_id(&raw_id)?;
    let document = state.cache.get(league_id).await?;

    Ok((
        [
            (header::CONTENT_TYPE, CALENDAR_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename={}.ics", league_id),
            ),
        ],
        document.to_string(),
    ))
}

/// GET /health
async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "cached_leagues": state.cache.len().await,
    }))
}

fn parse_league_id(raw: &str) -> Result<LeagueId, CalendarError> {
    raw.trim()
        .parse::<LeagueId>()
        .map_err(|_| CalendarError::MalformedLeagueId(raw.to_string()))
}

/// Converts calendar errors to plain-text HTTP responses.
pub struct FeedError(CalendarError);

impl From<CalendarError> for FeedError {
    fn from(err: CalendarError) -> Self {
        FeedError(err)
    }
}

impl IntoResponse for FeedError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            CalendarError::MalformedLeagueId(_) => StatusCode::BAD_REQUEST,
            CalendarError::Upstream { .. } | CalendarError::Decode { .. } => {
                StatusCode::BAD_GATEWAY
            }
            CalendarError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            CalendarError::Transport(_) | CalendarError::RefreshAborted(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if status.is_server_error() {
            error!("Calendar request failed: {}", self.0);
        } else {
            warn!("Rejected calendar request: {}", self.0);
        }

        (status, self.0.to_string()).into_response()
    }
}
