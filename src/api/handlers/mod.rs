use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use log::error;
use tokio::sync::Mutex;

use crate::api::BrawlStarsClient;
use crate::api::models::ErrorResponse;
use crate::config::{AppConfig, Emotes};
use crate::errors::CommandError;
use crate::services::community::CommunityService;

pub mod communities;
pub mod stats;

pub struct AppState {
    pub communities: CommunityService,
    pub config: AppConfig,
    pub emotes: Emotes,
    /// Absent when no API token is configured; adding players is then unavailable
    pub source: Option<Mutex<BrawlStarsClient>>,
}

/// Refused commands become client errors, anything else a server error
pub fn error_response(e: anyhow::Error) -> Response {
    let status = match e.downcast_ref::<CommandError>() {
        Some(CommandError::UnknownPlayer(_) | CommandError::NotTracked(_)) => StatusCode::NOT_FOUND,
        Some(CommandError::AlreadyTracked(_)) => StatusCode::CONFLICT,
        Some(_) => StatusCode::BAD_REQUEST,
        None => {
            error!("Request failed: {e:#}");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    (status, Json(ErrorResponse { error: e.to_string() })).into_response()
}
