use axum::{
    Router,
    routing::{delete, get, put},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::api::handlers::{
    AppState,
    communities::{add_player, list_players, remove_player, update_settings},
    stats::get_stats,
};

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/api/communities/:id/players",
            get(list_players).post(add_player),
        )
        .route("/api/communities/:id/players/:tag", delete(remove_player))
        .route("/api/communities/:id/settings", put(update_settings))
        .route("/api/communities/:id/stats/:mode", get(get_stats))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
