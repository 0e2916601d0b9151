use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use std::sync::Arc;

use super::{AppState, error_response};
use crate::stats::{render_compact, render_wide};

#[derive(Debug, Default, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    #[default]
    Wide,
    Compact,
    Json,
}

#[derive(Deserialize)]
pub struct StatsParams {
    layout: Option<Layout>,
}

pub async fn get_stats(
    State(state): State<Arc<AppState>>,
    Path((community_id, mode)): Path<(String, String)>,
    Query(params): Query<StatsParams>,
) -> impl IntoResponse {
    let snapshot = match state.communities.stats(&community_id, &mode) {
        Ok(snapshot) => snapshot,
        Err(e) => return error_response(e),
    };

    match params.layout.unwrap_or_default() {
        Layout::Json => Json(snapshot).into_response(),
        Layout::Wide => render_wide(&snapshot, &state.emotes).into_response(),
        Layout::Compact => {
            let top_n = match state.communities.top_n(&community_id) {
                Ok(top_n) => top_n,
                Err(e) => return error_response(e),
            };
            let cap = state.communities.compact_cap(top_n);
            render_compact(&snapshot, &state.emotes, cap).into_response()
        }
    }
}
