use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use std::sync::Arc;

use super::{AppState, error_response};
use crate::api::models::{
    AddPlayerRequest, CommunitySettings, ErrorResponse, PlayerItem, PlayerListResponse,
    SettingsUpdate,
};
use crate::domain::ChannelRef;

pub async fn list_players(
    State(state): State<Arc<AppState>>,
    Path(community_id): Path<String>,
) -> impl IntoResponse {
    let players = match state.communities.players(&community_id) {
        Ok(players) => players,
        Err(e) => return error_response(e),
    };

    let items: Vec<PlayerItem> = players.into_iter().map(PlayerItem::from).collect();
    Json(PlayerListResponse {
        community_id,
        total: items.len(),
        items,
    })
    .into_response()
}

pub async fn add_player(
    State(state): State<Arc<AppState>>,
    Path(community_id): Path<String>,
    Json(request): Json<AddPlayerRequest>,
) -> impl IntoResponse {
    let Some(source) = &state.source else {
        let body = ErrorResponse {
            error: "player lookups are disabled: BS_API_TOKEN is not set".to_string(),
        };
        return (StatusCode::SERVICE_UNAVAILABLE, Json(body)).into_response();
    };

    let mut source = source.lock().await;
    match state
        .communities
        .add_player(&mut *source, &community_id, &request.tag)
        .await
    {
        Ok(player) => (StatusCode::CREATED, Json(PlayerItem::from(player))).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn remove_player(
    State(state): State<Arc<AppState>>,
    Path((community_id, tag)): Path<(String, String)>,
) -> impl IntoResponse {
    match state.communities.remove_player(&community_id, &tag) {
        Ok(player) => Json(PlayerItem::from(player)).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    Path(community_id): Path<String>,
    Json(update): Json<SettingsUpdate>,
) -> impl IntoResponse {
    if let Err(e) = apply_settings(&state, &community_id, update) {
        return error_response(e);
    }

    match state.communities.community(&community_id) {
        Ok(community) => Json(CommunitySettings::new(
            community,
            state.config.stats.default_top_n,
        ))
        .into_response(),
        Err(e) => error_response(e),
    }
}

fn apply_settings(state: &AppState, community_id: &str, update: SettingsUpdate) -> anyhow::Result<()> {
    if let Some(top_n) = update.top_n {
        state.communities.set_top_n(community_id, top_n)?;
    }
    if let Some(channel) = update.notify_channel {
        state
            .communities
            .set_notify_channel(community_id, to_channel(channel))?;
    }
    if let Some(channel) = update.stats_channel {
        state
            .communities
            .set_stats_channel(community_id, to_channel(channel))?;
    }
    Ok(())
}

fn to_channel(value: String) -> Option<ChannelRef> {
    let value = value.trim();
    (!value.is_empty()).then(|| ChannelRef::new(value))
}
