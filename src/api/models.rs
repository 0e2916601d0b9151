use serde::{Deserialize, Serialize};

use crate::database::{Community, TrackedPlayer};

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlayerItem {
    pub tag: String,
    pub name: String,
}

impl From<TrackedPlayer> for PlayerItem {
    fn from(player: TrackedPlayer) -> Self {
        Self {
            tag: crate::api::parsers::display_tag(&player.tag),
            name: player.name,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerListResponse {
    pub community_id: String,
    pub items: Vec<PlayerItem>,
    pub total: usize,
}

#[derive(Debug, Deserialize)]
pub struct AddPlayerRequest {
    pub tag: String,
}

/// Partial settings update; an empty string clears a channel
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    pub notify_channel: Option<String>,
    pub stats_channel: Option<String>,
    pub top_n: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CommunitySettings {
    pub community_id: String,
    pub notify_channel: Option<String>,
    pub stats_channel: Option<String>,
    pub top_n: usize,
}

impl CommunitySettings {
    pub fn new(community: Community, default_top_n: usize) -> Self {
        Self {
            top_n: community.top_n_or(default_top_n),
            community_id: community.id,
            notify_channel: community.notify_channel.map(|c| c.0),
            stats_channel: community.stats_channel.map(|c| c.0),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
