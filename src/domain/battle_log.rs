use serde::{Deserialize, Serialize};
use serde_json::Value;

// --- API Response Structures ---

/// Raw battle log response; entries are kept as JSON so that one malformed
/// entry never spoils the rest of the log
#[derive(Debug, Deserialize, Serialize)]
pub struct BattleLogResponse {
    #[serde(default)]
    pub items: Vec<Value>,
}

/// One battle log entry as returned by the API
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleEntry {
    pub battle_time: String,
    #[serde(default)]
    pub event: Option<EventInfo>,
    pub battle: BattleInfo,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EventInfo {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub map: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BattleInfo {
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(rename = "type", default)]
    pub battle_type: Option<String>,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub duration: Option<i64>,
    #[serde(default)]
    pub teams: Option<Vec<Vec<BattlePlayer>>>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BattlePlayer {
    #[serde(default)]
    pub tag: Option<String>,
    pub name: String,
    pub brawler: BrawlerInfo,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BrawlerInfo {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub power: Option<i32>,
    #[serde(default)]
    pub trophies: Option<i32>,
}

/// Player profile; only the display name is used
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlayerProfile {
    pub tag: String,
    pub name: String,
    #[serde(default)]
    pub trophies: Option<i64>,
}

impl BattleEntry {
    /// Mode from the battle section, falling back to the event section
    pub fn mode_name(&self) -> Option<&str> {
        self.battle
            .mode
            .as_deref()
            .or_else(|| self.event.as_ref().and_then(|e| e.mode.as_deref()))
    }

    pub fn map_name(&self) -> Option<&str> {
        self.event
            .as_ref()
            .and_then(|e| e.map.as_deref())
            .filter(|m| !m.is_empty())
    }
}
