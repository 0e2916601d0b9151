use anyhow::Result;
use serde_json::Value;

/// Where battle logs and player profiles come from
#[allow(async_fn_in_trait)]
pub trait MatchSource {
    /// Raw battle-log entries of a player, newest first
    async fn fetch_battle_log(&mut self, tag: &str) -> Result<Vec<Value>>;

    /// Current in-game display name of a player
    async fn resolve_player_name(&mut self, tag: &str) -> Result<String>;
}
