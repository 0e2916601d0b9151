use anyhow::{Context, Result, bail};
use log::debug;
use serde_json::Value;

use crate::api::source::MatchSource;
use crate::config::settings::ApiSettings;
use crate::domain::battle_log::{BattleLogResponse, PlayerProfile};
use crate::http::RateLimitedClient;

/// Brawl Stars API client
pub struct BrawlStarsClient {
    client: RateLimitedClient,
    base_url: String,
}

impl BrawlStarsClient {
    pub fn new(settings: &ApiSettings) -> Result<Self> {
        let token = settings.require_token()?;
        let client = RateLimitedClient::new(
            settings.user_agent,
            settings.timeout_secs,
            settings.rate_limit_ms,
        )?
        .with_bearer_token(token);

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn fetch_profile(&mut self, tag: &str) -> Result<PlayerProfile> {
        let url = self.build_player_url(tag);
        let data = self.get_json(&url).await?;

        serde_json::from_value(data)
            .with_context(|| format!("Unexpected profile payload for player {tag}"))
    }

    // --- Helper Methods ---

    fn build_player_url(&self, tag: &str) -> String {
        format!("{}/players/{}", self.base_url, encode_tag(tag))
    }

    fn build_battle_log_url(&self, tag: &str) -> String {
        format!("{}/battlelog", self.build_player_url(tag))
    }

    async fn get_json(&mut self, url: &str) -> Result<Value> {
        debug!("GET {url}");
        let response = self.client.get(url).await?;

        if !response.status().is_success() {
            bail!("API returned status: {}", response.status());
        }

        response
            .json()
            .await
            .with_context(|| format!("Failed to decode JSON from {url}"))
    }
}

impl MatchSource for BrawlStarsClient {
    async fn fetch_battle_log(&mut self, tag: &str) -> Result<Vec<Value>> {
        let url = self.build_battle_log_url(tag);
        let data = self.get_json(&url).await?;

        let log: BattleLogResponse = serde_json::from_value(data)
            .with_context(|| format!("Unexpected battle log payload for player {tag}"))?;
        Ok(log.items)
    }

    async fn resolve_player_name(&mut self, tag: &str) -> Result<String> {
        Ok(self.fetch_profile(tag).await?.name)
    }
}

/// Path segment of a tag, with its `#` percent-encoded
fn encode_tag(tag: &str) -> String {
    let bare = tag.trim_start_matches('#');
    urlencoding::encode(&format!("#{bare}")).into_owned()
}
