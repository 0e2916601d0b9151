use anyhow::Result;
use log::{info, warn};

use crate::api::MatchSource;
use crate::api::parsers::{display_tag, normalize_tag};
use crate::config::settings::StatsSettings;
use crate::database::{self, Community, DbPool, TrackedPlayer};
use crate::domain::{ChannelRef, Mode};
use crate::errors::CommandError;
use crate::stats::{ModeSnapshot, snapshot};

/// Player roster and settings management of communities
///
/// Refused requests fail with a [`CommandError`] wrapped in the returned
/// `anyhow::Error`; storage failures are passed through as they are.
#[derive(Clone)]
pub struct CommunityService {
    pool: DbPool,
    stats: StatsSettings,
}

impl CommunityService {
    pub fn new(pool: DbPool, stats: StatsSettings) -> Self {
        Self { pool, stats }
    }

    /// Track a player after checking the tag exists in the game
    pub async fn add_player<S: MatchSource>(
        &self,
        source: &mut S,
        community_id: &str,
        tag_input: &str,
    ) -> Result<TrackedPlayer> {
        let tag = normalize_tag(tag_input)?;
        let name = match source.resolve_player_name(&tag).await {
            Ok(name) => name,
            Err(e) => {
                warn!("Lookup of {} failed: {e:#}", display_tag(&tag));
                return Err(CommandError::UnknownPlayer(display_tag(&tag)).into());
            }
        };

        let mut conn = database::get_connection(&self.pool)?;
        if !database::players::add(&mut conn, community_id, &tag, &name)? {
            return Err(CommandError::AlreadyTracked(display_tag(&tag)).into());
        }

        info!("{community_id}: now tracking {name} ({})", display_tag(&tag));
        Ok(TrackedPlayer {
            community_id: community_id.to_string(),
            tag,
            name,
        })
    }

    pub fn remove_player(&self, community_id: &str, tag_input: &str) -> Result<TrackedPlayer> {
        let tag = normalize_tag(tag_input)?;
        let mut conn = database::get_connection(&self.pool)?;

        let removed = database::players::remove(&mut conn, community_id, &tag)?
            .ok_or_else(|| CommandError::NotTracked(display_tag(&tag)))?;

        info!("{community_id}: stopped tracking {}", removed.name);
        Ok(removed)
    }

    pub fn players(&self, community_id: &str) -> Result<Vec<TrackedPlayer>> {
        let mut conn = database::get_connection(&self.pool)?;
        database::players::list_by_community(&mut conn, community_id)
    }

    /// Settings of a community, defaults if it was never configured
    pub fn community(&self, community_id: &str) -> Result<Community> {
        let mut conn = database::get_connection(&self.pool)?;
        Ok(database::communities::find(&mut conn, community_id)?
            .unwrap_or_else(|| Community::new(community_id)))
    }

    pub fn set_notify_channel(&self, community_id: &str, channel: Option<ChannelRef>) -> Result<()> {
        let mut conn = database::get_connection(&self.pool)?;
        database::communities::set_notify_channel(&mut conn, community_id, channel.as_ref())
    }

    pub fn set_stats_channel(&self, community_id: &str, channel: Option<ChannelRef>) -> Result<()> {
        let mut conn = database::get_connection(&self.pool)?;
        database::communities::set_stats_channel(&mut conn, community_id, channel.as_ref())
    }

    pub fn set_top_n(&self, community_id: &str, top_n: usize) -> Result<()> {
        if top_n == 0 {
            return Err(CommandError::TopNZero.into());
        }
        if top_n > self.stats.max_top_n {
            return Err(CommandError::TopNTooLarge {
                requested: top_n,
                max: self.stats.max_top_n,
            }
            .into());
        }

        let mut conn = database::get_connection(&self.pool)?;
        database::communities::set_top_n(&mut conn, community_id, top_n)
    }

    pub fn top_n(&self, community_id: &str) -> Result<usize> {
        Ok(self.community(community_id)?.top_n_or(self.stats.default_top_n))
    }

    /// Current leaderboard of one mode, given by its display name
    pub fn stats(&self, community_id: &str, mode_name: &str) -> Result<ModeSnapshot> {
        let mode = Mode::from_display_name(mode_name)
            .ok_or_else(|| CommandError::UnknownMode(mode_name.to_string()))?;
        let top_n = self.top_n(community_id)?;

        let mut conn = database::get_connection(&self.pool)?;
        let table = database::stats::load_table(&mut conn, community_id)?;
        Ok(snapshot(&table, mode, top_n))
    }

    /// Cap of the compact layout for a community
    pub fn compact_cap(&self, top_n: usize) -> usize {
        top_n.min(self.stats.compact_cap)
    }
}
