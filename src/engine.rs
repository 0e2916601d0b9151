use chrono::{DateTime, Utc};
use log::warn;
use std::collections::HashMap;

use crate::correlation::{Outcome, SessionStore, correlate};
use crate::domain::{CommunityId, Match};
use crate::stats::StatsTable;

/// Owns the session state that survives between scan cycles
///
/// Built once at startup and handed to every cycle; the state is in memory
/// only and starts empty after a restart.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    sessions: SessionStore,
    /// Battle time of the newest game ingested per community and reporter
    last_seen: HashMap<(CommunityId, String), DateTime<Utc>>,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Forget sessions retired during the previous cycle
    pub fn begin_cycle(&mut self) {
        self.sessions.clear_retired();
    }

    /// Whether the reporter's game is newer than anything already ingested from them
    pub fn is_unseen(&self, game: &Match) -> bool {
        self.last_seen
            .get(&(game.scope.clone(), game.reporter.clone()))
            .is_none_or(|seen| game.battle_time > *seen)
    }

    /// Correlate one eligible match and count the game it recorded, if any
    pub fn ingest(&mut self, game: &Match, stats: &mut StatsTable) -> Outcome {
        let seen = self
            .last_seen
            .entry((game.scope.clone(), game.reporter.clone()))
            .or_insert(game.battle_time);
        *seen = (*seen).max(game.battle_time);

        let outcome = correlate(game, &mut self.sessions);

        if let Some(record) = outcome.recorded_on().and_then(|s| s.latest_game()) {
            if stats.scope == game.scope {
                stats.record(&record);
            } else {
                warn!(
                    "Not counting game on {}: stats of {} were given for a match of {}",
                    record.map, stats.scope, game.scope
                );
            }
        }

        outcome
    }
}
