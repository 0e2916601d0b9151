use anyhow::Result;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde_json::Value;
use std::time::Duration;

use crate::api::MatchSource;
use crate::config::settings::AppConfig;
use crate::config::{Emotes, is_eligible};
use crate::correlation::{Outcome, SessionCompleted};
use crate::database::{self, Community, DbPool, TrackedPlayer};
use crate::domain::{ChannelRef, Match, Reporter, normalize};
use crate::engine::Engine;
use crate::errors::SkipReason;
use crate::notify::{Notifier, render_summary};

/// Counters of one scan cycle
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CycleReport {
    pub players_scanned: usize,
    pub players_skipped: usize,
    pub communities_skipped: usize,
    pub matches_admitted: usize,
    pub sessions_started: usize,
    pub sessions_completed: usize,
    pub sessions_discarded: usize,
    pub duplicates: usize,
    pub notifications_failed: usize,
}

impl CycleReport {
    fn count(&mut self, outcome: &Outcome) {
        self.matches_admitted += 1;
        match outcome {
            Outcome::Started { discarded, .. } => {
                self.sessions_started += 1;
                self.sessions_discarded += discarded.len();
            }
            Outcome::Completed(_) => self.sessions_completed += 1,
            Outcome::Duplicate => self.duplicates += 1,
            Outcome::Advanced(_) => {}
        }
    }
}

struct PlayerLog {
    name: String,
    entries: Vec<Value>,
}

struct CommunityLogs {
    community_id: String,
    channel: ChannelRef,
    logs: Vec<PlayerLog>,
}

/// Polls the battle logs of every tracked player and turns them into sessions and stats
pub struct ScanService<S: MatchSource, N: Notifier> {
    pool: DbPool,
    source: S,
    notifier: N,
    emotes: Emotes,
    engine: Engine,
    recency_window: Duration,
}

impl<S: MatchSource, N: Notifier> ScanService<S, N> {
    pub fn new(pool: DbPool, source: S, notifier: N, emotes: Emotes, config: &AppConfig) -> Self {
        Self {
            pool,
            source,
            notifier,
            emotes,
            engine: Engine::new(),
            recency_window: config.scan.recency_window,
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub async fn run_cycle(&mut self) -> Result<CycleReport> {
        self.run_cycle_at(Utc::now()).await
    }

    /// One polling cycle, with `now` as the reference for the recency window
    pub async fn run_cycle_at(&mut self, now: DateTime<Utc>) -> Result<CycleReport> {
        info!("=== Starting Scan Cycle ===");
        let mut report = CycleReport::default();
        self.engine.begin_cycle();

        // Step 1: Fetch every tracked player's battle log
        let communities = self.fetch_logs(&mut report).await?;
        info!(
            "  → Scanned {} players ({} skipped)",
            report.players_scanned, report.players_skipped
        );

        // Step 2: Correlate, one community at a time
        let mut completed = Vec::new();
        for community in &communities {
            // A community whose stats cannot be stored is retried from scratch next cycle
            let checkpoint = (self.engine.clone(), report.clone());
            match self.process_community(community, now, &mut report) {
                Ok(done) => completed.extend(done),
                Err(e) => {
                    (self.engine, report) = checkpoint;
                    report.communities_skipped += 1;
                    warn!("Skipping community {} this cycle: {e:#}", community.community_id);
                }
            }
        }
        info!(
            "  → Admitted {} matches: {} sessions started, {} completed, {} discarded, {} duplicates",
            report.matches_admitted,
            report.sessions_started,
            report.sessions_completed,
            report.sessions_discarded,
            report.duplicates
        );
        info!(
            "  → {} sessions still open, {} communities skipped",
            self.engine.sessions().open().len(),
            report.communities_skipped
        );

        // Step 3: Announce finished sessions
        self.announce(&completed, &mut report).await;

        info!("=== Scan Cycle Complete ===");
        Ok(report)
    }

    async fn fetch_logs(&mut self, report: &mut CycleReport) -> Result<Vec<CommunityLogs>> {
        let targets = self.load_targets()?;
        let mut fetched = Vec::with_capacity(targets.len());

        for (community, channel, players) in targets {
            let mut logs = Vec::with_capacity(players.len());

            for player in &players {
                match self.fetch_player(player).await {
                    Ok(log) => {
                        report.players_scanned += 1;
                        logs.push(log);
                    }
                    Err(skip) => {
                        report.players_skipped += 1;
                        warn!("Skipping player in {}: {skip}", community.id);
                    }
                }
            }

            fetched.push(CommunityLogs {
                community_id: community.id,
                channel,
                logs,
            });
        }

        Ok(fetched)
    }

    /// Communities with a notification channel and at least one tracked player
    fn load_targets(&self) -> Result<Vec<(Community, ChannelRef, Vec<TrackedPlayer>)>> {
        let mut conn = database::get_connection(&self.pool)?;
        let mut targets = Vec::new();

        for community in database::communities::list_all(&mut conn)? {
            let Some(channel) = community.notify_channel.clone() else {
                debug!("Community {} has no notification channel", community.id);
                continue;
            };
            let players = database::players::list_by_community(&mut conn, &community.id)?;
            if !players.is_empty() {
                targets.push((community, channel, players));
            }
        }

        Ok(targets)
    }

    async fn fetch_player(&mut self, player: &TrackedPlayer) -> Result<PlayerLog, SkipReason> {
        let name = self
            .source
            .resolve_player_name(&player.tag)
            .await
            .map_err(|e| SkipReason::lookup(&player.tag, &e))?;

        if name != player.name {
            self.rename_player(player, &name);
        }

        let entries = self
            .source
            .fetch_battle_log(&player.tag)
            .await
            .map_err(|e| SkipReason::fetch(&player.tag, &e))?;

        Ok(PlayerLog { name, entries })
    }

    fn rename_player(&self, player: &TrackedPlayer, name: &str) {
        let renamed = database::get_connection(&self.pool).and_then(|mut conn| {
            database::players::update_name(&mut conn, &player.community_id, &player.tag, name)
        });

        match renamed {
            Ok(()) => info!("Player {} is now called {}", player.name, name),
            Err(e) => warn!("Failed to store new name of {}: {e:#}", player.tag),
        }
    }

    fn process_community(
        &mut self,
        community: &CommunityLogs,
        now: DateTime<Utc>,
        report: &mut CycleReport,
    ) -> Result<Vec<SessionCompleted>> {
        let mut conn = database::get_connection(&self.pool)?;
        let mut table = database::stats::load_table(&mut conn, &community.community_id)?;
        let admitted_before = report.matches_admitted;
        let mut completed = Vec::new();

        for log in &community.logs {
            let reporter = Reporter {
                name: &log.name,
                scope: &community.community_id,
                channel: &community.channel,
            };

            for game in admissible_matches(&log.entries, reporter, now, self.recency_window) {
                if !self.engine.is_unseen(&game) {
                    debug!("Already ingested {}'s game of {}", game.reporter, game.battle_time);
                    continue;
                }
                let outcome = self.engine.ingest(&game, &mut table);
                report.count(&outcome);
                if let Outcome::Completed(done) = outcome {
                    completed.push(done);
                }
            }
        }

        if report.matches_admitted > admitted_before {
            database::stats::save_table(&mut conn, &table)?;
        }
        Ok(completed)
    }

    async fn announce(&mut self, completed: &[SessionCompleted], report: &mut CycleReport) {
        for done in completed {
            let text = render_summary(done, &self.emotes);
            if let Err(e) = self.notifier.notify(&done.session.channel, &text).await {
                report.notifications_failed += 1;
                warn!(
                    "Failed to announce session of {} in {}: {e:#}",
                    done.session.reporter, done.session.scope
                );
            }
        }
    }
}

/// Recent, eligible matches of one battle log, oldest first
pub fn admissible_matches(
    entries: &[Value],
    reporter: Reporter<'_>,
    now: DateTime<Utc>,
    window: Duration,
) -> Vec<Match> {
    let mut matches: Vec<Match> = entries
        .iter()
        .rev()
        .filter_map(|raw| match normalize(raw, reporter) {
            Ok(game) => Some(game),
            Err(rejection) => {
                debug!("Rejected entry of {}: {rejection}", reporter.name);
                None
            }
        })
        .filter(|game| game.kind.is_eligible())
        .filter(|game| is_recent(now, game.battle_time, window))
        .filter(|game| is_eligible(game.mode, &game.map))
        .collect();

    matches.sort_by_key(|game| game.battle_time);
    matches
}

/// Played less than `window` before `now`
pub fn is_recent(now: DateTime<Utc>, played_at: DateTime<Utc>, window: Duration) -> bool {
    match (now - played_at).to_std() {
        Ok(age) => age < window,
        // Timestamps ahead of our clock
        Err(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn entry(time: &str, kind: &str, map: &str, result: &str) -> Value {
        json!({
            "battleTime": time,
            "event": {"id": 1, "mode": "gemGrab", "map": map},
            "battle": {
                "mode": "gemGrab",
                "type": kind,
                "result": result,
                "teams": [
                    [
                        {"tag": "#1", "name": "Ann", "brawler": {"name": "SHELLY"}},
                        {"tag": "#2", "name": "Bob", "brawler": {"name": "COLT"}},
                        {"tag": "#3", "name": "Cid", "brawler": {"name": "BULL"}}
                    ],
                    [
                        {"tag": "#4", "name": "Dan", "brawler": {"name": "JESSIE"}},
                        {"tag": "#5", "name": "Eve", "brawler": {"name": "BROCK"}},
                        {"tag": "#6", "name": "Fay", "brawler": {"name": "DYNAMIKE"}}
                    ]
                ]
            }
        })
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 18, 40, 0).unwrap()
    }

    fn admit(entries: &[Value]) -> Vec<Match> {
        let channel = ChannelRef::new("scrims");
        let reporter = Reporter {
            name: "Ann",
            scope: "guild-1",
            channel: &channel,
        };
        admissible_matches(entries, reporter, now(), Duration::from_secs(600))
    }

    #[test]
    fn test_recency_window_boundary() {
        let played = now();
        let window = Duration::from_secs(600);

        assert!(is_recent(now(), played - chrono::Duration::seconds(599), window));
        assert!(!is_recent(now(), played - chrono::Duration::seconds(600), window));
        assert!(!is_recent(now(), played - chrono::Duration::seconds(601), window));
    }

    #[test]
    fn test_entries_come_out_oldest_first() {
        let log = [
            entry("20240315T183500.000Z", "friendly", "Gem Fort", "victory"),
            entry("20240315T183300.000Z", "friendly", "Gem Fort", "defeat"),
            entry("20240315T183100.000Z", "friendly", "Gem Fort", "victory"),
        ];

        let results: Vec<&str> = admit(&log).iter().map(|m| m.result.as_str()).collect();

        assert_eq!(results, ["Victory", "Defeat", "Victory"]);
    }

    #[test]
    fn test_ineligible_entries_are_filtered() {
        let log = [
            entry("20240315T183500.000Z", "ranked", "Gem Fort", "victory"),
            entry("20240315T183500.000Z", "friendly", "Split", "victory"),
            entry("20240315T183500.000Z", "friendly", "Gem Fort", "draw"),
            entry("20240315T182000.000Z", "friendly", "Gem Fort", "victory"),
            json!({"battleTime": "20240315T183500.000Z", "battle": {"mode": "soloShowdown"}}),
            entry("20240315T183500.000Z", "tournament", "Crystal Arcade", "defeat"),
        ];

        let admitted = admit(&log);

        assert_eq!(admitted.len(), 1);
        assert_eq!(admitted[0].map, "Crystal Arcade");
        assert_eq!(admitted[0].scope, "guild-1");
    }

    #[test]
    fn test_cycle_report_counts_outcomes() {
        let mut report = CycleReport::default();
        report.count(&Outcome::Duplicate);
        report.count(&Outcome::Started {
            session: crate::domain::Session::start(&admit(&[entry(
                "20240315T183500.000Z",
                "friendly",
                "Gem Fort",
                "victory",
            )])[0]),
            discarded: vec![],
        });

        assert_eq!(report.matches_admitted, 2);
        assert_eq!(report.duplicates, 1);
        assert_eq!(report.sessions_started, 1);
    }
}
