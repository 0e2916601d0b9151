use anyhow::Result;
use chrono::{NaiveDate, Utc};
use log::{info, warn};

use crate::archive::{ArchivedReport, ReportArchive};
use crate::config::Emotes;
use crate::config::settings::StatsSettings;
use crate::database::{self, Community, DbPool};
use crate::domain::Mode;
use crate::notify::{MAX_MESSAGE_CHARS, Notifier};
use crate::stats::{ModeSnapshot, StatsTable, render_wide_pages, snapshot};

/// Posts the weekly leaderboards, archives them and starts a new week
pub struct ReportService<N: Notifier> {
    pool: DbPool,
    notifier: N,
    emotes: Emotes,
    archive: ReportArchive,
    stats: StatsSettings,
}

impl<N: Notifier> ReportService<N> {
    pub fn new(
        pool: DbPool,
        notifier: N,
        emotes: Emotes,
        archive: ReportArchive,
        stats: StatsSettings,
    ) -> Self {
        Self {
            pool,
            notifier,
            emotes,
            archive,
            stats,
        }
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub async fn run(&mut self) -> Result<usize> {
        self.run_on(Utc::now().date_naive()).await
    }

    /// Report every community, returning how many had a stats channel
    pub async fn run_on(&mut self, date: NaiveDate) -> Result<usize> {
        info!("=== Starting Weekly Report ===");

        let communities = {
            let mut conn = database::get_connection(&self.pool)?;
            database::communities::list_all(&mut conn)?
        };

        let mut reported = 0;
        for community in &communities {
            if self.report_community(community, date).await? {
                reported += 1;
            }
        }

        info!("=== Weekly Report Complete ({reported} communities) ===");
        Ok(reported)
    }

    async fn report_community(&mut self, community: &Community, date: NaiveDate) -> Result<bool> {
        let table = {
            let mut conn = database::get_connection(&self.pool)?;
            database::stats::load_table(&mut conn, &community.id)?
        };
        let top_n = community.top_n_or(self.stats.default_top_n);
        let modes = snapshots(&table, top_n);

        let posted = match &community.stats_channel {
            Some(channel) => {
                for mode in &modes {
                    for page in render_wide_pages(mode, &self.emotes, MAX_MESSAGE_CHARS) {
                        if let Err(e) = self.notifier.notify(channel, &page).await {
                            warn!("Failed to post {} stats of {}: {e:#}", mode.mode, community.id);
                        }
                    }
                }
                true
            }
            None => false,
        };

        if !table.is_empty() {
            self.archive.save(&ArchivedReport {
                community_id: community.id.clone(),
                date,
                modes,
            })?;
        }

        let mut conn = database::get_connection(&self.pool)?;
        let cleared = database::stats::clear(&mut conn, &community.id)?;
        info!("  → {}: cleared {} counters", community.id, cleared);

        Ok(posted)
    }
}

/// Ranked snapshots of all tracked modes
pub fn snapshots(table: &StatsTable, top_n: usize) -> Vec<ModeSnapshot> {
    Mode::ALL
        .iter()
        .map(|mode| snapshot(table, *mode, top_n))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::testing::temp_database;
    use crate::domain::{ChannelRef, TeamSide};
    use crate::notify::testing::RecordingNotifier;

    fn seed(pool: &DbPool, community: &str, stats_channel: Option<&str>) {
        let mut conn = database::get_connection(pool).unwrap();
        let channel = stats_channel.map(ChannelRef::new);
        database::communities::set_stats_channel(&mut conn, community, channel.as_ref()).unwrap();
        let mut table = StatsTable::new(community);
        table.record_game("Split", ["MAX", "POCO", "BEA", "GENE", "MAX", "SPIKE"], TeamSide::A);
        database::stats::save_table(&mut conn, &table).unwrap();
    }

    fn service(pool: &DbPool, dir: &std::path::Path) -> ReportService<RecordingNotifier> {
        ReportService::new(
            pool.clone(),
            RecordingNotifier::default(),
            Emotes::default(),
            ReportArchive::new(dir.join("reports")).unwrap(),
            StatsSettings::default(),
        )
    }

    #[tokio::test]
    async fn test_report_posts_every_mode_archives_and_clears() {
        let (dir, pool) = temp_database();
        seed(&pool, "guild-1", Some("stats-room"));
        let mut reports = service(&pool, dir.path());
        let date = NaiveDate::from_ymd_opt(2024, 3, 17).unwrap();

        let reported = reports.run_on(date).await.unwrap();

        assert_eq!(reported, 1);
        let sent = &reports.notifier().sent;
        assert_eq!(sent.len(), 6);
        assert!(sent.iter().all(|(channel, _)| channel.as_str() == "stats-room"));
        assert!(sent[5].1.contains("**Split**"));

        let archived = ReportArchive::new(dir.path().join("reports"))
            .unwrap()
            .load("guild-1", date)
            .unwrap()
            .unwrap();
        assert_eq!(archived.modes.len(), 6);

        let mut conn = database::get_connection(&pool).unwrap();
        assert!(database::stats::load_table(&mut conn, "guild-1").unwrap().is_empty());
        let community = database::communities::find(&mut conn, "guild-1").unwrap().unwrap();
        assert_eq!(community.stats_channel, Some(ChannelRef::new("stats-room")));
    }

    #[tokio::test]
    async fn test_communities_without_stats_channel_are_cleared_silently() {
        let (dir, pool) = temp_database();
        seed(&pool, "guild-2", None);
        let mut reports = service(&pool, dir.path());

        let reported = reports.run_on(NaiveDate::from_ymd_opt(2024, 3, 17).unwrap()).await.unwrap();

        assert_eq!(reported, 0);
        assert!(reports.notifier().sent.is_empty());
        let mut conn = database::get_connection(&pool).unwrap();
        assert!(database::stats::load_table(&mut conn, "guild-2").unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_long_leaderboards_arrive_complete() {
        let (dir, pool) = temp_database();
        let names: Vec<String> = (0..30).map(|i| format!("BRAWLER{i:02}")).collect();
        {
            let mut conn = database::get_connection(&pool).unwrap();
            let channel = ChannelRef::new("stats-room");
            database::communities::set_stats_channel(&mut conn, "guild-1", Some(&channel)).unwrap();
            database::communities::set_top_n(&mut conn, "guild-1", 25).unwrap();

            let mut table = StatsTable::new("guild-1");
            for map in ["Hard Rock Mine", "Gem Fort", "Crystal Arcade"] {
                for game in names.chunks(6) {
                    let characters: [&str; 6] = std::array::from_fn(|i| game[i].as_str());
                    table.record_game(map, characters, TeamSide::A);
                }
            }
            database::stats::save_table(&mut conn, &table).unwrap();
        }
        let emotes = Emotes::new(
            names
                .iter()
                .map(|n| (n.clone(), format!("<:{n}:123456789012345678>")))
                .collect(),
        );
        let mut reports = ReportService::new(
            pool.clone(),
            RecordingNotifier::default(),
            emotes,
            ReportArchive::new(dir.path().join("reports")).unwrap(),
            StatsSettings::default(),
        );

        reports.run_on(NaiveDate::from_ymd_opt(2024, 3, 17).unwrap()).await.unwrap();

        let sent = &reports.notifier().sent;
        assert!(sent.len() > Mode::ALL.len());
        for (_, text) in sent {
            assert!(text.chars().count() <= MAX_MESSAGE_CHARS);
            assert_eq!(text.matches("```").count() % 2, 0);
        }
        let rows = sent
            .iter()
            .flat_map(|(_, text)| text.lines())
            .filter(|line| line.starts_with("<:BRAWLER"))
            .count();
        assert_eq!(rows, 3 * 25);
    }

    #[test]
    fn test_snapshots_cover_all_modes_in_order() {
        let modes = snapshots(&StatsTable::new("guild-1"), 15);

        let order: Vec<Mode> = modes.iter().map(|m| m.mode).collect();
        assert_eq!(order, Mode::ALL);
    }
}
