use serde::{Deserialize, Serialize};

use super::table::{MapStats, StatsTable};
use crate::config::catalog;
use crate::domain::Mode;

/// Number of picks in one full 3v3 game
const PICKS_PER_GAME: f64 = 6.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedCharacter {
    pub character: String,
    pub picks: u32,
    pub victories: u32,
    /// Share of games the character appeared in, per full game on the map
    pub pickrate: f64,
    pub winrate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapSnapshot {
    pub map: String,
    pub games: f64,
    pub rows: Vec<RankedCharacter>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeSnapshot {
    pub mode: Mode,
    pub maps: Vec<MapSnapshot>,
}

impl ModeSnapshot {
    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }
}

/// Ranked leaderboard of every recorded map of `mode`
pub fn snapshot(table: &StatsTable, mode: Mode, top_n: usize) -> ModeSnapshot {
    let maps = table
        .maps()
        .iter()
        .filter(|stats| catalog::mode_for_map(&stats.map) == Some(mode))
        .map(|stats| rank_map(stats, top_n))
        .collect();

    ModeSnapshot { mode, maps }
}

/// Rank the characters of one map by pick rate, highest first
///
/// Characters without picks are left out. Ties keep their first-recorded order.
pub fn rank_map(stats: &MapStats, top_n: usize) -> MapSnapshot {
    let games = f64::from(stats.total_picks()) / PICKS_PER_GAME;

    let mut rows: Vec<RankedCharacter> = stats
        .characters
        .iter()
        .filter(|c| c.picks > 0)
        .map(|c| {
            let picks = f64::from(c.picks);
            RankedCharacter {
                character: c.character.clone(),
                picks: c.picks,
                victories: c.victories,
                pickrate: picks / games * 100.0,
                winrate: f64::from(c.victories) / picks * 100.0,
            }
        })
        .collect();

    rows.sort_by(|a, b| b.pickrate.total_cmp(&a.pickrate));
    rows.truncate(top_n);

    MapSnapshot {
        map: stats.map.clone(),
        games,
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TeamSide;
    use crate::stats::table::CharacterCounter;

    fn counter(character: &str, picks: u32, victories: u32) -> CharacterCounter {
        CharacterCounter {
            character: character.to_string(),
            picks,
            victories,
        }
    }

    #[test]
    fn test_uniform_picks_are_full_pickrate() {
        let mut table = StatsTable::new("guild-1");
        table.record_game("Gem Fort", ["A", "B", "C", "D", "E", "F"], TeamSide::A);

        let ranked = snapshot(&table, Mode::GemGrab, 15);

        assert_eq!(ranked.maps.len(), 1);
        for row in &ranked.maps[0].rows {
            assert_eq!(row.pickrate, 100.0);
        }
        assert_eq!(ranked.maps[0].rows[0].winrate, 100.0);
        assert_eq!(ranked.maps[0].rows[5].winrate, 0.0);
    }

    #[test]
    fn test_pickrate_is_normalized_per_game() {
        let mut table = StatsTable::new("guild-1");
        table.record_game("Gem Fort", ["A", "B", "C", "D", "E", "F"], TeamSide::A);
        table.record_game("Gem Fort", ["A", "B", "C", "D", "E", "F"], TeamSide::B);

        let ranked = snapshot(&table, Mode::GemGrab, 15);

        assert!(ranked.maps[0].rows.iter().all(|r| r.pickrate == 100.0 && r.winrate == 50.0));
    }

    #[test]
    fn test_sorted_descending_with_stable_ties() {
        let stats = MapStats {
            map: "Split".to_string(),
            characters: vec![
                counter("POCO", 1, 0),
                counter("MAX", 3, 2),
                counter("BEA", 1, 1),
                counter("GENE", 1, 0),
            ],
        };

        let ranked = rank_map(&stats, 15);

        let order: Vec<&str> = ranked.rows.iter().map(|r| r.character.as_str()).collect();
        assert_eq!(order, ["MAX", "POCO", "BEA", "GENE"]);
        assert_eq!(ranked.rows[0].pickrate, 300.0);
    }

    #[test]
    fn test_zero_pick_characters_are_excluded_and_list_is_truncated() {
        let stats = MapStats {
            map: "Split".to_string(),
            characters: vec![
                counter("POCO", 2, 1),
                counter("GHOST", 0, 0),
                counter("MAX", 1, 1),
                counter("BEA", 3, 0),
            ],
        };

        let ranked = rank_map(&stats, 2);

        let order: Vec<&str> = ranked.rows.iter().map(|r| r.character.as_str()).collect();
        assert_eq!(order, ["BEA", "POCO"]);
    }

    #[test]
    fn test_snapshot_only_includes_maps_of_the_mode() {
        let mut table = StatsTable::new("guild-1");
        table.record_game("Split", ["A", "B", "C", "D", "E", "F"], TeamSide::A);
        table.record_game("Gem Fort", ["A", "B", "C", "D", "E", "F"], TeamSide::A);

        assert_eq!(snapshot(&table, Mode::HotZone, 15).maps[0].map, "Split");
        assert!(snapshot(&table, Mode::Heist, 15).is_empty());
    }
}
