use anyhow::{Context, Result};
use rusqlite::params;

use super::communities;
use super::connection::DbConn;
use crate::stats::{CharacterCounter, MapStats, StatsTable};

/// Counters of a community, maps and characters in first-recorded order
pub fn load_table(conn: &mut DbConn, community_id: &str) -> Result<StatsTable> {
    let sql = "SELECT map, brawler, picks, victories FROM stat_counters WHERE community_id = ?1 ORDER BY seq";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![community_id], parse_counter_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .with_context(|| format!("Failed to load stats of {community_id}"))?;

    let mut maps: Vec<MapStats> = Vec::new();
    for (map, counter) in rows {
        match maps.iter_mut().find(|m| m.map == map) {
            Some(stats) => stats.characters.push(counter),
            None => maps.push(MapStats {
                map,
                characters: vec![counter],
            }),
        }
    }

    Ok(StatsTable::from_maps(community_id, maps))
}

/// Replace the stored counters of the table's community
pub fn save_table(conn: &mut DbConn, table: &StatsTable) -> Result<()> {
    communities::ensure(conn, &table.scope)?;

    let tx = conn.transaction().context("Failed to start transaction")?;
    tx.execute(
        "DELETE FROM stat_counters WHERE community_id = ?1",
        params![table.scope],
    )
    .context("Failed to clear previous counters")?;

    {
        let mut insert = tx.prepare(
            "INSERT INTO stat_counters (community_id, map, brawler, picks, victories, seq) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )?;
        let counters = table
            .maps()
            .iter()
            .flat_map(|m| m.characters.iter().map(move |c| (&m.map, c)));

        for (seq, (map, counter)) in counters.enumerate() {
            insert
                .execute(params![
                    table.scope,
                    map,
                    counter.character,
                    counter.picks,
                    counter.victories,
                    seq as i64
                ])
                .context("Failed to insert counter")?;
        }
    }

    tx.commit().context("Failed to commit counters")
}

/// Delete all counters of a community, returning how many were removed
pub fn clear(conn: &mut DbConn, community_id: &str) -> Result<usize> {
    conn.execute(
        "DELETE FROM stat_counters WHERE community_id = ?1",
        params![community_id],
    )
    .context("Failed to clear counters")
}

fn parse_counter_row(row: &rusqlite::Row) -> rusqlite::Result<(String, CharacterCounter)> {
    Ok((
        row.get(0)?,
        CharacterCounter {
            character: row.get(1)?,
            picks: row.get(2)?,
            victories: row.get(3)?,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{get_connection, testing::temp_database};
    use crate::domain::TeamSide;

    #[test]
    fn test_table_survives_a_reload_in_order() {
        let (_dir, pool) = temp_database();
        let mut conn = get_connection(&pool).unwrap();
        let mut table = StatsTable::new("guild-1");
        table.record_game("Split", ["MAX", "POCO", "BEA", "GENE", "MAX", "SPIKE"], TeamSide::B);
        table.record_game("Gem Fort", ["A", "B", "C", "D", "E", "F"], TeamSide::A);

        save_table(&mut conn, &table).unwrap();
        let loaded = load_table(&mut conn, "guild-1").unwrap();

        assert_eq!(loaded, table);
    }

    #[test]
    fn test_save_replaces_previous_counters() {
        let (_dir, pool) = temp_database();
        let mut conn = get_connection(&pool).unwrap();
        let mut table = StatsTable::new("guild-1");
        table.record_game("Split", ["A", "B", "C", "D", "E", "F"], TeamSide::A);
        save_table(&mut conn, &table).unwrap();

        table.record_game("Split", ["A", "B", "C", "D", "E", "F"], TeamSide::A);
        save_table(&mut conn, &table).unwrap();

        let loaded = load_table(&mut conn, "guild-1").unwrap();
        assert_eq!(loaded.map("Split").unwrap().characters[0].picks, 2);
    }

    #[test]
    fn test_clear_only_touches_one_community() {
        let (_dir, pool) = temp_database();
        let mut conn = get_connection(&pool).unwrap();
        for scope in ["guild-1", "guild-2"] {
            let mut table = StatsTable::new(scope);
            table.record_game("Split", ["A", "B", "C", "D", "E", "F"], TeamSide::A);
            save_table(&mut conn, &table).unwrap();
        }

        assert_eq!(clear(&mut conn, "guild-1").unwrap(), 6);

        assert!(load_table(&mut conn, "guild-1").unwrap().is_empty());
        assert!(!load_table(&mut conn, "guild-2").unwrap().is_empty());
    }
}
