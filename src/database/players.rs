use anyhow::{Context, Result};
use rusqlite::{OptionalExtension, params};

use super::communities;
use super::connection::DbConn;
use super::models::TrackedPlayer;

/// Track a player; returns false if the tag was already tracked by the community
pub fn add(conn: &mut DbConn, community_id: &str, tag: &str, name: &str) -> Result<bool> {
    communities::ensure(conn, community_id)?;

    let inserted = conn
        .execute(
            "INSERT INTO tracked_players (community_id, tag, name) VALUES (?1, ?2, ?3) ON CONFLICT(community_id, tag) DO NOTHING",
            params![community_id, tag, name],
        )
        .context("Failed to insert tracked player")?;

    Ok(inserted == 1)
}

/// Stop tracking a player, returning it if it was tracked
pub fn remove(conn: &mut DbConn, community_id: &str, tag: &str) -> Result<Option<TrackedPlayer>> {
    let Some(player) = find(conn, community_id, tag)? else {
        return Ok(None);
    };

    conn.execute(
        "DELETE FROM tracked_players WHERE community_id = ?1 AND tag = ?2",
        params![community_id, tag],
    )
    .context("Failed to delete tracked player")?;

    Ok(Some(player))
}

pub fn find(conn: &mut DbConn, community_id: &str, tag: &str) -> Result<Option<TrackedPlayer>> {
    let sql = "SELECT community_id, tag, name FROM tracked_players WHERE community_id = ?1 AND tag = ?2";

    conn.query_row(sql, params![community_id, tag], parse_player_row)
        .optional()
        .context("Failed to query tracked player")
}

/// Players of a community in the order they were added
pub fn list_by_community(conn: &mut DbConn, community_id: &str) -> Result<Vec<TrackedPlayer>> {
    let sql = "SELECT community_id, tag, name FROM tracked_players WHERE community_id = ?1 ORDER BY id";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![community_id], parse_player_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn update_name(conn: &mut DbConn, community_id: &str, tag: &str, name: &str) -> Result<()> {
    conn.execute(
        "UPDATE tracked_players SET name = ?1 WHERE community_id = ?2 AND tag = ?3",
        params![name, community_id, tag],
    )
    .context("Failed to update player name")?;
    Ok(())
}

fn parse_player_row(row: &rusqlite::Row) -> rusqlite::Result<TrackedPlayer> {
    Ok(TrackedPlayer {
        community_id: row.get(0)?,
        tag: row.get(1)?,
        name: row.get(2)?,
    })
}
