use anyhow::{Context, Result};
use rusqlite::{OptionalExtension, params};

use super::connection::DbConn;
use super::models::Community;
use crate::domain::ChannelRef;

const COLUMNS: &str = "id, notify_channel, stats_channel, top_n";

/// Create the community row if it does not exist yet
pub fn ensure(conn: &mut DbConn, id: &str) -> Result<Community> {
    conn.execute(
        "INSERT INTO communities (id) VALUES (?1) ON CONFLICT(id) DO NOTHING",
        params![id],
    )
    .context("Failed to insert community")?;

    find(conn, id)?.with_context(|| format!("Community {id} vanished after insert"))
}

pub fn find(conn: &mut DbConn, id: &str) -> Result<Option<Community>> {
    let sql = format!("SELECT {COLUMNS} FROM communities WHERE id = ?1");

    conn.query_row(&sql, params![id], parse_community_row)
        .optional()
        .context("Failed to query community by id")
}

pub fn list_all(conn: &mut DbConn) -> Result<Vec<Community>> {
    let sql = format!("SELECT {COLUMNS} FROM communities ORDER BY created_at, id");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], parse_community_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn set_notify_channel(conn: &mut DbConn, id: &str, channel: Option<&ChannelRef>) -> Result<()> {
    ensure(conn, id)?;
    conn.execute(
        "UPDATE communities SET notify_channel = ?1 WHERE id = ?2",
        params![channel.map(ChannelRef::as_str), id],
    )
    .context("Failed to update notify channel")?;
    Ok(())
}

pub fn set_stats_channel(conn: &mut DbConn, id: &str, channel: Option<&ChannelRef>) -> Result<()> {
    ensure(conn, id)?;
    conn.execute(
        "UPDATE communities SET stats_channel = ?1 WHERE id = ?2",
        params![channel.map(ChannelRef::as_str), id],
    )
    .context("Failed to update stats channel")?;
    Ok(())
}

pub fn set_top_n(conn: &mut DbConn, id: &str, top_n: usize) -> Result<()> {
    ensure(conn, id)?;
    let top_n = i64::try_from(top_n).context("top_n out of range")?;
    conn.execute(
        "UPDATE communities SET top_n = ?1 WHERE id = ?2",
        params![top_n, id],
    )
    .context("Failed to update top_n")?;
    Ok(())
}

fn parse_community_row(row: &rusqlite::Row) -> rusqlite::Result<Community> {
    let notify_channel: Option<String> = row.get(1)?;
    let stats_channel: Option<String> = row.get(2)?;
    let top_n: Option<i64> = row.get(3)?;

    Ok(Community {
        id: row.get(0)?,
        notify_channel: notify_channel.filter(|c| !c.is_empty()).map(ChannelRef),
        stats_channel: stats_channel.filter(|c| !c.is_empty()).map(ChannelRef),
        // Non-positive values fall back to the default
        top_n: top_n.and_then(|n| usize::try_from(n).ok()).filter(|n| *n > 0),
    })
}
