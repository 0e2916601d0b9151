use std::fmt::Write as _;

use super::snapshot::{MapSnapshot, ModeSnapshot, RankedCharacter};
use crate::config::Emotes;

const TITLE: &str = "**BRAWLERS STATS**\nPickrates and Winrates";

/// Percentages are shown truncated, e.g. `66 %`
pub fn percent(value: f64) -> String {
    format!("{} %", value.trunc() as u32)
}

/// One block per map with name / pick rate / win rate columns
pub fn render_wide(snapshot: &ModeSnapshot, emotes: &Emotes) -> String {
    render_wide_pages(snapshot, emotes, usize::MAX).join("\n")
}

/// The wide layout split into messages of at most `max_chars` characters
///
/// Pages only break between map blocks, so every code block stays closed.
/// A single block longer than `max_chars` still gets a page of its own.
pub fn render_wide_pages(snapshot: &ModeSnapshot, emotes: &Emotes, max_chars: usize) -> Vec<String> {
    let mut pages = Vec::new();
    let mut current = header(snapshot, emotes);
    let mut current_len = current.chars().count();

    for map in &snapshot.maps {
        let block = wide_block(map, emotes);
        let block_len = block.chars().count();

        if current_len.saturating_add(1 + block_len) > max_chars {
            pages.push(std::mem::take(&mut current));
            current_len = 0;
        } else {
            current.push('\n');
            current_len += 1;
        }
        current.push_str(&block);
        current_len += block_len;
    }

    pages.push(current);
    pages
}

/// One line per character, capped at `cap` lines per map
pub fn render_compact(snapshot: &ModeSnapshot, emotes: &Emotes, cap: usize) -> String {
    let mut out = header(snapshot, emotes);
    for map in &snapshot.maps {
        let _ = writeln!(out, "\n**{}**", map.map);
        for row in map.rows.iter().take(cap) {
            let _ = writeln!(
                out,
                "{} {} {}",
                label(row, emotes),
                percent(row.pickrate),
                percent(row.winrate)
            );
        }
    }
    out
}

fn header(snapshot: &ModeSnapshot, emotes: &Emotes) -> String {
    let emote = emotes.mode(snapshot.mode);
    let mut out = format!("{TITLE}\n__**{}**__", snapshot.mode);
    if !emote.is_empty() {
        out.push(' ');
        out.push_str(emote);
    }
    out.push('\n');
    if snapshot.is_empty() {
        out.push_str("No games recorded yet.\n");
    }
    out
}

fn wide_block(map: &MapSnapshot, emotes: &Emotes) -> String {
    let labels: Vec<String> = map.rows.iter().map(|row| label(row, emotes)).collect();
    let width = labels
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0)
        .max("Brawler".len());

    let mut out = format!("**{}**\n```\n", map.map);
    let _ = writeln!(out, "{:<width$} {:>6} {:>6}", "Brawler", "-PR-", "-WR-");
    for (row, label) in map.rows.iter().zip(&labels) {
        let _ = writeln!(
            out,
            "{:<width$} {:>6} {:>6}",
            label,
            percent(row.pickrate),
            percent(row.winrate)
        );
    }
    out.push_str("```\n");
    out
}

fn label(row: &RankedCharacter, emotes: &Emotes) -> String {
    let emote = emotes.character(&row.character);
    if emote.is_empty() {
        row.character.clone()
    } else {
        format!("{emote} {}", row.character)
    }
}
