use std::fmt::Write as _;

use crate::config::Emotes;
use crate::correlation::SessionCompleted;
use crate::domain::{Team, TeamMember};

/// Announcement of a finished scrim, reporter's team first
pub fn render_summary(completed: &SessionCompleted, emotes: &Emotes) -> String {
    let session = &completed.session;
    let mut out = format!(
        "**{}** played a new {} game!\n\n",
        session.reporter,
        session.kind.as_str()
    );

    out.push_str("__**Match Info**__\n");
    let _ = write!(out, "**Mode:** {}", session.mode);
    let mode_emote = emotes.mode(session.mode);
    if !mode_emote.is_empty() {
        let _ = write!(out, " {mode_emote}");
    }
    let _ = writeln!(out, "\n**Map:** {}\n", session.map);

    out.push_str("__**Team Composition**__\n");
    out.push_str(&composition(&session.team_a, emotes));
    out.push_str("**--VS--**\n");
    out.push_str("__**Enemy Composition**__\n");
    out.push_str(&composition(&session.team_b, emotes));

    out.push_str("\n**Results**\n");
    let results: Vec<&str> = completed.results().iter().map(|r| r.as_str()).collect();
    out.push_str(&results.join("\n"));
    out
}

fn composition(team: &Team, emotes: &Emotes) -> String {
    team.iter().map(|member| member_line(member, emotes)).collect()
}

fn member_line(member: &TeamMember, emotes: &Emotes) -> String {
    let emote = emotes.character(&member.character);
    if emote.is_empty() {
        format!("**{}** ({})\n", member.character, member.player)
    } else {
        format!("**{emote} {}** ({})\n", member.character, member.player)
    }
}
