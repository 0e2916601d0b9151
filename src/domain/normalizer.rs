use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;
use thiserror::Error;

use super::battle_log::{BattleEntry, BattlePlayer};
use super::models::{ChannelRef, GameResult, Match, MatchKind, Mode, Team, TeamMember};

const BATTLE_TIME_FORMAT: &str = "%Y%m%dT%H%M%S%.fZ";

/// Why a battle log entry could not become a `Match`
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Rejection {
    #[error("entry is not a battle: {0}")]
    Malformed(String),
    #[error("battle has no type")]
    MissingType,
    #[error("battle has no teams")]
    MissingTeams,
    #[error("expected 2 teams, found {0}")]
    TeamCount(usize),
    #[error("expected 3 players per team, found {0}")]
    TeamSize(usize),
    #[error("mode {0:?} is not tracked")]
    UnknownMode(Option<String>),
    #[error("battle has no map")]
    MissingMap,
    #[error("result {0:?} is not a victory or defeat")]
    UnknownResult(Option<String>),
    #[error("unparsable battle time {0:?}")]
    BadTimestamp(String),
    #[error("{0} played on neither team")]
    ReporterMissing(String),
}

/// Who reported a battle and where its sessions get announced
#[derive(Debug, Clone, Copy)]
pub struct Reporter<'a> {
    pub name: &'a str,
    pub scope: &'a str,
    pub channel: &'a ChannelRef,
}

/// Normalize a raw battle log entry
pub fn normalize(raw: &Value, reporter: Reporter<'_>) -> Result<Match, Rejection> {
    let entry: BattleEntry =
        serde_json::from_value(raw.clone()).map_err(|e| Rejection::Malformed(e.to_string()))?;
    normalize_entry(&entry, reporter)
}

pub fn normalize_entry(entry: &BattleEntry, reporter: Reporter<'_>) -> Result<Match, Rejection> {
    let battle_type = entry.battle.battle_type.as_deref().ok_or(Rejection::MissingType)?;
    let (team_a, team_b) = extract_teams(entry)?;

    let mode_name = entry.mode_name();
    let mode = mode_name
        .and_then(Mode::from_api_name)
        .ok_or_else(|| Rejection::UnknownMode(mode_name.map(str::to_string)))?;
    let map = entry.map_name().ok_or(Rejection::MissingMap)?;

    let result = entry
        .battle
        .result
        .as_deref()
        .and_then(GameResult::from_api_name)
        .ok_or_else(|| Rejection::UnknownResult(entry.battle.result.clone()))?;

    let battle_time = parse_battle_time(&entry.battle_time)?;

    let game = Match {
        reporter: reporter.name.to_string(),
        team_a,
        team_b,
        mode,
        map: map.to_string(),
        result,
        battle_time,
        kind: MatchKind::from_api_name(battle_type),
        scope: reporter.scope.to_string(),
        channel: reporter.channel.clone(),
    };

    // Results are only meaningful from the reporter's own team
    if game.reporter_side().is_none() {
        return Err(Rejection::ReporterMissing(game.reporter));
    }
    Ok(game)
}

/// Parse the compact UTC timestamp used by the API, e.g. `20240315T183005.000Z`
pub fn parse_battle_time(value: &str) -> Result<DateTime<Utc>, Rejection> {
    NaiveDateTime::parse_from_str(value, BATTLE_TIME_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| Rejection::BadTimestamp(value.to_string()))
}

fn extract_teams(entry: &BattleEntry) -> Result<(Team, Team), Rejection> {
    let teams = entry.battle.teams.as_ref().ok_or(Rejection::MissingTeams)?;
    if teams.len() != 2 {
        return Err(Rejection::TeamCount(teams.len()));
    }
    Ok((to_team(&teams[0])?, to_team(&teams[1])?))
}

fn to_team(players: &[BattlePlayer]) -> Result<Team, Rejection> {
    let members: Vec<TeamMember> = players
        .iter()
        .map(|p| TeamMember::new(&p.name, &p.brawler.name))
        .collect();
    let size = members.len();
    members.try_into().map_err(|_| Rejection::TeamSize(size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn team(names: [&str; 3], brawlers: [&str; 3]) -> Value {
        Value::Array(
            names
                .iter()
                .zip(brawlers.iter())
                .map(|(n, b)| json!({"tag": format!("#{n}"), "name": n, "brawler": {"id": 1, "name": b, "power": 11, "trophies": 900}}))
                .collect(),
        )
    }

    fn entry() -> Value {
        json!({
            "battleTime": "20240315T183005.000Z",
            "event": {"id": 15000007, "mode": "gemGrab", "map": "Hard Rock Mine"},
            "battle": {
                "mode": "gemGrab",
                "type": "friendly",
                "result": "victory",
                "duration": 120,
                "teams": [
                    team(["Ann", "Bob", "Cid"], ["SHELLY", "COLT", "BULL"]),
                    team(["Dan", "Eve", "Fay"], ["JESSIE", "BROCK", "DYNAMIKE"])
                ]
            }
        })
    }

    fn reporter(channel: &ChannelRef) -> Reporter<'_> {
        Reporter { name: "Ann", scope: "guild-1", channel }
    }

    #[test]
    fn test_normalizes_a_friendly_3v3() {
        let channel = ChannelRef::new("room");
        let m = normalize(&entry(), reporter(&channel)).unwrap();

        assert_eq!(m.reporter, "Ann");
        assert_eq!(m.mode, Mode::GemGrab);
        assert_eq!(m.map, "Hard Rock Mine");
        assert_eq!(m.result, GameResult::Victory);
        assert_eq!(m.kind, MatchKind::Friendly);
        assert_eq!(m.team_b[2], TeamMember::new("Fay", "DYNAMIKE"));
        assert_eq!(m.battle_time.to_rfc3339(), "2024-03-15T18:30:05+00:00");
        assert_eq!(m.scope, "guild-1");
    }

    #[test]
    fn test_rejects_showdown_without_teams() {
        let channel = ChannelRef::new("room");
        let mut raw = entry();
        raw["battle"].as_object_mut().unwrap().remove("teams");
        raw["battle"]["players"] = json!([]);

        assert_eq!(normalize(&raw, reporter(&channel)), Err(Rejection::MissingTeams));
    }

    #[test]
    fn test_rejects_wrong_team_shapes() {
        let channel = ChannelRef::new("room");
        let mut raw = entry();
        raw["battle"]["teams"] = json!([team(["A", "B", "C"], ["X", "Y", "Z"])]);
        assert_eq!(normalize(&raw, reporter(&channel)), Err(Rejection::TeamCount(1)));

        raw["battle"]["teams"] = json!([
            team(["A", "B", "C"], ["X", "Y", "Z"]),
            [{"name": "D", "brawler": {"name": "W"}}]
        ]);
        assert_eq!(normalize(&raw, reporter(&channel)), Err(Rejection::TeamSize(1)));
    }

    #[test]
    fn test_rejects_missing_type_mode_and_timestamp() {
        let channel = ChannelRef::new("room");

        let mut raw = entry();
        raw["battle"].as_object_mut().unwrap().remove("type");
        assert_eq!(normalize(&raw, reporter(&channel)), Err(Rejection::MissingType));

        let mut raw = entry();
        raw["battle"]["mode"] = json!("duels");
        assert!(matches!(normalize(&raw, reporter(&channel)), Err(Rejection::UnknownMode(_))));

        let mut raw = entry();
        raw["battleTime"] = json!("yesterday");
        assert!(matches!(normalize(&raw, reporter(&channel)), Err(Rejection::BadTimestamp(_))));
    }

    #[test]
    fn test_rejects_draws_and_garbage() {
        let channel = ChannelRef::new("room");
        let mut raw = entry();
        raw["battle"]["result"] = json!("draw");
        assert!(matches!(normalize(&raw, reporter(&channel)), Err(Rejection::UnknownResult(_))));

        assert!(matches!(normalize(&json!(42), reporter(&channel)), Err(Rejection::Malformed(_))));
    }

    #[test]
    fn test_rejects_battles_the_reporter_did_not_play() {
        let channel = ChannelRef::new("room");
        let stranger = Reporter { name: "Zed", scope: "guild-1", channel: &channel };

        assert_eq!(
            normalize(&entry(), stranger),
            Err(Rejection::ReporterMissing("Zed".to_string()))
        );
    }

    #[test]
    fn test_ranked_games_normalize_but_are_not_eligible() {
        let channel = ChannelRef::new("room");
        let mut raw = entry();
        raw["battle"]["type"] = json!("ranked");
        let m = normalize(&raw, reporter(&channel)).unwrap();
        assert!(!m.kind.is_eligible());
    }
}
