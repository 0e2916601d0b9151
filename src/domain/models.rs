use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a community (chat server) tracking a roster of players
pub type CommunityId = String;

/// Opaque notification destination (webhook URL or channel handle)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelRef(pub String);

impl ChannelRef {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChannelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Tracked game modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    GemGrab,
    BrawlBall,
    Bounty,
    Heist,
    Knockout,
    HotZone,
}

impl Mode {
    pub const ALL: [Mode; 6] = [
        Mode::GemGrab,
        Mode::BrawlBall,
        Mode::Bounty,
        Mode::Heist,
        Mode::Knockout,
        Mode::HotZone,
    ];

    /// Parse the camelCase mode name used by the battle log API
    pub fn from_api_name(name: &str) -> Option<Self> {
        match name {
            "gemGrab" => Some(Mode::GemGrab),
            "brawlBall" => Some(Mode::BrawlBall),
            "bounty" => Some(Mode::Bounty),
            "heist" => Some(Mode::Heist),
            "knockout" => Some(Mode::Knockout),
            "hotZone" => Some(Mode::HotZone),
            _ => None,
        }
    }

    /// Parse a human-entered mode name ("Gem Grab", "gem grab", "gemgrab")
    pub fn from_display_name(name: &str) -> Option<Self> {
        let wanted = squash(name);
        Self::ALL
            .into_iter()
            .find(|mode| squash(mode.display_name()) == wanted)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Mode::GemGrab => "Gem Grab",
            Mode::BrawlBall => "Brawl Ball",
            Mode::Bounty => "Bounty",
            Mode::Heist => "Heist",
            Mode::Knockout => "Knockout",
            Mode::HotZone => "Hot Zone",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

fn squash(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Battle type as reported by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchKind {
    Friendly,
    Tournament,
    Other,
}

impl MatchKind {
    pub fn from_api_name(name: &str) -> Self {
        match name {
            "friendly" => MatchKind::Friendly,
            "tournament" => MatchKind::Tournament,
            _ => MatchKind::Other,
        }
    }

    /// Only friendly and tournament games can be scrims
    pub fn is_eligible(&self) -> bool {
        matches!(self, MatchKind::Friendly | MatchKind::Tournament)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchKind::Friendly => "friendly",
            MatchKind::Tournament => "tournament",
            MatchKind::Other => "other",
        }
    }
}

/// Outcome of a single game from the reporting player's perspective
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameResult {
    Victory,
    Defeat,
}

impl GameResult {
    pub fn from_api_name(name: &str) -> Option<Self> {
        match name {
            "victory" => Some(GameResult::Victory),
            "defeat" => Some(GameResult::Defeat),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameResult::Victory => "Victory",
            GameResult::Defeat => "Defeat",
        }
    }

    /// Side that won the game, given that the reporter plays on side A
    pub fn winning_side(&self) -> TeamSide {
        match self {
            GameResult::Victory => TeamSide::A,
            GameResult::Defeat => TeamSide::B,
        }
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeamSide {
    A,
    B,
}

/// One player and the character they picked
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TeamMember {
    pub player: String,
    pub character: String,
}

impl TeamMember {
    pub fn new(player: impl Into<String>, character: impl Into<String>) -> Self {
        Self {
            player: player.into(),
            character: character.into(),
        }
    }
}

pub type Team = [TeamMember; 3];

/// A single normalized 3v3 game seen in one player's battle log
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    pub reporter: String,
    pub team_a: Team,
    pub team_b: Team,
    pub mode: Mode,
    pub map: String,
    pub result: GameResult,
    pub battle_time: DateTime<Utc>,
    pub kind: MatchKind,
    pub scope: CommunityId,
    pub channel: ChannelRef,
}

impl Match {
    pub fn members(&self) -> impl Iterator<Item = &TeamMember> {
        self.team_a.iter().chain(self.team_b.iter())
    }

    pub fn reporter_side(&self) -> Option<TeamSide> {
        if self.team_a.iter().any(|m| m.player == self.reporter) {
            Some(TeamSide::A)
        } else if self.team_b.iter().any(|m| m.player == self.reporter) {
            Some(TeamSide::B)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_names_round_trip_through_parsers() {
        assert_eq!(Mode::from_api_name("hotZone"), Some(Mode::HotZone));
        assert_eq!(Mode::from_api_name("soloShowdown"), None);
        assert_eq!(Mode::from_display_name("brawl ball"), Some(Mode::BrawlBall));
        assert_eq!(Mode::from_display_name("GemGrab"), Some(Mode::GemGrab));
        assert_eq!(Mode::from_display_name("Duels"), None);
    }

    #[test]
    fn test_only_friendly_and_tournament_are_eligible() {
        assert!(MatchKind::from_api_name("friendly").is_eligible());
        assert!(MatchKind::from_api_name("tournament").is_eligible());
        assert!(!MatchKind::from_api_name("ranked").is_eligible());
    }

    #[test]
    fn test_draw_is_not_a_game_result() {
        assert_eq!(GameResult::from_api_name("victory"), Some(GameResult::Victory));
        assert_eq!(GameResult::from_api_name("draw"), None);
    }
}
