use super::models::{
    ChannelRef, CommunityId, GameResult, Match, MatchKind, Mode, Team, TeamMember, TeamSide,
};

/// A best-of-3 scrim (Power Match) between two fixed rosters on one map
///
/// `team_a` is always the team of `reporter`, whose battle log anchors the
/// session and whose perspective every entry of `results` is recorded from.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub reporter: String,
    pub team_a: Team,
    pub team_b: Team,
    pub mode: Mode,
    pub map: String,
    pub kind: MatchKind,
    pub scope: CommunityId,
    pub channel: ChannelRef,
    results: Vec<GameResult>,
}

/// The characters of one recorded game and which side won it
#[derive(Debug, Clone, PartialEq)]
pub struct GameRecord<'a> {
    pub map: &'a str,
    pub characters: [&'a str; 6],
    pub winner: TeamSide,
}

impl Session {
    /// Open a session from its first game
    pub fn start(game: &Match) -> Self {
        let (team_a, team_b) = match game.reporter_side() {
            Some(TeamSide::B) => (game.team_b.clone(), game.team_a.clone()),
            _ => (game.team_a.clone(), game.team_b.clone()),
        };

        Self {
            reporter: game.reporter.clone(),
            team_a,
            team_b,
            mode: game.mode,
            map: game.map.clone(),
            kind: game.kind,
            scope: game.scope.clone(),
            channel: game.channel.clone(),
            results: vec![game.result],
        }
    }

    pub fn results(&self) -> &[GameResult] {
        &self.results
    }

    pub fn last_result(&self) -> Option<GameResult> {
        self.results.last().copied()
    }

    /// Append a game outcome; returns true when this completes the session
    pub fn record(&mut self, result: GameResult) -> bool {
        self.results.push(result);
        self.is_complete()
    }

    /// Completed once either outcome has been seen twice
    pub fn is_complete(&self) -> bool {
        let victories = self.count(GameResult::Victory);
        let defeats = self.count(GameResult::Defeat);
        victories >= 2 || defeats >= 2
    }

    /// Same rosters (order-independent), mode, map and destination
    pub fn is_same_game(&self, game: &Match) -> bool {
        self.mode == game.mode
            && self.map == game.map
            && self.scope == game.scope
            && self.channel == game.channel
            && roster_key(self.team_a.iter().chain(self.team_b.iter())) == roster_key(game.members())
    }

    pub fn is_reported_by(&self, game: &Match) -> bool {
        self.reporter == game.reporter
    }

    /// Another session of the same reporter announced to the same destination
    pub fn is_superseded_by(&self, game: &Match) -> bool {
        self.is_reported_by(game)
            && self.scope == game.scope
            && self.channel == game.channel
            && !self.is_same_game(game)
    }

    /// Characters in team order, A first
    pub fn characters(&self) -> [&str; 6] {
        let [a0, a1, a2] = &self.team_a;
        let [b0, b1, b2] = &self.team_b;
        [
            a0.character.as_str(),
            a1.character.as_str(),
            a2.character.as_str(),
            b0.character.as_str(),
            b1.character.as_str(),
            b2.character.as_str(),
        ]
    }

    /// The most recently recorded game, ready for the stats aggregator
    pub fn latest_game(&self) -> Option<GameRecord<'_>> {
        self.last_result().map(|result| GameRecord {
            map: &self.map,
            characters: self.characters(),
            winner: result.winning_side(),
        })
    }

    fn count(&self, result: GameResult) -> usize {
        self.results.iter().filter(|r| **r == result).count()
    }
}

fn roster_key<'a>(members: impl Iterator<Item = &'a TeamMember>) -> Vec<&'a TeamMember> {
    let mut key: Vec<&TeamMember> = members.collect();
    key.sort();
    key
}
