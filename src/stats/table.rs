use serde::{Deserialize, Serialize};

use crate::domain::{CommunityId, GameRecord, TeamSide};

/// Pick and win counts of one character on one map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterCounter {
    pub character: String,
    pub picks: u32,
    pub victories: u32,
}

impl CharacterCounter {
    pub fn new(character: impl Into<String>) -> Self {
        Self {
            character: character.into(),
            picks: 0,
            victories: 0,
        }
    }
}

/// Counters of one map, in first-recorded order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapStats {
    pub map: String,
    pub characters: Vec<CharacterCounter>,
}

impl MapStats {
    pub fn new(map: impl Into<String>) -> Self {
        Self {
            map: map.into(),
            characters: Vec::new(),
        }
    }

    pub fn total_picks(&self) -> u32 {
        self.characters.iter().map(|c| c.picks).sum()
    }

    fn counter_mut(&mut self, character: &str) -> &mut CharacterCounter {
        let index = match self.characters.iter().position(|c| c.character == character) {
            Some(index) => index,
            None => {
                self.characters.push(CharacterCounter::new(character));
                self.characters.len() - 1
            }
        };
        &mut self.characters[index]
    }
}

/// Pick/win counters of one community
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsTable {
    pub scope: CommunityId,
    maps: Vec<MapStats>,
}

impl StatsTable {
    pub fn new(scope: impl Into<CommunityId>) -> Self {
        Self {
            scope: scope.into(),
            maps: Vec::new(),
        }
    }

    pub fn from_maps(scope: impl Into<CommunityId>, maps: Vec<MapStats>) -> Self {
        Self {
            scope: scope.into(),
            maps,
        }
    }

    /// Count one game: a pick for all six characters, a victory for the winning three
    pub fn record_game(&mut self, map: &str, characters: [&str; 6], winner: TeamSide) {
        let winners = match winner {
            TeamSide::A => 0..3,
            TeamSide::B => 3..6,
        };
        let stats = self.map_mut(map);

        for (position, character) in characters.iter().enumerate() {
            let counter = stats.counter_mut(character);
            counter.picks += 1;
            if winners.contains(&position) {
                counter.victories += 1;
            }
        }
    }

    pub fn record(&mut self, game: &GameRecord<'_>) {
        self.record_game(game.map, game.characters, game.winner);
    }

    pub fn maps(&self) -> &[MapStats] {
        &self.maps
    }

    pub fn map(&self, name: &str) -> Option<&MapStats> {
        self.maps.iter().find(|m| m.map == name)
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }

    pub fn clear(&mut self) {
        self.maps.clear();
    }

    fn map_mut(&mut self, name: &str) -> &mut MapStats {
        let index = match self.maps.iter().position(|m| m.map == name) {
            Some(index) => index,
            None => {
                self.maps.push(MapStats::new(name));
                self.maps.len() - 1
            }
        };
        &mut self.maps[index]
    }
}
