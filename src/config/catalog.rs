use crate::domain::Mode;

/// Map pool for one tracked mode
#[derive(Debug, Clone)]
pub struct ModeMaps {
    pub mode: Mode,
    pub maps: &'static [&'static str],
}

impl ModeMaps {
    const fn new(mode: Mode, maps: &'static [&'static str]) -> Self {
        Self { mode, maps }
    }
}

/// Maps that count as scrim maps, grouped by mode
pub const CATALOG: [ModeMaps; 6] = [
    ModeMaps::new(Mode::GemGrab, &["Hard Rock Mine", "Gem Fort", "Crystal Arcade"]),
    ModeMaps::new(Mode::BrawlBall, &["Backyard Bowl", "Pinhole Punt", "Field Goal"]),
    ModeMaps::new(Mode::Bounty, &["Shooting Star", "Dry Season", "Layer Cake"]),
    ModeMaps::new(Mode::Heist, &["Hot Potato", "Safe Zone"]),
    ModeMaps::new(Mode::Knockout, &["Goldarm Gulch", "Out in the Open", "Flaring Phoenix"]),
    ModeMaps::new(Mode::HotZone, &["Ring of Fire", "Parallel Plays", "Split"]),
];

/// Get the mode a map belongs to, if it is a tracked map
pub fn mode_for_map(map: &str) -> Option<Mode> {
    CATALOG
        .iter()
        .find(|entry| entry.maps.contains(&map))
        .map(|entry| entry.mode)
}

/// Get the tracked maps of a mode
pub fn maps_for(mode: Mode) -> &'static [&'static str] {
    CATALOG
        .iter()
        .find(|entry| entry.mode == mode)
        .map(|entry| entry.maps)
        .unwrap_or(&[])
}

/// A game is eligible only when its map is in the pool of its own mode
pub fn is_eligible(mode: Mode, map: &str) -> bool {
    mode_for_map(map) == Some(mode)
}
