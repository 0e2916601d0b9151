pub mod render;
pub mod snapshot;
pub mod table;

pub use render::{render_compact, render_wide, render_wide_pages};
pub use snapshot::{MapSnapshot, ModeSnapshot, RankedCharacter, rank_map, snapshot};
pub use table::{CharacterCounter, MapStats, StatsTable};
