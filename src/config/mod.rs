pub mod catalog;
pub mod emotes;
pub mod settings;

pub use catalog::{is_eligible, maps_for, mode_for_map};
pub use emotes::Emotes;
pub use settings::AppConfig;
