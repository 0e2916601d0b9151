pub mod tags;

pub use tags::{display_tag, normalize_tag};
