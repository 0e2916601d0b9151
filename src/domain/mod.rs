pub mod battle_log;
pub mod models;
pub mod normalizer;
pub mod session;

pub use models::*;
pub use normalizer::{Rejection, Reporter, normalize};
pub use session::{GameRecord, Session};
