pub mod communities;
pub mod connection;
pub mod models;
pub mod players;
pub mod setup;
pub mod stats;

pub use connection::{DbConn, DbPool, create_pool, get_connection};
pub use models::*;
pub use setup::{ensure_schema, open_database};
