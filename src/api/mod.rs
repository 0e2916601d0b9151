pub mod brawl_client;
pub mod handlers;
pub mod models;
pub mod parsers;
pub mod routes;
pub mod source;

pub use brawl_client::BrawlStarsClient;
pub use source::MatchSource;
