pub mod client;
pub mod models;
pub mod source;

pub use client::PandaScoreClient;
pub use models::LeagueId;
pub use source::MatchSource;
