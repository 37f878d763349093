use async_trait::async_trait;

use super::models::{League, LeagueId, Match};
use crate::error::CalendarResult;

/// Trait for anything that can supply league metadata and match lists.
#[async_trait]
pub trait MatchSource: Send + Sync {
    /// League metadata used as the calendar title.
    async fn fetch_league(&self, league_id: LeagueId) -> CalendarResult<League>;

    /// Every match of the league: running, then past, then upcoming.
    async fn fetch_matches(&self, league_id: LeagueId) -> CalendarResult<Vec<Match>>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}
