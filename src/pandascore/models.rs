use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use std::fmt;

/// PandaScore league identifier.
pub type LeagueId = u64;

/// A PandaScore league
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct League {
    #[allow(dead_code)]
    pub id: LeagueId,
    pub name: String,
    #[serde(default)]
    pub videogame: Option<Videogame>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Videogame {
    pub name: String,
}

impl League {
    /// Title shown by calendar clients, e.g. "LCS (League of Legends)".
    pub fn calendar_title(&self) -> String {
        match &self.videogame {
            Some(game) if !game.name.is_empty() => format!("{} ({})", self.name, game.name),
            _ => self.name.clone(),
        }
    }
}

/// A single match (series) as returned by the `/matches/*` endpoints
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Match {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    pub status: MatchStatus,
    #[serde(default)]
    pub begin_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub scheduled_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub number_of_games: Option<u32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub opponents: Vec<Opponent>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<MatchResult>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tournament: Tournament,
}

impl Match {
    /// When the match starts. `begin_at` wins over `scheduled_at`; a match
    /// with neither has no place on a calendar.
    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        self.begin_at.or(self.scheduled_at)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    NotStarted,
    Running,
    Finished,
    Postponed,
    Canceled,
    #[serde(other)]
    Unknown,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::NotStarted => "not_started",
            MatchStatus::Running => "running",
            MatchStatus::Finished => "finished",
            MatchStatus::Postponed => "postponed",
            MatchStatus::Canceled => "canceled",
            MatchStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One side of a match.
///
/// PandaScore wraps teams as `{"type": "Team", "opponent": {...}}`; a bare
/// `{"acronym": ...}` object is accepted as well.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "OpponentSlot")]
pub struct Opponent {
    pub acronym: Option<String>,
    pub name: Option<String>,
}

impl Opponent {
    /// Short label for titles: the acronym, falling back to the full name.
    pub fn label(&self) -> &str {
        self.acronym
            .as_deref()
            .filter(|a| !a.is_empty())
            .or(self.name.as_deref())
            .unwrap_or("TBD")
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OpponentSlot {
    Wrapped { opponent: Team },
    Bare(Team),
}

#[derive(Deserialize)]
struct Team {
    #[serde(default)]
    acronym: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

impl From<OpponentSlot> for Opponent {
    fn from(slot: OpponentSlot) -> Self {
        let team = match slot {
            OpponentSlot::Wrapped { opponent } => opponent,
            OpponentSlot::Bare(team) => team,
        };
        Opponent {
            acronym: team.acronym,
            name: team.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MatchResult {
    pub score: u32,
    #[allow(dead_code)]
    #[serde(default)]
    pub team_id: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Tournament {
    #[serde(default)]
    pub name: String,
}

/// The three upstream buckets a league's match list is assembled from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Partition {
    Running,
    Past,
    Upcoming,
}

impl Partition {
    /// Concatenation order of a full match list.
    pub const ALL: [Partition; 3] = [Partition::Running, Partition::Past, Partition::Upcoming];

    pub fn as_str(&self) -> &'static str {
        match self {
            Partition::Running => "running",
            Partition::Past => "past",
            Partition::Upcoming => "upcoming",
        }
    }
}

/// Treat an explicit JSON `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pandascore_match() {
        let raw = r#"{
            "id": 100,
            "name": "Grand final: A vs B",
            "status": "finished",
            "begin_at": "2024-01-01T18:00:00Z",
            "scheduled_at": "2024-01-01T17:00:00Z",
            "end_at": null,
            "number_of_games": 2,
            "opponents": [
                {"type": "Team", "opponent": {"id": 1, "acronym": "A", "name": "Alpha"}},
                {"type": "Team", "opponent": {"id": 2, "acronym": null, "name": "Bravo"}}
            ],
            "results": [{"score": 2, "team_id": 1}, {"score": 1, "team_id": 2}],
            "tournament": {"id": 9, "name": "Spring Split"}
        }"#;

        let m: Match = serde_json::from_str(raw).unwrap();
        assert_eq!(m.status, MatchStatus::Finished);
        assert_eq!(m.start_time().unwrap().to_rfc3339(), "2024-01-01T18:00:00+00:00");
        assert_eq!(m.opponents[0].label(), "A");
        assert_eq!(m.opponents[1].label(), "Bravo");
        assert_eq!(m.results[1].score, 1);
        assert_eq!(m.tournament.name, "Spring Split");
    }

    #[test]
    fn test_parse_bare_opponents_and_scheduled_at() {
        let raw = r#"{
            "id": 7,
            "name": "x",
            "status": "not_started",
            "scheduled_at": "2024-03-02T10:00:00Z",
            "opponents": [{"acronym": "T1"}]
        }"#;

        let m: Match = serde_json::from_str(raw).unwrap();
        assert!(m.begin_at.is_none());
        assert!(m.start_time().is_some());
        assert_eq!(m.opponents[0].label(), "T1");
        assert!(m.results.is_empty());
        assert_eq!(m.tournament, Tournament::default());
    }

    #[test]
    fn test_null_lists_and_unknown_status() {
        let raw = r#"{"id": 1, "name": "n", "status": "forfeit",
                      "opponents": null, "results": null, "tournament": null}"#;
        let m: Match = serde_json::from_str(raw).unwrap();
        assert_eq!(m.status, MatchStatus::Unknown);
        assert!(m.opponents.is_empty());
        assert!(m.start_time().is_none());
    }

    #[test]
    fn test_league_calendar_title() {
        let mut league = League {
            id: 5,
            name: "LCS".into(),
            videogame: None,
        };
        assert_eq!(league.calendar_title(), "LCS");
        league.videogame = Some(Videogame {
            name: "League of Legends".into(),
        });
        assert_eq!(league.calendar_title(), "LCS (League of Legends)");
    }

    #[test]
    fn test_status_display() {
        assert_eq!(MatchStatus::NotStarted.to_string(), "not_started");
        assert_eq!(MatchStatus::Canceled.to_string(), "canceled");
    }
}
