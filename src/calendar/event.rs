//! Mapping of PandaScore matches onto calendar events.
//!
//! The mapping is pure and deterministic: the same match always yields the
//! same event, so a re-rendered feed only changes when upstream data does.

use chrono::{DateTime, Duration, Utc};

use crate::pandascore::models::{Match, MatchStatus};

/// Suffix of every event UID, naming the data provider.
pub const UID_SOURCE: &str = "pandascore";

/// A calendar entry derived from one match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    pub uid: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub summary: String,
    pub description: String,
}

/// Convert a match into a calendar event.
///
/// Returns `None` for matches without a start time.
pub fn match_to_event(m: &Match) -> Option<CalendarEvent> {
    let start = m.start_time()?;

    Some(CalendarEvent {
        uid: format!("match-{}@{}", m.id, UID_SOURCE),
        start,
        end: end_time(m, start),
        summary: title(m),
        description: description(m),
    })
}

/// Explicit `end_at` wins when it is not before the start; otherwise one
/// hour per game, never less than one hour.
fn end_time(m: &Match, start: DateTime<Utc>) -> DateTime<Utc> {
    match m.end_at {
        Some(end) if end >= start => end,
        _ => {
            let games = m.number_of_games.unwrap_or(1).max(1);
            start + Duration::hours(i64::from(games))
        }
    }
}

fn title(m: &Match) -> String {
    // Scores are shown in source order, not sorted by winner.
    if m.status == MatchStatus::Finished && m.results.len() >= 2 && m.opponents.len() >= 2 {
        return format!(
            "{} {} - {} {}",
            m.opponents[0].label(),
            m.results[0].score,
            m.results[1].score,
            m.opponents[1].label()
        );
    }

    if !m.opponents.is_empty() {
        return m
            .opponents
            .iter()
            .map(|o| o.label())
            .collect::<Vec<_>>()
            .join(" vs ");
    }

    m.name.clone()
}

fn description(m: &Match) -> String {
    if m.tournament.name.is_empty() {
        m.status.to_string()
    } else {
        format!("{} - {}", m.tournament.name, m.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pandascore::models::{MatchResult, Opponent, Tournament};
    use chrono::TimeZone;

    fn opponent(acronym: &str) -> Opponent {
        Opponent {
            acronym: Some(acronym.into()),
            name: None,
        }
    }

    fn result(score: u32, team_id: u64) -> MatchResult {
        MatchResult {
            score,
            team_id: Some(team_id),
        }
    }

    fn make_match(status: MatchStatus) -> Match {
        Match {
            id: 100,
            name: "Grand final".into(),
            status,
            begin_at: Some(Utc.with_ymd_and_hms(2024, 1, 1, 18, 0, 0).unwrap()),
            scheduled_at: None,
            end_at: None,
            number_of_games: Some(2),
            opponents: vec![opponent("A"), opponent("B")],
            results: vec![result(2, 1), result(1, 2)],
            tournament: Tournament {
                name: "Spring Split".into(),
            },
        }
    }

    #[test]
    fn test_finished_match_event() {
        let ev = match_to_event(&make_match(MatchStatus::Finished)).unwrap();
        assert_eq!(ev.start, Utc.with_ymd_and_hms(2024, 1, 1, 18, 0, 0).unwrap());
        assert_eq!(ev.end, Utc.with_ymd_and_hms(2024, 1, 1, 20, 0, 0).unwrap());
        assert_eq!(ev.summary, "A 2 - 1 B");
        assert_eq!(ev.description, "Spring Split - finished");
        assert_eq!(ev.uid, "match-100@pandascore");
    }

    #[test]
    fn test_finished_title_keeps_source_order_when_second_team_won() {
        let mut m = make_match(MatchStatus::Finished);
        m.results = vec![result(0, 1), result(3, 2)];
        assert_eq!(match_to_event(&m).unwrap().summary, "A 0 - 3 B");
    }

    #[test]
    fn test_no_start_time_is_skipped() {
        let mut m = make_match(MatchStatus::NotStarted);
        m.begin_at = None;
        assert!(match_to_event(&m).is_none());
    }

    #[test]
    fn test_scheduled_at_used_when_begin_at_missing() {
        let mut m = make_match(MatchStatus::NotStarted);
        m.begin_at = None;
        m.scheduled_at = Some(Utc.with_ymd_and_hms(2024, 2, 1, 9, 0, 0).unwrap());
        let ev = match_to_event(&m).unwrap();
        assert_eq!(ev.start, Utc.with_ymd_and_hms(2024, 2, 1, 9, 0, 0).unwrap());
    }

    #[test]
    fn test_not_finished_uses_vs_title() {
        let mut m = make_match(MatchStatus::Running);
        m.opponents = vec![opponent("T1"), opponent("T2")];
        assert_eq!(match_to_event(&m).unwrap().summary, "T1 vs T2");
        assert_eq!(match_to_event(&m).unwrap().description, "Spring Split - running");
    }

    #[test]
    fn test_finished_with_single_result_uses_vs_title() {
        let mut m = make_match(MatchStatus::Finished);
        m.opponents = vec![opponent("T1"), opponent("T2")];
        m.results.truncate(1);
        assert_eq!(match_to_event(&m).unwrap().summary, "T1 vs T2");
    }

    #[test]
    fn test_finished_with_single_opponent_does_not_panic() {
        let mut m = make_match(MatchStatus::Finished);
        m.opponents.truncate(1);
        assert_eq!(match_to_event(&m).unwrap().summary, "A");
    }

    #[test]
    fn test_no_opponents_falls_back_to_name() {
        let mut m = make_match(MatchStatus::NotStarted);
        m.opponents.clear();
        assert_eq!(match_to_event(&m).unwrap().summary, "Grand final");
    }

    #[test]
    fn test_explicit_end_time_wins() {
        let mut m = make_match(MatchStatus::Finished);
        m.end_at = Some(Utc.with_ymd_and_hms(2024, 1, 1, 19, 30, 0).unwrap());
        assert_eq!(
            match_to_event(&m).unwrap().end,
            Utc.with_ymd_and_hms(2024, 1, 1, 19, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_end_before_start_falls_back_to_game_count() {
        let mut m = make_match(MatchStatus::Finished);
        m.end_at = Some(Utc.with_ymd_and_hms(2024, 1, 1, 17, 0, 0).unwrap());
        m.number_of_games = Some(3);
        assert_eq!(
            match_to_event(&m).unwrap().end,
            Utc.with_ymd_and_hms(2024, 1, 1, 21, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_zero_or_missing_game_count_is_one_hour() {
        let mut m = make_match(MatchStatus::NotStarted);
        m.number_of_games = Some(0);
        let ev = match_to_event(&m).unwrap();
        assert_eq!(ev.end - ev.start, Duration::hours(1));

        m.number_of_games = None;
        let ev = match_to_event(&m).unwrap();
        assert_eq!(ev.end - ev.start, Duration::hours(1));
    }

    #[test]
    fn test_empty_tournament_name_description() {
        let mut m = make_match(MatchStatus::Postponed);
        m.tournament = Tournament::default();
        assert_eq!(match_to_event(&m).unwrap().description, "postponed");
    }
}
