//! ICS document generation for a league feed.

use icalendar::{Calendar, Component, EventLike};
use std::time::Duration;

use super::event::{match_to_event, CalendarEvent};
use crate::pandascore::models::{League, Match};

/// Timezone declared by every feed; event times are emitted in UTC as well.
pub const CALENDAR_TIMEZONE: &str = "UTC";

/// Render a complete calendar for `league`.
///
/// `refresh` is advertised to subscribers as the refresh interval.
pub fn render_calendar(league: &League, matches: &[Match], refresh: Duration) -> String {
    let mut cal = Calendar::new();
    cal.name(&league.calendar_title())
        .timezone(CALENDAR_TIMEZONE);
    if let Ok(ttl) = chrono::Duration::from_std(refresh) {
        cal.ttl(&ttl);
    }

    for event in matches.iter().filter_map(match_to_event) {
        cal.push(to_ics_event(&event));
    }

    cal.done().to_string()
}

fn to_ics_event(event: &CalendarEvent) -> icalendar::Event {
    icalendar::Event::new()
        .uid(&event.uid)
        .summary(&event.summary)
        .description(&event.description)
        .starts(event.start)
        .ends(event.end)
        .done()
}
