use thiserror::Error;

/// Everything that can go wrong while producing a league calendar.
///
/// The enum is `Clone` because a single refresh result is handed to every
/// caller waiting on it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    #[error("PandaScore {endpoint} request failed with status {status}")]
    Upstream { endpoint: String, status: u16 },

    #[error("PandaScore {endpoint} request timed out")]
    Timeout { endpoint: String },

    #[error("PandaScore request failed: {0}")]
    Transport(String),

    #[error("Failed to decode PandaScore {endpoint} response: {message}")]
    Decode { endpoint: String, message: String },

    #[error("Invalid league id: {0:?}")]
    MalformedLeagueId(String),

    #[error("Calendar refresh aborted: {0}")]
    RefreshAborted(String),
}

impl CalendarError {
    /// Map a reqwest failure for `endpoint` onto the taxonomy above.
    pub fn from_reqwest(endpoint: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CalendarError::Timeout {
                endpoint: endpoint.to_string(),
            }
        } else if err.is_decode() {
            CalendarError::Decode {
                endpoint: endpoint.to_string(),
                message: err.to_string(),
            }
        } else {
            CalendarError::Transport(err.to_string())
        }
    }
}

pub type CalendarResult<T> = Result<T, CalendarError>;
