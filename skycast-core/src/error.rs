use reqwest::StatusCode;
use thiserror::Error;

/// Message shown to the user for every fetch failure, whatever its kind.
pub const USER_FACING_MESSAGE: &str = "Location not found or a network error occurred.";

/// Errors returned by a weather fetch. Both are terminal for that call.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// Transport failure, timeout, or a non-2xx response.
    #[error("{}", fetch_failed_message(.status, .message))]
    FetchFailed {
        status: Option<StatusCode>,
        message: String,
    },

    /// The body did not have the expected shape.
    #[error("Failed to decode weather response: {0}")]
    DecodeFailed(String),
}

fn fetch_failed_message(status: &Option<StatusCode>, message: &str) -> String {
    match status {
        Some(status) => format!("Weather request failed with status {status}: {message}"),
        None => format!("Weather request failed: {message}"),
    }
}

/// Copyable category of a [`WeatherError`], handed to the UI layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    FetchFailed,
    DecodeFailed,
}

impl ErrorKind {
    /// Both kinds collapse to the same message on purpose.
    pub fn user_message(&self) -> &'static str {
        USER_FACING_MESSAGE
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::FetchFailed => f.write_str("fetch failed"),
            ErrorKind::DecodeFailed => f.write_str("decode failed"),
        }
    }
}

impl WeatherError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            WeatherError::FetchFailed { .. } => ErrorKind::FetchFailed,
            WeatherError::DecodeFailed(_) => ErrorKind::DecodeFailed,
        }
    }

    pub(crate) fn transport(err: reqwest::Error) -> Self {
        WeatherError::FetchFailed {
            status: err.status(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_maps_variants() {
        let fetch = WeatherError::FetchFailed {
            status: Some(StatusCode::BAD_REQUEST),
            message: "No matching location found.".into(),
        };
        let decode = WeatherError::DecodeFailed("missing field `location`".into());

        assert_eq!(fetch.kind(), ErrorKind::FetchFailed);
        assert_eq!(decode.kind(), ErrorKind::DecodeFailed);
    }

    #[test]
    fn both_kinds_share_user_message() {
        assert_eq!(ErrorKind::FetchFailed.user_message(), USER_FACING_MESSAGE);
        assert_eq!(ErrorKind::DecodeFailed.user_message(), USER_FACING_MESSAGE);
    }

    #[test]
    fn fetch_failed_display_includes_status_when_known() {
        let err = WeatherError::FetchFailed {
            status: Some(StatusCode::FORBIDDEN),
            message: "bad key".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("403"));
        assert!(msg.contains("bad key"));

        let err = WeatherError::FetchFailed { status: None, message: "timed out".into() };
        assert_eq!(err.to_string(), "Weather request failed: timed out");
    }
}
