use reqwest::StatusCode;
use thiserror::Error;

/// Everything that can end a weather lookup.
///
/// Each variant is terminal for the query that produced it; nothing here is
/// retried and no partial report is ever returned alongside an error.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Please enter a city name.")]
    EmptyQuery,

    #[error("City not found: '{query}'.")]
    NotFound { query: String },

    #[error("Weather API request limit exceeded. Please try again later.")]
    RateLimited,

    #[error("Weather API request failed with status {status}: {body}")]
    UpstreamError { status: StatusCode, body: String },

    #[error("Unexpected weather API response format: {reason}")]
    MalformedResponse { reason: String },

    #[error("Network failure: {0}")]
    NetworkFailure(#[source] reqwest::Error),
}

impl WeatherError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedResponse { reason: reason.into() }
    }

    /// Map a non-success status to its error kind. 429 is reported separately
    /// so callers can tell throttling apart from a broken upstream.
    pub(crate) fn from_status(status: StatusCode, body: &str) -> Self {
        if status == StatusCode::TOO_MANY_REQUESTS {
            Self::RateLimited
        } else {
            Self::UpstreamError { status, body: truncate_body(body) }
        }
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
