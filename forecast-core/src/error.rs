use thiserror::Error;

/// Everything that can go wrong between issuing a forecast request and
/// holding a [`ForecastModel`](crate::ForecastModel).
///
/// The fetcher turns any of these into `FetchState::Failed` carrying the
/// `Display` text, so the messages are written for the end user.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Provider answered with a non-success status.
    #[error("City not found")]
    NotFound,

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected forecast data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Forecast contained no readings")]
    EmptyForecast,
}

impl FetchError {
    /// True for the "city not found" case, which callers may want to style
    /// differently from transport problems.
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::NotFound)
    }
}
