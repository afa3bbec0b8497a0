use reqwest::StatusCode;
use thiserror::Error;

use crate::utils::resilient_fetcher::FetchError;

#[derive(Debug, Error)]
pub enum WeatherServiceError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("Weather API error {}", .0.as_u16())]
    Status(StatusCode),
    #[error("Invalid weather response: {0}")]
    Decode(String),
}
