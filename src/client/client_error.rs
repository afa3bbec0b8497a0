use thiserror::Error;

use crate::utils::resilient_fetcher::FetchError;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Please enter a city name.")]
    EmptyQuery,
    #[error("No suggestion at position {0}")]
    NoSuchSuggestion(usize),
    /// The server answered with an `{error}` body.
    #[error("{message}")]
    Api { status: u16, message: String },
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("Invalid response: {0}")]
    Decode(String),
}
