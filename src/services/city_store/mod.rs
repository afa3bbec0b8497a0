use async_trait::async_trait;
use thiserror::Error;

use crate::types::city_records::{CoordinateRecord, SuggestionRecord};

mod sqlite_city_store;

pub use sqlite_city_store::SqliteCityStore;

/// Upper bound on typeahead rows.
pub const MAX_SUGGESTIONS: usize = 10;

#[derive(Debug, Error)]
pub enum CityStoreError {
    #[error("{0}")]
    Database(String),
    #[error("City store unavailable: {0}")]
    Unavailable(String),
}

impl From<rusqlite::Error> for CityStoreError {
    fn from(e: rusqlite::Error) -> Self {
        CityStoreError::Database(e.to_string())
    }
}

#[async_trait]
pub trait CityStore: Send + Sync {
    /// Case-insensitive match on the full city name.
    async fn find_exact(&self, name: &str) -> Result<Option<CoordinateRecord>, CityStoreError>;

    /// Case-insensitive "starts with" match, most populous first, cities
    /// without a population last.
    async fn search_prefix(
        &self,
        prefix: &str,
        limit: usize,
    ) -> Result<Vec<SuggestionRecord>, CityStoreError>;
}
