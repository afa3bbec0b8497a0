use serde::{Deserialize, Serialize};

/// Exact-match lookup result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinateRecord {
    pub name: String,
    pub country: String,
    pub lat: f64,
    pub lng: f64,
}

/// Prefix-search result, one row of the typeahead list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionRecord {
    pub name: String,
    pub country: String,
    pub lat: f64,
    pub lng: f64,
}
