pub mod app_error;
pub mod resilient_fetcher;
pub mod validated_query;
