pub mod api_client;
pub mod client_error;
pub mod typeahead;
