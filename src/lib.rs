pub mod app;
pub mod client;
pub mod config;
pub mod routes;
pub mod services;
pub mod types;
pub mod utils;
