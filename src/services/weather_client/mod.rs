pub mod open_meteo_service;
pub mod types;
