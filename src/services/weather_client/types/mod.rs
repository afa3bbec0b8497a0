pub mod open_meteo_response;
pub mod weather_service_error;
