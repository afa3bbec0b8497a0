use serde::{Deserialize, Serialize};

use crate::types::weather_payload::CurrentWeather;

/// The slice of `/v1/forecast?current_weather=true` this service reads.
#[derive(Serialize, Deserialize)]
pub struct OpenMeteoForecastResponse {
    pub current_weather: Option<CurrentWeather>,
}
