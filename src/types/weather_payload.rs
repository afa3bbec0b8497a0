use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub temperature: Number,
    pub windspeed: Number,
    pub weathercode: Number,
    pub time: String,
    /// Whatever else Open-Meteo reports (winddirection, is_day, ...), kept as-is.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherPayload {
    pub city: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    pub current_weather: CurrentWeather,
}
