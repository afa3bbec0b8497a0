use tracing::info;

use super::types::{
    open_meteo_response::OpenMeteoForecastResponse, weather_service_error::WeatherServiceError,
};
use crate::{
    types::weather_payload::CurrentWeather,
    utils::resilient_fetcher::{fetch_with_policy, FetchError, RetryPolicy},
};

pub const OPEN_METEO_HOST: &str = "https://api.open-meteo.com";

#[derive(Clone)]
pub struct OpenMeteoServiceConfig {
    pub host: String,
    pub policy: RetryPolicy,
}

impl Default for OpenMeteoServiceConfig {
    fn default() -> Self {
        Self {
            host: OPEN_METEO_HOST.to_string(),
            policy: RetryPolicy::weather(),
        }
    }
}

#[derive(Clone)]
pub struct OpenMeteoService {
    config: OpenMeteoServiceConfig,
    client: reqwest::Client,
}

impl OpenMeteoService {
    pub fn new(config: OpenMeteoServiceConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    pub fn forecast_url(&self, lat: f64, lng: f64) -> String {
        format!(
            "{}/v1/forecast?latitude={}&longitude={}&current_weather=true",
            self.config.host.trim_end_matches('/'),
            lat,
            lng
        )
    }

    pub async fn get_current_weather(
        &self,
        lat: f64,
        lng: f64,
    ) -> Result<CurrentWeather, WeatherServiceError> {
        let url = self.forecast_url(lat, lng);
        info!("Fetching weather -> {}", url);

        let request = self
            .client
            .get(&url)
            .build()
            .map_err(FetchError::from)?;

        let resp = fetch_with_policy(&self.client, request, &self.config.policy).await?;

        if !resp.status().is_success() {
            return Err(WeatherServiceError::Status(resp.status()));
        }

        let body = resp
            .json::<OpenMeteoForecastResponse>()
            .await
            .map_err(|e| WeatherServiceError::Decode(e.to_string()))?;

        body.current_weather.ok_or_else(|| {
            WeatherServiceError::Decode("missing current_weather".to_string())
        })
    }
}
