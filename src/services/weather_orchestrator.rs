use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use super::{
    city_store::{CityStore, CityStoreError},
    weather_client::{
        open_meteo_service::OpenMeteoService, types::weather_service_error::WeatherServiceError,
    },
};
use crate::types::weather_payload::WeatherPayload;

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Upstream(#[from] WeatherServiceError),
    #[error(transparent)]
    Store(#[from] CityStoreError),
}

#[derive(Clone)]
pub struct WeatherOrchestrator {
    store: Arc<dyn CityStore>,
    weather: OpenMeteoService,
}

impl WeatherOrchestrator {
    pub fn new(store: Arc<dyn CityStore>, weather: OpenMeteoService) -> Self {
        Self { store, weather }
    }

    pub async fn get_weather(&self, city_name: &str) -> Result<WeatherPayload, OrchestratorError> {
        let city_name = city_name.trim();
        if city_name.is_empty() {
            return Err(OrchestratorError::Validation("Missing ?city=".to_string()));
        }

        let coords = self
            .store
            .find_exact(city_name)
            .await?
            .ok_or_else(|| OrchestratorError::NotFound("City not found".to_string()))?;

        info!("Resolved {} -> {}, {}", city_name, coords.name, coords.country);

        let current_weather = self
            .weather
            .get_current_weather(coords.lat, coords.lng)
            .await?;

        Ok(WeatherPayload {
            city: coords.name,
            country: coords.country,
            latitude: coords.lat,
            longitude: coords.lng,
            current_weather,
        })
    }
}
