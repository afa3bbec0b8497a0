use std::sync::Arc;

use crate::services::{city_store::CityStore, weather_orchestrator::WeatherOrchestrator};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CityStore>,
    pub orchestrator: WeatherOrchestrator,
}
