use std::sync::Arc;

use crate::{
    config::AppConfig,
    routes::apply_routes,
    services::{
        city_store::CityStore,
        weather_client::open_meteo_service::{OpenMeteoService, OpenMeteoServiceConfig},
        weather_orchestrator::WeatherOrchestrator,
    },
    types::app_state::AppState,
};
use axum::Router;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::{info, warn};

pub fn gen_app(config: &AppConfig, store: Arc<dyn CityStore>) -> Router {
    let weather = OpenMeteoService::new(OpenMeteoServiceConfig {
        host: config.weather_host.clone(),
        policy: config.weather_policy,
    });
    let state = AppState {
        orchestrator: WeatherOrchestrator::new(Arc::clone(&store), weather),
        store,
    };

    let app = apply_routes(Router::new()).with_state(state);

    let app = if config.public_dir.is_dir() {
        info!("Serving static files from {}", config.public_dir.display());
        app.fallback_service(ServeDir::new(&config.public_dir))
    } else {
        warn!(
            "Static directory {} not found, serving API only",
            config.public_dir.display()
        );
        app
    };

    app.layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[cfg(test)]
pub struct MockApp {
    pub app: Router,
    pub weather_server: mockito::ServerGuard,
}

#[cfg(test)]
pub async fn gen_mock_app_with_store(store: Arc<dyn CityStore>) -> MockApp {
    use crate::utils::resilient_fetcher::RetryPolicy;

    let weather_server = mockito::Server::new_async().await;
    let config = AppConfig {
        weather_host: weather_server.url(),
        weather_policy: RetryPolicy::new(3, 1, 5000).unwrap(),
        public_dir: std::path::PathBuf::from("does-not-exist"),
        ..AppConfig::default()
    };

    MockApp {
        app: gen_app(&config, store),
        weather_server,
    }
}

#[cfg(test)]
pub async fn gen_mock_app() -> MockApp {
    use crate::services::city_store::test_support::seeded_store;

    gen_mock_app_with_store(Arc::new(seeded_store())).await
}
