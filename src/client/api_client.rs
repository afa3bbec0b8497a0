use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;
use urlencoding::encode;

use super::client_error::ClientError;
use crate::{
    types::{city_records::SuggestionRecord, weather_payload::WeatherPayload},
    utils::{
        app_error::ErrorResponse,
        resilient_fetcher::{fetch_with_policy, FetchError, RetryPolicy},
    },
};

/// What the typeahead needs from the server.
#[async_trait]
pub trait CityApi: Send + Sync + 'static {
    async fn search(&self, query: &str) -> Result<Vec<SuggestionRecord>, ClientError>;

    async fn weather(&self, city: &str) -> Result<WeatherPayload, ClientError>;
}

#[derive(Clone)]
pub struct ApiClientConfig {
    pub base_url: String,
    pub search_policy: RetryPolicy,
    pub weather_policy: RetryPolicy,
}

impl ApiClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            search_policy: RetryPolicy::search(),
            weather_policy: RetryPolicy::client_weather(),
        }
    }
}

#[derive(Clone)]
pub struct ApiClient {
    config: ApiClientConfig,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(config: ApiClientConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path_and_query: &str) -> String {
        format!(
            "{}{}",
            self.config.base_url.trim_end_matches('/'),
            path_and_query
        )
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        policy: &RetryPolicy,
    ) -> Result<T, ClientError> {
        let request = self.client.get(url).build().map_err(FetchError::from)?;
        let resp = fetch_with_policy(&self.client, request, policy).await?;

        let status = resp.status();
        if !status.is_success() {
            let message = match resp.json::<ErrorResponse>().await {
                Ok(body) => body.error,
                Err(_) => status.to_string(),
            };
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        resp.json::<T>()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))
    }
}

#[async_trait]
impl CityApi for ApiClient {
    async fn search(&self, query: &str) -> Result<Vec<SuggestionRecord>, ClientError> {
        let url = self.url(&format!("/api/search?q={}", encode(query)));
        debug!("Searching {}", url);

        self.get_json(&url, &self.config.search_policy).await
    }

    async fn weather(&self, city: &str) -> Result<WeatherPayload, ClientError> {
        let url = self.url(&format!("/api/weather?city={}", encode(city)));

        self.get_json(&url, &self.config.weather_policy).await
    }
}
