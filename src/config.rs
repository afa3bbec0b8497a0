use std::{env, net::SocketAddr, path::PathBuf};

use thiserror::Error;

use crate::{
    services::weather_client::open_meteo_service::OPEN_METEO_HOST,
    utils::resilient_fetcher::{PolicyError, RetryPolicy},
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} is not a valid {expected}: {value:?}")]
    Invalid {
        key: &'static str,
        expected: &'static str,
        value: String,
    },
    #[error("Invalid weather retry policy: {0}")]
    Policy(#[from] PolicyError),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_address: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub public_dir: PathBuf,
    pub weather_host: String,
    pub weather_policy: RetryPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 3000,
            db_path: PathBuf::from("db.sqlite"),
            public_dir: PathBuf::from("public"),
            weather_host: OPEN_METEO_HOST.to_string(),
            weather_policy: RetryPolicy::weather(),
        }
    }
}

fn parse<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    expected: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            key,
            expected,
            value,
        }),
        None => Ok(default),
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let weather_policy = RetryPolicy::new(
            parse(
                &lookup,
                "WEATHER_MAX_ATTEMPTS",
                "attempt count",
                defaults.weather_policy.max_attempts(),
            )?,
            parse(
                &lookup,
                "WEATHER_BACKOFF_MS",
                "duration in milliseconds",
                defaults.weather_policy.base_backoff().as_millis() as u64,
            )?,
            parse(
                &lookup,
                "WEATHER_TIMEOUT_MS",
                "duration in milliseconds",
                defaults.weather_policy.per_attempt_timeout().as_millis() as u64,
            )?,
        )?;

        Ok(Self {
            bind_address: lookup("BIND_ADDRESS").unwrap_or(defaults.bind_address),
            port: parse(&lookup, "PORT", "port", defaults.port)?,
            db_path: lookup("DB_PATH").map(PathBuf::from).unwrap_or(defaults.db_path),
            public_dir: lookup("PUBLIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.public_dir),
            weather_host: lookup("OPEN_METEO_HOST").unwrap_or(defaults.weather_host),
            weather_policy,
        })
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.bind_address, self.port)
            .parse()
            .map_err(|_| ConfigError::Invalid {
                key: "BIND_ADDRESS",
                expected: "IP address",
                value: self.bind_address.clone(),
            })
    }
}
