use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::{request::Parts, StatusCode},
};
use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use validator::{Validate, ValidationErrors};

use super::app_error::AppError;

pub struct ValidatedQuery<T>(pub T);

/// serde helper: strips surrounding whitespace before validation sees the value.
pub fn deserialize_trimmed<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(String::deserialize(deserializer)?.trim().to_string())
}

fn first_message(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| format!("Invalid query: {}", errors))
}

#[async_trait]
impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(data) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| {
                AppError::new(
                    StatusCode::BAD_REQUEST,
                    format!("Invalid query: {}", e.body_text()).as_str(),
                )
            })?;

        data.validate()
            .map_err(|e| AppError::new(StatusCode::BAD_REQUEST, &first_message(&e)))?;

        Ok(ValidatedQuery(data))
    }
}
