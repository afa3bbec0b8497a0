use crate::{
    types::app_state::AppState,
    utils::{
        app_error::AppError,
        validated_query::{deserialize_trimmed, ValidatedQuery},
    },
};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
#[cfg(test)]
use axum_macros::debug_handler;
use serde::Deserialize;
use validator::Validate;

#[derive(Validate, Deserialize)]
pub struct GetWeatherPayload {
    #[serde(default, deserialize_with = "deserialize_trimmed")]
    #[validate(length(min = 1, message = "Missing ?city="))]
    pub city: String,
}

#[cfg_attr(test, debug_handler)]
pub async fn get_weather(
    State(state): State<AppState>,
    ValidatedQuery(payload): ValidatedQuery<GetWeatherPayload>,
) -> Result<Response, AppError> {
    let weather = state.orchestrator.get_weather(&payload.city).await?;

    Ok((StatusCode::OK, Json(weather)).into_response())
}
