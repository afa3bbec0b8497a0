use crate::{
    services::city_store::MAX_SUGGESTIONS,
    types::{app_state::AppState, city_records::SuggestionRecord},
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
use serde::Deserialize;
use validator::Validate;

#[derive(Validate, Deserialize)]
pub struct GetSearchPayload {
    #[serde(default, deserialize_with = "deserialize_trimmed")]
    pub q: String,
}

pub async fn get_search(
    State(state): State<AppState>,
    ValidatedQuery(GetSearchPayload { q }): ValidatedQuery<GetSearchPayload>,
) -> Result<Response, AppError> {
    if q.is_empty() {
        return Ok((StatusCode::OK, Json(Vec::<SuggestionRecord>::new())).into_response());
    }

    let suggestions = state.store.search_prefix(&q, MAX_SUGGESTIONS).await?;

    Ok((StatusCode::OK, Json(suggestions)).into_response())
}
