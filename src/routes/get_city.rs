use crate::{types::app_state::AppState, utils::app_error::AppError};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

pub async fn get_city(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Response, AppError> {
    let record = state
        .store
        .find_exact(&name)
        .await?
        .ok_or_else(|| AppError::new(StatusCode::NOT_FOUND, "City not found"))?;

    Ok((StatusCode::OK, Json(record)).into_response())
}
