use axum::{
    body::Body,
    http::{Response, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::services::{
    city_store::CityStoreError, weather_orchestrator::OrchestratorError,
};

#[derive(Debug)]
pub struct AppError {
    pub code: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn new(code: StatusCode, message: &str) -> Self {
        AppError {
            code,
            message: message.to_string(),
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response<Body> {
        if self.code.is_server_error() {
            error!("{} {}", self.code, self.message);
        } else {
            warn!("{} {}", self.code, self.message);
        }

        (
            self.code,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}

impl From<CityStoreError> for AppError {
    fn from(e: CityStoreError) -> Self {
        AppError::new(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string())
    }
}

impl From<OrchestratorError> for AppError {
    fn from(e: OrchestratorError) -> Self {
        let code = match e {
            OrchestratorError::Validation(_) => StatusCode::BAD_REQUEST,
            OrchestratorError::NotFound(_) => StatusCode::NOT_FOUND,
            OrchestratorError::Upstream(_) | OrchestratorError::Store(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        AppError::new(code, &e.to_string())
    }
}
