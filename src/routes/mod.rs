use axum::{routing::get, Router};

use crate::types::app_state::AppState;

mod get_city;
mod get_search;
mod get_weather;

pub fn apply_routes(app: Router<AppState>) -> Router<AppState> {
    app.route("/api/city/:name", get(get_city::get_city))
        .route("/api/search", get(get_search::get_search))
        .route("/api/weather", get(get_weather::get_weather))
}
