use axum::response::{Json, IntoResponse};
use axum::http::StatusCode;
use crate::{HealthResponse, API_NAME, API_VERSION};

pub async fn health_check() -> impl IntoResponse {
    let response = HealthResponse {
        name: API_NAME.to_string(),
        version: API_VERSION.to_string(),
    };

    (StatusCode::OK, Json(response))
}
