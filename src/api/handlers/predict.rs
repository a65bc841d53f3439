use axum::{body::Bytes, extract::State};
use std::sync::Arc;
use tracing::{error, info};
use crate::{
    api::handlers::common::{decode_json, format_currency},
    ApiError, AppState, Error, FeatureRow, HousingModel, PredictRequest,
};

pub async fn linear_regression_predict(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<String, ApiError> {
    let request: PredictRequest = decode_json(&body)?;

    let county = request.county.as_f64().ok_or_else(|| {
        ApiError::BadRequest(format!("county is not a numeric FIPS code: {}", request.county))
    })?;
    let percapita = request
        .percapita
        .as_f64()
        .ok_or_else(|| ApiError::BadRequest("percapita must be a finite number".to_string()))?;

    let features = [FeatureRow::new(county, percapita)];

    // Loaded on every request so a retrained artifact is picked up without a restart
    let model = HousingModel::load(&state.store, &state.model_path)
        .await
        .map_err(|e| {
            error!("Failed to load model from {}: {}", state.model_path, e);
            ApiError::ModelUnavailable(e.to_string())
        })?;

    let predictions = model.predict(&features).map_err(|e| match e {
        Error::Model(msg) => ApiError::PredictionFailure(msg),
        other => ApiError::Internal(other.to_string()),
    })?;

    let formatted: Vec<String> = predictions.iter().map(|p| format_currency(*p)).collect();
    let rendered = serde_json::to_string(&formatted)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    info!(
        "Predicted {} for county {} with per capita income {}",
        rendered, request.county, percapita
    );

    Ok(format!("Price predicted based on per capita income: {}", rendered))
}
