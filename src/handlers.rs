use crate::errors::{AppError, ResultExt};
use crate::features::{FeatureVector, FEATURE_NAMES};
use crate::model::ModelStore;
use crate::models::{ModelInfoResponse, PredictResponse, PredictionRequest};
use crate::scoring;
use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use std::sync::Arc;

/// Shared application state injected into handlers.
pub struct AppState {
    /// Holder for the trained model, loaded lazily and cached for the
    /// process lifetime.
    pub model: ModelStore,
}

/// GET /health
///
/// Health check endpoint. Reports whether the model has been loaded without
/// ever triggering a load itself.
///
/// # Returns
///
/// * `(StatusCode, Json<serde_json::Value>)` - HTTP 200 OK with health status JSON.
pub async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "model_loaded": state.model.is_loaded(),
        })),
    )
}

/// POST /predict
///
/// Predicts payment default risk for a single payment event.
///
/// The body is a JSON mapping with the nine required fields plus an optional
/// `risk_score` prior. Missing fields are all reported at once as a 400;
/// empty or unparseable bodies are a 400 with "No JSON data provided";
/// coercion, model-load, and inference failures surface as 500s.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `payload` - The raw JSON body, `None` when absent or unparseable.
///
/// # Returns
///
/// * `Result<Json<PredictResponse>, AppError>` - The rounded risk score and
///   bucketed risk level, or an error.
pub async fn predict(
    State(state): State<Arc<AppState>>,
    payload: Option<Json<Value>>,
) -> Result<Json<PredictResponse>, AppError> {
    tracing::info!("POST /predict");

    let Json(data) =
        payload.ok_or_else(|| AppError::BadRequest("No JSON data provided".to_string()))?;

    let request = PredictionRequest::from_json(&data)?;
    let features = FeatureVector::from_request(&request);

    let model = state.model.get().await?;
    let prediction = scoring::score(&model, &features)?;

    tracing::info!(
        "Prediction complete: score={:.4} level={}",
        prediction.risk_score,
        prediction.risk_level.as_str()
    );

    Ok(Json(PredictResponse {
        success: true,
        risk_score: scoring::round4(prediction.risk_score),
        risk_level: prediction.risk_level,
    }))
}

/// GET /model-info
///
/// Describes the loaded model: its type and the ordered feature names it
/// consumes. Triggers a lazy load when the model is not yet in memory.
///
/// # Arguments
///
/// * `state` - The application state.
///
/// # Returns
///
/// * `Result<Json<ModelInfoResponse>, AppError>` - The model description or an error.
pub async fn model_info(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ModelInfoResponse>, AppError> {
    tracing::info!("GET /model-info");

    let model = state
        .model
        .get()
        .await
        .context("model unavailable for /model-info")?;

    Ok(Json(ModelInfoResponse {
        success: true,
        model_type: model.model_type().to_string(),
        features: FEATURE_NAMES.to_vec(),
    }))
}
