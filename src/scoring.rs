use crate::errors::AppError;
use crate::features::FeatureVector;
use crate::model::RiskModel;
use crate::models::{PredictionResult, RiskLevel};

/// Runs the model over an assembled feature vector and buckets the result.
///
/// The raw model output is clamped into [0, 1] before bucketing. Rounding
/// for the response payload is a separate step (`round4`) so that bucketing
/// always sees the unrounded value.
pub fn score(model: &RiskModel, features: &FeatureVector) -> Result<PredictionResult, AppError> {
    let raw = model.infer(features.as_slice())?;
    let risk_score = raw.clamp(0.0, 1.0);

    Ok(PredictionResult {
        risk_score,
        risk_level: RiskLevel::from_score(risk_score),
    })
}

/// Rounds a score to 4 decimal places for the response payload.
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
