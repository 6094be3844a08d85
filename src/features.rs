use crate::models::PredictionRequest;

/// Number of inputs the trained model consumes.
pub const FEATURE_COUNT: usize = 11;

/// Feature order expected by the model (based on training data).
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "payment_amount",
    "payment_amount_log",
    "payment_failed_before",
    "payment_hour",
    "payment_weekday",
    "payment_month",
    "patient_total_payments",
    "patient_failed_payments",
    "patient_avg_payment_amount",
    "clinic_default_rate",
    "risk_score",
];

/// Fixed-order numeric input for the model, matching `FEATURE_NAMES`.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    /// Assembles the feature vector from a validated request.
    ///
    /// `payment_amount_log` is the natural log of the amount when it is
    /// strictly positive and 0 otherwise, so non-positive amounts never hit
    /// a log domain error.
    pub fn from_request(request: &PredictionRequest) -> Self {
        let payment_amount = request.payment_amount;
        let payment_amount_log = if payment_amount > 0.0 {
            payment_amount.ln()
        } else {
            0.0
        };

        FeatureVector([
            payment_amount,
            payment_amount_log,
            request.payment_failed_before as f64,
            request.payment_hour as f64,
            request.payment_weekday as f64,
            request.payment_month as f64,
            request.patient_total_payments as f64,
            request.patient_failed_payments as f64,
            request.patient_avg_payment_amount,
            request.clinic_default_rate,
            request.risk_score,
        ])
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}
