use crate::errors::AppError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Fields that must be present in every prediction request, in report order.
pub const REQUIRED_FIELDS: [&str; 9] = [
    "payment_amount",
    "payment_hour",
    "payment_weekday",
    "payment_month",
    "patient_total_payments",
    "patient_failed_payments",
    "patient_avg_payment_amount",
    "clinic_default_rate",
    "payment_failed_before",
];

/// Historical risk score assumed for patients with no prior record.
pub const DEFAULT_RISK_SCORE: f64 = 0.5;

// ============ API Request/Response Models ============

/// A validated prediction request: one payment event plus the associated
/// patient/clinic history.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionRequest {
    pub payment_amount: f64,
    pub payment_hour: i64,
    pub payment_weekday: i64,
    pub payment_month: i64,
    pub patient_total_payments: i64,
    pub patient_failed_payments: i64,
    pub patient_avg_payment_amount: f64,
    pub clinic_default_rate: f64,
    pub payment_failed_before: i64,
    /// Historical risk prior, `DEFAULT_RISK_SCORE` when absent.
    pub risk_score: f64,
}

impl PredictionRequest {
    /// Parses and validates a raw JSON request body.
    ///
    /// Presence of required fields is checked first so that every missing
    /// field is reported in a single response; per-field type coercion runs
    /// afterwards and fails on the first non-convertible value.
    pub fn from_json(data: &Value) -> Result<Self, AppError> {
        let body = match data.as_object() {
            Some(map) if !map.is_empty() => map,
            _ => return Err(AppError::BadRequest("No JSON data provided".to_string())),
        };

        let missing: Vec<String> = REQUIRED_FIELDS
            .iter()
            .filter(|field| !body.contains_key(**field))
            .map(|field| field.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(AppError::MissingFields(missing));
        }

        Ok(Self {
            payment_amount: float_field(body, "payment_amount")?,
            payment_hour: int_field(body, "payment_hour")?,
            payment_weekday: int_field(body, "payment_weekday")?,
            payment_month: int_field(body, "payment_month")?,
            patient_total_payments: int_field(body, "patient_total_payments")?,
            patient_failed_payments: int_field(body, "patient_failed_payments")?,
            patient_avg_payment_amount: float_field(body, "patient_avg_payment_amount")?,
            clinic_default_rate: float_field(body, "clinic_default_rate")?,
            payment_failed_before: int_field(body, "payment_failed_before")?,
            risk_score: match body.get("risk_score") {
                Some(value) => coerce_float("risk_score", value)?,
                None => DEFAULT_RISK_SCORE,
            },
        })
    }
}

fn float_field(body: &Map<String, Value>, field: &str) -> Result<f64, AppError> {
    let value = body
        .get(field)
        .ok_or_else(|| AppError::MissingFields(vec![field.to_string()]))?;
    coerce_float(field, value)
}

fn int_field(body: &Map<String, Value>, field: &str) -> Result<i64, AppError> {
    let value = body
        .get(field)
        .ok_or_else(|| AppError::MissingFields(vec![field.to_string()]))?;
    coerce_int(field, value)
}

/// Coerces a JSON value to a float. Numbers pass through; numeric strings
/// are parsed; anything else is a coercion error naming the field.
fn coerce_float(field: &str, value: &Value) -> Result<f64, AppError> {
    match value {
        Value::Number(n) => n.as_f64().ok_or_else(|| {
            AppError::Coercion(format!("value for field '{}' is out of range", field))
        }),
        Value::String(s) => s.trim().parse::<f64>().map_err(|_| {
            AppError::Coercion(format!(
                "could not convert string to float: {:?} (field '{}')",
                s, field
            ))
        }),
        other => Err(AppError::Coercion(format!(
            "field '{}' must be a number, got {}",
            field, other
        ))),
    }
}

/// Coerces a JSON value to an integer. Fractional numbers truncate toward
/// zero; strings must be integer literals.
fn coerce_int(field: &str, value: &Value) -> Result<i64, AppError> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(i)
            } else if let Some(f) = n.as_f64() {
                Ok(f.trunc() as i64)
            } else {
                Err(AppError::Coercion(format!(
                    "value for field '{}' is out of range",
                    field
                )))
            }
        }
        Value::String(s) => s.trim().parse::<i64>().map_err(|_| {
            AppError::Coercion(format!(
                "invalid integer literal {:?} (field '{}')",
                s, field
            ))
        }),
        other => Err(AppError::Coercion(format!(
            "field '{}' must be an integer, got {}",
            field, other
        ))),
    }
}

/// Coarse risk bucket derived from the risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Buckets a score with inclusive-low boundaries: exactly 0.3 is MEDIUM
    /// and exactly 0.7 is HIGH.
    pub fn from_score(score: f64) -> Self {
        if score < 0.3 {
            RiskLevel::Low
        } else if score < 0.7 {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
        }
    }
}

/// Outcome of scoring one request. `risk_score` is clamped but unrounded;
/// presentation rounding happens at the response layer.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PredictionResult {
    pub risk_score: f64,
    pub risk_level: RiskLevel,
}

/// Response payload for `POST /predict`.
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub success: bool,
    pub risk_score: f64,
    pub risk_level: RiskLevel,
}

/// Response payload for `GET /model-info`.
#[derive(Debug, Serialize)]
pub struct ModelInfoResponse {
    pub success: bool,
    pub model_type: String,
    pub features: Vec<&'static str>,
}
