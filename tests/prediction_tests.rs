/// Unit tests for the prediction pipeline
/// Tests request validation, feature assembly, and score bucketing
use rust_risk_api::errors::AppError;
use rust_risk_api::features::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
use rust_risk_api::model::{ModelArtifact, RiskModel};
use rust_risk_api::models::{PredictionRequest, RiskLevel, DEFAULT_RISK_SCORE};
use rust_risk_api::scoring;
use serde_json::json;

fn valid_body() -> serde_json::Value {
    json!({
        "payment_amount": 100.0,
        "payment_hour": 14,
        "payment_weekday": 2,
        "payment_month": 6,
        "patient_total_payments": 10,
        "patient_failed_payments": 1,
        "patient_avg_payment_amount": 95.0,
        "clinic_default_rate": 0.1,
        "payment_failed_before": 0
    })
}

#[cfg(test)]
mod feature_assembly_tests {
    use super::*;

    #[test]
    fn test_feature_order_matches_model_contract() {
        let request = PredictionRequest::from_json(&valid_body()).unwrap();
        let features = FeatureVector::from_request(&request);

        let values = features.as_slice();
        assert_eq!(values.len(), FEATURE_COUNT);
        assert_eq!(values[0], 100.0);
        assert_eq!(values[1], 100.0f64.ln());
        assert_eq!(values[2], 0.0); // payment_failed_before
        assert_eq!(values[3], 14.0); // payment_hour
        assert_eq!(values[4], 2.0); // payment_weekday
        assert_eq!(values[5], 6.0); // payment_month
        assert_eq!(values[6], 10.0); // patient_total_payments
        assert_eq!(values[7], 1.0); // patient_failed_payments
        assert_eq!(values[8], 95.0);
        assert_eq!(values[9], 0.1);
        assert_eq!(values[10], DEFAULT_RISK_SCORE);
    }

    #[test]
    fn test_log_transform_is_zero_for_non_positive_amounts() {
        for amount in [0.0, -1.0, -250.5] {
            let mut body = valid_body();
            body["payment_amount"] = json!(amount);
            let request = PredictionRequest::from_json(&body).unwrap();
            let features = FeatureVector::from_request(&request);
            assert_eq!(features.as_slice()[1], 0.0, "amount {}", amount);
        }
    }

    #[test]
    fn test_omitted_risk_score_is_equivalent_to_half() {
        let without = PredictionRequest::from_json(&valid_body()).unwrap();

        let mut body = valid_body();
        body["risk_score"] = json!(0.5);
        let with = PredictionRequest::from_json(&body).unwrap();

        assert_eq!(
            FeatureVector::from_request(&without),
            FeatureVector::from_request(&with)
        );
    }

    #[test]
    fn test_feature_names_include_derived_log_feature() {
        assert_eq!(FEATURE_NAMES.len(), FEATURE_COUNT);
        assert_eq!(FEATURE_NAMES[1], "payment_amount_log");
    }
}

#[cfg(test)]
mod validation_tests {
    use super::*;

    #[test]
    fn test_all_missing_fields_are_enumerated() {
        let mut body = valid_body();
        body.as_object_mut().unwrap().remove("payment_amount");
        body.as_object_mut().unwrap().remove("payment_month");

        let err = PredictionRequest::from_json(&body).unwrap_err();
        match err {
            AppError::MissingFields(fields) => {
                assert_eq!(fields, vec!["payment_amount", "payment_month"]);
            }
            other => panic!("expected MissingFields, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_object_is_rejected_as_no_data() {
        let err = PredictionRequest::from_json(&json!({})).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(msg) if msg == "No JSON data provided"));
    }

    #[test]
    fn test_non_object_bodies_are_rejected_as_no_data() {
        for body in [json!(null), json!([1, 2, 3]), json!("payload"), json!(42)] {
            let err = PredictionRequest::from_json(&body).unwrap_err();
            assert!(matches!(err, AppError::BadRequest(_)), "body {}", body);
        }
    }

    #[test]
    fn test_numeric_strings_are_coerced() {
        let mut body = valid_body();
        body["payment_hour"] = json!("14");
        body["payment_amount"] = json!("100.0");

        let request = PredictionRequest::from_json(&body).unwrap();
        assert_eq!(request.payment_hour, 14);
        assert_eq!(request.payment_amount, 100.0);
    }

    #[test]
    fn test_non_numeric_string_is_a_coercion_error() {
        let mut body = valid_body();
        body["payment_hour"] = json!("not-a-number");

        let err = PredictionRequest::from_json(&body).unwrap_err();
        match err {
            AppError::Coercion(msg) => assert!(msg.contains("payment_hour")),
            other => panic!("expected Coercion, got {:?}", other),
        }
    }

    #[test]
    fn test_fractional_string_is_not_a_valid_integer() {
        let mut body = valid_body();
        body["payment_hour"] = json!("14.5");
        assert!(matches!(
            PredictionRequest::from_json(&body),
            Err(AppError::Coercion(_))
        ));
    }

    #[test]
    fn test_bool_is_not_a_valid_number() {
        let mut body = valid_body();
        body["payment_failed_before"] = json!(true);
        assert!(matches!(
            PredictionRequest::from_json(&body),
            Err(AppError::Coercion(_))
        ));
    }

    #[test]
    fn test_semantic_ranges_are_not_validated() {
        // Out-of-range hour/weekday/month pass through untouched.
        let mut body = valid_body();
        body["payment_hour"] = json!(99);
        body["payment_weekday"] = json!(-3);
        body["payment_month"] = json!(13);

        let request = PredictionRequest::from_json(&body).unwrap();
        assert_eq!(request.payment_hour, 99);
        assert_eq!(request.payment_weekday, -3);
        assert_eq!(request.payment_month, 13);
    }
}

#[cfg(test)]
mod risk_level_tests {
    use super::*;

    #[test]
    fn test_bucket_boundaries_are_inclusive_low() {
        assert_eq!(RiskLevel::from_score(0.0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(0.2999), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(0.3), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(0.6999), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(0.7), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(1.0), RiskLevel::High);
    }

    #[test]
    fn test_as_str() {
        assert_eq!(RiskLevel::Low.as_str(), "LOW");
        assert_eq!(RiskLevel::Medium.as_str(), "MEDIUM");
        assert_eq!(RiskLevel::High.as_str(), "HIGH");
    }
}

#[cfg(test)]
mod scoring_tests {
    use super::*;

    fn scalar_model(weights: Vec<f64>, bias: f64) -> RiskModel {
        let artifact: ModelArtifact = serde_json::from_value(json!({
            "model_type": "LinearRegression",
            "features": FEATURE_NAMES,
            "regressor": { "weights": weights, "bias": bias }
        }))
        .unwrap();
        RiskModel::from_artifact(artifact).unwrap()
    }

    fn features() -> FeatureVector {
        let request = PredictionRequest::from_json(&valid_body()).unwrap();
        FeatureVector::from_request(&request)
    }

    #[test]
    fn test_score_above_one_is_clamped_high() {
        let model = scalar_model(vec![0.0; FEATURE_COUNT], 5.0);
        let result = scoring::score(&model, &features()).unwrap();
        assert_eq!(result.risk_score, 1.0);
        assert_eq!(result.risk_level, RiskLevel::High);
    }

    #[test]
    fn test_score_below_zero_is_clamped_low() {
        let model = scalar_model(vec![0.0; FEATURE_COUNT], -3.0);
        let result = scoring::score(&model, &features()).unwrap();
        assert_eq!(result.risk_score, 0.0);
        assert_eq!(result.risk_level, RiskLevel::Low);
    }

    #[test]
    fn test_bucketing_uses_unrounded_score() {
        // 0.29999 buckets LOW even though it rounds up to 0.3.
        let model = scalar_model(vec![0.0; FEATURE_COUNT], 0.29999);
        let result = scoring::score(&model, &features()).unwrap();
        assert_eq!(result.risk_level, RiskLevel::Low);
        assert_eq!(scoring::round4(result.risk_score), 0.3);
    }

    #[test]
    fn test_probabilistic_model_scores_land_in_unit_interval() {
        let artifact: ModelArtifact = serde_json::from_value(json!({
            "model_type": "LogisticRegression",
            "features": FEATURE_NAMES,
            "classifier": { "coefficients": vec![0.1; FEATURE_COUNT], "intercept": -0.5 }
        }))
        .unwrap();
        let model = RiskModel::from_artifact(artifact).unwrap();

        let result = scoring::score(&model, &features()).unwrap();
        assert!((0.0..=1.0).contains(&result.risk_score));
    }
}
