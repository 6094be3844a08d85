use crate::errors::AppError;
use crate::features::{FEATURE_COUNT, FEATURE_NAMES};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Classifier section of the model artifact: a logistic model whose output
/// is the probability of the default class.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierParams {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

/// Regressor section of the model artifact: a linear model whose output is
/// used as the score directly.
#[derive(Debug, Clone, Deserialize)]
pub struct RegressorParams {
    pub weights: Vec<f64>,
    pub bias: f64,
}

/// On-disk representation of the trained model.
///
/// Exactly one of `classifier` / `regressor` must be present; the `features`
/// list must match `FEATURE_NAMES` in count and order.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelArtifact {
    pub model_type: String,
    pub features: Vec<String>,
    #[serde(default)]
    pub classifier: Option<ClassifierParams>,
    #[serde(default)]
    pub regressor: Option<RegressorParams>,
}

/// Inference capability of the loaded model, resolved once at load time.
#[derive(Debug)]
pub enum Inference {
    /// Two-class probabilistic output; `infer` returns the probability
    /// assigned to the default class (index 1 of the class pair).
    Probabilistic {
        coefficients: Vec<f64>,
        intercept: f64,
    },
    /// Direct scalar output.
    Scalar { weights: Vec<f64>, bias: f64 },
}

impl Inference {
    fn input_len(&self) -> usize {
        match self {
            Inference::Probabilistic { coefficients, .. } => coefficients.len(),
            Inference::Scalar { weights, .. } => weights.len(),
        }
    }

    /// Runs inference over a feature slice.
    ///
    /// The slice length must match what the model was trained on.
    pub fn infer(&self, features: &[f64]) -> Result<f64, AppError> {
        if features.len() != self.input_len() {
            return Err(AppError::Inference(format!(
                "feature vector has {} values, model expects {}",
                features.len(),
                self.input_len()
            )));
        }

        match self {
            Inference::Probabilistic {
                coefficients,
                intercept,
            } => {
                let z: f64 = coefficients
                    .iter()
                    .zip(features)
                    .map(|(w, x)| w * x)
                    .sum::<f64>()
                    + intercept;
                Ok(sigmoid(z))
            }
            Inference::Scalar { weights, bias } => Ok(weights
                .iter()
                .zip(features)
                .map(|(w, x)| w * x)
                .sum::<f64>()
                + bias),
        }
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// The loaded, immutable model shared read-only across all requests.
#[derive(Debug)]
pub struct RiskModel {
    model_type: String,
    inference: Inference,
}

impl RiskModel {
    /// Validates an artifact and resolves its inference capability.
    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self, AppError> {
        if artifact.features != FEATURE_NAMES {
            return Err(AppError::ModelLoad(format!(
                "model artifact feature list does not match the expected {} feature names",
                FEATURE_COUNT
            )));
        }

        let inference = match (artifact.classifier, artifact.regressor) {
            (Some(classifier), None) => {
                if classifier.coefficients.len() != FEATURE_COUNT {
                    return Err(AppError::ModelLoad(format!(
                        "classifier has {} coefficients, expected {}",
                        classifier.coefficients.len(),
                        FEATURE_COUNT
                    )));
                }
                Inference::Probabilistic {
                    coefficients: classifier.coefficients,
                    intercept: classifier.intercept,
                }
            }
            (None, Some(regressor)) => {
                if regressor.weights.len() != FEATURE_COUNT {
                    return Err(AppError::ModelLoad(format!(
                        "regressor has {} weights, expected {}",
                        regressor.weights.len(),
                        FEATURE_COUNT
                    )));
                }
                Inference::Scalar {
                    weights: regressor.weights,
                    bias: regressor.bias,
                }
            }
            (Some(_), Some(_)) => {
                return Err(AppError::ModelLoad(
                    "model artifact declares both classifier and regressor sections".to_string(),
                ))
            }
            (None, None) => {
                return Err(AppError::ModelLoad(
                    "model artifact declares neither a classifier nor a regressor section"
                        .to_string(),
                ))
            }
        };

        Ok(Self {
            model_type: artifact.model_type,
            inference,
        })
    }

    pub fn model_type(&self) -> &str {
        &self.model_type
    }

    pub fn infer(&self, features: &[f64]) -> Result<f64, AppError> {
        self.inference.infer(features)
    }
}

/// Lazily-loading, process-lifetime holder for the model.
///
/// Constructed explicitly and injected into handlers through `AppState`.
/// The `OnceCell` guard ensures the artifact is read at most once even when
/// the first requests arrive concurrently.
pub struct ModelStore {
    path: PathBuf,
    loaded: OnceCell<Arc<RiskModel>>,
}

impl ModelStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            loaded: OnceCell::new(),
        }
    }

    /// Returns the cached model, loading it from disk on first call.
    pub async fn get(&self) -> Result<Arc<RiskModel>, AppError> {
        self.loaded
            .get_or_try_init(|| load_model(&self.path))
            .await
            .cloned()
    }

    /// Reports whether the model has been loaded, without triggering a load.
    pub fn is_loaded(&self) -> bool {
        self.loaded.get().is_some()
    }
}

async fn load_model(path: &Path) -> Result<Arc<RiskModel>, AppError> {
    let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
        AppError::ModelLoad(format!(
            "failed to read model artifact {}: {}",
            path.display(),
            e
        ))
    })?;

    let artifact: ModelArtifact = serde_json::from_str(&raw).map_err(|e| {
        AppError::ModelLoad(format!(
            "model artifact {} is not valid JSON: {}",
            path.display(),
            e
        ))
    })?;

    let model = RiskModel::from_artifact(artifact)?;
    tracing::info!(
        "Model loaded successfully from {} ({})",
        path.display(),
        model.model_type()
    );

    Ok(Arc::new(model))
}
