use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    pub model_path: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            port: std::env::var("ML_SERVICE_PORT")
                .or_else(|_| std::env::var("PORT"))
                .unwrap_or_else(|_| "5001".to_string())
                .parse()
                .map_err(|_| {
                    anyhow::anyhow!("ML_SERVICE_PORT must be a valid number between 1-65535")
                })?,
            model_path: match std::env::var("MODEL_PATH") {
                Ok(path) => {
                    if path.trim().is_empty() {
                        anyhow::bail!("MODEL_PATH cannot be empty");
                    }
                    path
                }
                Err(_) => "models/default_risk_model.json".to_string(),
            },
        };

        tracing::debug!("Model artifact path: {}", config.model_path);
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }
}
