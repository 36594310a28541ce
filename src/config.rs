//! Configuration module

use std::env;
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Serialized preprocessing transform
    pub transformer_path: PathBuf,

    /// Serialized regression model
    pub model_path: PathBuf,

    /// Environment (development, production)
    pub environment: String,
}

pub const DEFAULT_TRANSFORMER_PATH: &str = "./models/preprocessing_transformer_new.onnx";
pub const DEFAULT_MODEL_PATH: &str = "./models/xgboost_final_model_new.onnx";

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8501,
            transformer_path: PathBuf::from(DEFAULT_TRANSFORMER_PATH),
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            environment: "development".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),

            transformer_path: env::var("TRANSFORMER_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.transformer_path),

            model_path: env::var("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_path),

            environment: env::var("ENVIRONMENT")
                .unwrap_or(defaults.environment),
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
