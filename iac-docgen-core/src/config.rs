use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::error::ConfigError;

pub const DEFAULT_OUTPUT_DIR: &str = "output";
pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Where to read infrastructure folders from and where to put the artifacts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub source_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Folders processed at once. 1 means strictly sequential.
    pub concurrency: usize,
}

impl PipelineConfig {
    pub fn new(
        source_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        concurrency: usize,
    ) -> Result<Self, ConfigError> {
        if concurrency == 0 {
            return Err(ConfigError::Invalid {
                field: "concurrency",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(Self {
            source_dir: source_dir.into(),
            output_dir: output_dir.into(),
            concurrency,
        })
    }

    pub fn trace_loaded(&self) {
        info!(
            source_dir = %self.source_dir.display(),
            output_dir = %self.output_dir.display(),
            concurrency = self.concurrency,
            "Loaded PipelineConfig"
        );
        debug!(?self, "PipelineConfig loaded (full debug)");
    }
}

/// Everything the generation client needs, built once and handed to its constructor.
#[derive(Clone)]
pub struct GenerationConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub temperature: Option<f32>,
    pub timeout_secs: u64,
}

impl GenerationConfig {
    pub fn new(api_key: impl Into<String>) -> Result<Self, ConfigError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "api_key",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(Self {
            api_key,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        })
    }

    pub fn trace_loaded(&self) {
        info!(
            model = %self.model,
            base_url = %self.base_url,
            temperature = ?self.temperature,
            timeout_secs = self.timeout_secs,
            api_key_set = !self.api_key.is_empty(),
            "Loaded GenerationConfig"
        );
    }
}

// The API key never ends up in logs.
impl fmt::Debug for GenerationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("temperature", &self.temperature)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
