/// `load_config` module: Loads a static YAML config and injects secrets from the environment.
///
/// This module is the only place where user YAML is parsed and mapped to the
/// strongly-typed configuration objects of `iac-docgen-core`.
///
/// # Responsibilities
/// - Parse the YAML file into [`CliConfig`]
/// - Apply command-line overrides and defaults to produce a [`PipelineConfig`]
/// - Read `OPENAI_API_KEY` (required), `OPENAI_MODEL` and `OPENAI_BASE_URL` from the
///   environment to produce a [`GenerationConfig`]
///
/// # Errors
/// File and YAML problems are `anyhow::Error` with context; missing secrets and
/// invalid values are [`ConfigError`]s. Both are fatal before any folder is processed.
///
/// Accepted YAML:
///
/// ```yaml
/// source_dir: ./infra
/// output_dir: ./output
/// concurrency: 1
/// generation:
///   model: gpt-4o
///   base_url: https://api.openai.com/v1
///   temperature: 0.2
///   timeout_secs: 300
/// ```
use anyhow::Result;
use iac_docgen_core::config::{GenerationConfig, PipelineConfig, DEFAULT_OUTPUT_DIR};
use iac_docgen_core::error::ConfigError;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const MODEL_ENV: &str = "OPENAI_MODEL";
pub const BASE_URL_ENV: &str = "OPENAI_BASE_URL";

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CliConfig {
    pub source_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub concurrency: Option<usize>,
    #[serde(default)]
    pub generation: GenerationSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenerationSection {
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub temperature: Option<f32>,
    pub timeout_secs: Option<u64>,
}

/// Values given on the command line; they win over the file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub source_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub concurrency: Option<usize>,
}

/// Loads a static YAML config file (no secrets).
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<CliConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => {
            info!(config_path = ?path_ref, "Config file read successfully");
            content
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    match serde_yaml::from_str::<Option<CliConfig>>(&config_content) {
        Ok(conf) => {
            info!(config_path = ?path_ref, "Parsed config YAML successfully");
            // An empty file is a valid, all-defaults config.
            Ok(conf.unwrap_or_default())
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            Err(anyhow::anyhow!("Failed to parse config YAML: {e}"))
        }
    }
}

impl CliConfig {
    /// Merges file values, overrides and defaults into the core pipeline config.
    pub fn pipeline_config(&self, overrides: &Overrides) -> Result<PipelineConfig, ConfigError> {
        let source_dir = overrides
            .source_dir
            .clone()
            .or_else(|| self.source_dir.clone())
            .ok_or_else(|| ConfigError::Invalid {
                field: "source_dir",
                reason: "set it in the config file or pass --source".to_string(),
            })?;
        let output_dir = overrides
            .output_dir
            .clone()
            .or_else(|| self.output_dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));
        let concurrency = overrides.concurrency.or(self.concurrency).unwrap_or(1);
        PipelineConfig::new(source_dir, output_dir, concurrency)
    }

    /// Builds the generation config, taking the API key from the environment.
    pub fn generation_config(&self) -> Result<GenerationConfig, ConfigError> {
        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| {
                error!(env = API_KEY_ENV, "API key missing in environment");
                ConfigError::MissingEnv(API_KEY_ENV)
            })?;
        let mut config = GenerationConfig::new(api_key)?;

        let section = &self.generation;
        if let Some(model) = env_or(MODEL_ENV, section.model.as_ref()) {
            config.model = model;
        }
        if let Some(base_url) = env_or(BASE_URL_ENV, section.base_url.as_ref()) {
            config.base_url = base_url;
        }
        if let Some(temperature) = section.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(ConfigError::Invalid {
                    field: "generation.temperature",
                    reason: format!("{temperature} is outside 0.0..=2.0"),
                });
            }
            config.temperature = Some(temperature);
        }
        if let Some(timeout_secs) = section.timeout_secs {
            if timeout_secs == 0 {
                return Err(ConfigError::Invalid {
                    field: "generation.timeout_secs",
                    reason: "must be at least 1".to_string(),
                });
            }
            config.timeout_secs = timeout_secs;
        }
        Ok(config)
    }
}

fn env_or(key: &str, file_value: Option<&String>) -> Option<String> {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .or_else(|| file_value.cloned())
}
