use iac_docgen::load_config::{load_config, CliConfig, Overrides, API_KEY_ENV, BASE_URL_ENV, MODEL_ENV};
use iac_docgen_core::error::ConfigError;
use serial_test::serial;
use std::env;
use std::fs::write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

fn config_file(yaml: &str) -> NamedTempFile {
    let file = NamedTempFile::new().expect("temp file");
    write(file.path(), yaml).unwrap();
    file
}

fn clear_generation_env() {
    env::remove_var(MODEL_ENV);
    env::remove_var(BASE_URL_ENV);
}

/// A full config file maps onto both core configuration objects.
#[test]
#[serial]
fn test_load_config_success_full_file() {
    clear_generation_env();
    let file = config_file(
        r#"
source_dir: ./infra
output_dir: ./docs/generated
concurrency: 2
generation:
  model: gpt-4o-mini
  base_url: http://localhost:8080/v1
  temperature: 0.2
  timeout_secs: 60
"#,
    );
    env::set_var(API_KEY_ENV, "sk-test");

    let config = load_config(file.path()).expect("Config should load");
    let pipeline = config.pipeline_config(&Overrides::default()).unwrap();
    let generation = config.generation_config().unwrap();

    assert_eq!(pipeline.source_dir, PathBuf::from("./infra"));
    assert_eq!(pipeline.output_dir, PathBuf::from("./docs/generated"));
    assert_eq!(pipeline.concurrency, 2);
    assert_eq!(generation.api_key, "sk-test");
    assert_eq!(generation.model, "gpt-4o-mini");
    assert_eq!(generation.base_url, "http://localhost:8080/v1");
    assert_eq!(generation.temperature, Some(0.2));
    assert_eq!(generation.timeout_secs, 60);
}

/// Defaults apply when the file only names the source directory.
#[test]
#[serial]
fn test_load_config_applies_defaults() {
    clear_generation_env();
    let file = config_file("source_dir: ./infra\n");
    env::set_var(API_KEY_ENV, "sk-test");

    let config = load_config(file.path()).unwrap();
    let pipeline = config.pipeline_config(&Overrides::default()).unwrap();
    let generation = config.generation_config().unwrap();

    assert_eq!(pipeline.output_dir, PathBuf::from("output"));
    assert_eq!(pipeline.concurrency, 1);
    assert_eq!(generation.model, "gpt-4o");
    assert_eq!(generation.base_url, "https://api.openai.com/v1");
    assert_eq!(generation.temperature, None);
    assert_eq!(generation.timeout_secs, 300);
}

/// Command line values win over the file, environment wins for model and base URL.
#[test]
#[serial]
fn test_overrides_and_environment_take_precedence() {
    let file = config_file("source_dir: ./infra\noutput_dir: ./out\ngeneration:\n  model: from-file\n");
    env::set_var(API_KEY_ENV, "sk-test");
    env::set_var(MODEL_ENV, "from-env");
    env::set_var(BASE_URL_ENV, "http://proxy.internal/v1");

    let config = load_config(file.path()).unwrap();
    let pipeline = config
        .pipeline_config(&Overrides {
            source_dir: Some(PathBuf::from("./other")),
            output_dir: None,
            concurrency: Some(4),
        })
        .unwrap();
    let generation = config.generation_config().unwrap();
    clear_generation_env();

    assert_eq!(pipeline.source_dir, PathBuf::from("./other"));
    assert_eq!(pipeline.output_dir, PathBuf::from("./out"));
    assert_eq!(pipeline.concurrency, 4);
    assert_eq!(generation.model, "from-env");
    assert_eq!(generation.base_url, "http://proxy.internal/v1");
}

#[test]
#[serial]
fn test_missing_api_key_is_a_configuration_error() {
    env::remove_var(API_KEY_ENV);
    let config = CliConfig::default();

    let err = config.generation_config().unwrap_err();

    assert!(
        matches!(err, ConfigError::MissingEnv(name) if name == API_KEY_ENV),
        "Expected MissingEnv, got {err:?}"
    );
}

#[test]
#[serial]
fn test_invalid_values_are_rejected() {
    env::set_var(API_KEY_ENV, "sk-test");

    let zero = config_file("source_dir: ./infra\nconcurrency: 0\n");
    let err = load_config(zero.path())
        .unwrap()
        .pipeline_config(&Overrides::default())
        .unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { field: "concurrency", .. }));

    let hot = config_file("generation:\n  temperature: 3.5\n");
    let err = load_config(hot.path()).unwrap().generation_config().unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { field: "generation.temperature", .. }));

    let no_source = CliConfig::default()
        .pipeline_config(&Overrides::default())
        .unwrap_err();
    assert!(matches!(no_source, ConfigError::Invalid { field: "source_dir", .. }));
}

#[test]
fn test_empty_file_is_an_all_defaults_config() {
    let file = config_file("");
    let config = load_config(file.path()).expect("empty config should load");
    assert!(config.source_dir.is_none());
    assert!(config.generation.model.is_none());
}

/// If the config file is not valid YAML, load_config errors and reports as such.
#[test]
fn test_load_config_errors_for_invalid_file() {
    let file = config_file("not-yaml: [:::");
    let msg = load_config(file.path()).unwrap_err().to_string();
    assert!(
        msg.contains("parse") || msg.contains("YAML"),
        "Parse error expected, got: {msg}"
    );
}

#[test]
fn test_load_config_rejects_unknown_keys() {
    let file = config_file("source_dir: ./infra\nsources: []\n");
    let msg = load_config(file.path()).unwrap_err().to_string();
    assert!(msg.contains("YAML"), "Parse error expected, got: {msg}");
}

#[test]
fn test_load_config_errors_for_missing_file() {
    let msg = load_config("/definitely/not/here.yaml")
        .unwrap_err()
        .to_string();
    assert!(msg.contains("Failed to read config file"), "got: {msg}");
}
