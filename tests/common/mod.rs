use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use maguai::adapter::{Adapter, AdapterSettings};
use maguai::config::GeminiConfig;
use maguai::providers::GeminiProvider;

/// Adapter whose Gemini provider talks to `api_base`
#[allow(dead_code)]
pub fn adapter_for(api_base: String) -> Adapter {
    adapter_with_settings(api_base, AdapterSettings::default())
}

#[allow(dead_code)]
pub fn adapter_with_settings(api_base: String, settings: AdapterSettings) -> Adapter {
    let cfg = GeminiConfig {
        api_base,
        api_key: "test-key".to_string(),
        timeout_seconds: 5,
        ..Default::default()
    };
    let provider = GeminiProvider::new(cfg).expect("failed to create gemini provider");
    Adapter::new(Box::new(provider), settings)
}

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}
