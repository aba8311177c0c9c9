//! Configuration loading
//!
//! Files are merged through figment so environment variables can override
//! any field. Nested keys use `__` as separator, e.g.
//! `INVERTER_MONITOR_HEALTH__FAILURE_HISTORY=10`.

use crate::{Error, Result};
use figment::{
    providers::{Env, Format, Json, Toml, Yaml},
    Figment,
};
use serde::Deserialize;
use std::path::Path;

/// Figment holding a single config file, format chosen by extension
pub fn file_figment(path: &Path) -> Result<Figment> {
    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .ok_or_else(|| Error::config("Config file must have an extension"))?;

    let figment = match extension {
        "toml" => Figment::new().merge(Toml::file(path)),
        "yaml" | "yml" => Figment::new().merge(Yaml::file(path)),
        "json" => Figment::new().merge(Json::file(path)),
        _ => {
            return Err(Error::config(format!(
                "Unsupported config file format: {}",
                extension
            )))
        }
    };
    Ok(figment)
}

/// Load configuration from a specific file
pub fn load_config_from_file<T, P>(path: P) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::config(format!(
            "Config file not found: {}",
            path.display()
        )));
    }

    file_figment(path)?
        .extract()
        .map_err(|e| Error::config(format!("Failed to load configuration from file: {}", e)))
}

/// Load configuration from a file with prefixed environment overrides
///
/// Priority (highest to lowest):
/// 1. Environment variables starting with `env_prefix`
/// 2. The config file
/// 3. Default values of `T`
pub fn load_config<T, P>(path: P, env_prefix: &str) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::config(format!(
            "Config file not found: {}",
            path.display()
        )));
    }

    file_figment(path)?
        .merge(Env::prefixed(env_prefix).split("__"))
        .extract()
        .map_err(|e| Error::config(format!("Failed to load configuration: {}", e)))
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::fs;
    use tempfile::TempDir;

    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(default)]
    struct TestConfig {
        name: String,
        batch_size: usize,
        nested: NestedConfig,
    }

    #[derive(Debug, Default, Deserialize, PartialEq)]
    #[serde(default)]
    struct NestedConfig {
        enabled: bool,
        value: i32,
    }

    impl Default for TestConfig {
        fn default() -> Self {
            Self {
                name: "default".to_string(),
                batch_size: 20,
                nested: NestedConfig::default(),
            }
        }
    }

    #[test]
    fn test_load_yaml_and_json() {
        let temp_dir = TempDir::new().unwrap();
        let yaml = temp_dir.path().join("monitor.yaml");
        fs::write(&yaml, "name: deye\nnested:\n  enabled: true\n  value: 42\n").unwrap();
        let json = temp_dir.path().join("monitor.json");
        fs::write(&json, r#"{"name": "deye", "batch_size": 10}"#).unwrap();

        let from_yaml: TestConfig = load_config_from_file(&yaml).unwrap();
        assert_eq!(from_yaml.name, "deye");
        assert_eq!(from_yaml.batch_size, 20);
        assert_eq!(from_yaml.nested.value, 42);

        let from_json: TestConfig = load_config_from_file(&json).unwrap();
        assert_eq!(from_json.batch_size, 10);
        assert!(!from_json.nested.enabled);
    }

    #[test]
    fn test_rejects_unknown_extension_and_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let ini = temp_dir.path().join("monitor.ini");
        fs::write(&ini, "name = deye").unwrap();

        let err = load_config_from_file::<TestConfig, _>(&ini).unwrap_err();
        assert!(err.to_string().contains("Unsupported config file format"));

        let missing = temp_dir.path().join("missing.yaml");
        let err = load_config_from_file::<TestConfig, _>(&missing).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_env_overrides_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("monitor.toml", "name = \"deye\"\nbatch_size = 20\n")?;
            jail.set_env("TEST_MONITOR_BATCH_SIZE", "8");
            jail.set_env("TEST_MONITOR_NESTED__VALUE", "7");

            let config: TestConfig = load_config("monitor.toml", "TEST_MONITOR_").unwrap();
            assert_eq!(config.name, "deye");
            assert_eq!(config.batch_size, 8);
            assert_eq!(config.nested.value, 7);
            Ok(())
        });
    }
}
