//! Loading configurations from JSON and TOML.

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::{ConfigError, ConfigResult, Validate};
use crate::optimizer::OptimizerConfig;

/// Parses and validates a configuration from a JSON document.
pub fn from_json_str<T>(text: &str) -> ConfigResult<T>
where
    T: DeserializeOwned + Validate,
{
    let config: T = serde_json::from_str(text)?;
    config.validate_or_error()?;
    Ok(config)
}

/// Parses and validates a configuration from a TOML document.
pub fn from_toml_str<T>(text: &str) -> ConfigResult<T>
where
    T: DeserializeOwned + Validate,
{
    let config: T = toml::from_str(text)?;
    config.validate_or_error()?;
    Ok(config)
}

/// Reads a configuration file, choosing the format from its extension
/// (`.json` or `.toml`).
pub fn from_path<T>(path: impl AsRef<Path>) -> ConfigResult<T>
where
    T: DeserializeOwned + Validate,
{
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => from_json_str(&text),
        Some("toml") => from_toml_str(&text),
        other => Err(ConfigError::UnsupportedFormat(
            other.unwrap_or("<none>").to_string(),
        )),
    }
}

impl OptimizerConfig {
    /// Serializes to pretty-printed TOML.
    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimizer::ZeroInterestPolicy;
    use std::io::Write;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: OptimizerConfig =
            from_json_str(r#"{"initial_guess": 500000.0, "zero_interest": "reject"}"#).unwrap();
        assert_eq!(config.initial_guess, 500_000.0);
        assert_eq!(config.zero_interest, ZeroInterestPolicy::Reject);
        assert_eq!(config.max_iterations, 200);
    }

    #[test]
    fn test_toml_round_trip() {
        let original = OptimizerConfig::high_precision();
        let text = original.to_toml_string().unwrap();
        let parsed: OptimizerConfig = from_toml_str(&text).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_invalid_values_fail_validation() {
        let err = from_json_str::<OptimizerConfig>(r#"{"max_iterations": 0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "max_iterations"));
    }

    #[test]
    fn test_malformed_json() {
        let err = from_json_str::<OptimizerConfig>("{not json").unwrap_err();
        assert!(matches!(err, ConfigError::Deserialization(_)));
    }

    #[test]
    fn test_from_path_dispatches_on_extension() {
        let dir = tempfile::tempdir().unwrap();

        let toml_path = dir.path().join("optimizer.toml");
        let mut file = std::fs::File::create(&toml_path).unwrap();
        writeln!(file, "tolerance = 1e-9\nmax_iterations = 75").unwrap();
        let config: OptimizerConfig = from_path(&toml_path).unwrap();
        assert_eq!(config.tolerance, 1e-9);
        assert_eq!(config.max_iterations, 75);

        let yaml_path = dir.path().join("optimizer.yaml");
        std::fs::write(&yaml_path, "tolerance: 1e-9").unwrap();
        let err = from_path::<OptimizerConfig>(&yaml_path).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(ref ext) if ext == "yaml"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = from_path::<OptimizerConfig>("/nonexistent/capstack.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
