//! Configuration for chatty
//!
//! A config file is optional. When present it may carry the base URL, API
//! key, default model and sampling options; `${VAR}` references are expanded
//! from the environment before parsing.

mod env;
mod error;
mod schema;
mod secrets;
mod validator;

pub use env::{interpolate_env_vars, interpolate_with};
pub use error::{ConfigError, ConfigResult, ValidationError, ValidationErrorKind};
pub use schema::{ChattyConfig, ClientConfig, USER_AGENT};
pub use secrets::SecretString;
pub use validator::ConfigValidator;

use std::fs;
use std::path::Path;

fn read(path: &Path) -> Result<String, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError {
        path: path.to_string_lossy().to_string(),
        source: e,
    })?;
    env::interpolate_env_vars(&content)
}

/// Load a configuration from a YAML file
pub fn load_from_yaml<P: AsRef<Path>>(path: P) -> Result<ChattyConfig, ConfigError> {
    let path = path.as_ref();
    let content = read(path)?;

    let config: ChattyConfig =
        serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_string_lossy().to_string(),
            line: e.location().map(|l| l.line()),
            column: e.location().map(|l| l.column()),
            message: e.to_string(),
        })?;

    ConfigValidator::new().validate(&config)?;
    Ok(config)
}

/// Load a configuration from a JSON file
pub fn load_from_json<P: AsRef<Path>>(path: P) -> Result<ChattyConfig, ConfigError> {
    let path = path.as_ref();
    let content = read(path)?;

    let config: ChattyConfig =
        serde_json::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_string_lossy().to_string(),
            line: Some(e.line()),
            column: Some(e.column()),
            message: e.to_string(),
        })?;

    ConfigValidator::new().validate(&config)?;
    Ok(config)
}

/// Load a config file, picking the format from its extension.
///
/// `.json` is read as JSON; anything else as YAML.
pub fn load<P: AsRef<Path>>(path: P) -> Result<ChattyConfig, ConfigError> {
    let path = path.as_ref();
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => load_from_json(path),
        _ => load_from_yaml(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml_document() {
        let yaml = r#"
base_url: https://api.groq.com/openai/v1
model: llama-3.1-8b-instant
temperature: 0.2
"#;
        let config: ChattyConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.model.as_deref(), Some("llama-3.1-8b-instant"));
        assert_eq!(config.options().temperature, Some(0.2));
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let yaml = "stream: true\n";
        assert!(serde_yaml::from_str::<ChattyConfig>(yaml).is_err());
    }
}
