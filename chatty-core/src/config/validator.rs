//! Validation of loaded config files

use super::error::ValidationError;
use super::schema::ChattyConfig;
use crate::protocol::ChatOptions;
use url::Url;

/// Checks a [`ChattyConfig`] field by field, reporting the first failure.
#[derive(Debug, Default)]
pub struct ConfigValidator;

impl ConfigValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(&self, config: &ChattyConfig) -> Result<(), ValidationError> {
        if let Some(base_url) = &config.base_url {
            self.validate_base_url(base_url)?;
        }

        if let Some(model) = &config.model {
            if model.trim().is_empty() {
                return Err(ValidationError::required("model"));
            }
        }

        if let Some(t) = config.temperature {
            if !ChatOptions::TEMPERATURE_RANGE.contains(&t) {
                return Err(ValidationError::out_of_range(
                    "temperature",
                    format!("{} is outside 0.0..=2.0", t),
                ));
            }
        }

        if let Some(p) = config.top_p {
            if !ChatOptions::TOP_P_RANGE.contains(&p) {
                return Err(ValidationError::out_of_range(
                    "top_p",
                    format!("{} is outside 0.0..=1.0", p),
                ));
            }
        }

        Ok(())
    }

    fn validate_base_url(&self, base_url: &str) -> Result<(), ValidationError> {
        let url = Url::parse(base_url)
            .map_err(|e| ValidationError::invalid_url("base_url", e.to_string()))?;

        match url.scheme() {
            "http" | "https" => Ok(()),
            other => Err(ValidationError::invalid_url(
                "base_url",
                format!("unsupported scheme '{}'", other),
            )),
        }
    }
}
