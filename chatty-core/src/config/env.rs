//! Environment variable interpolation for config files

use super::error::ConfigError;
use regex::{Captures, Regex};
use std::sync::LazyLock;

static ENV_VAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("valid env var pattern"));

/// Replace every `${VAR}` in `content` with the value from the environment.
pub fn interpolate_env_vars(content: &str) -> Result<String, ConfigError> {
    interpolate_with(content, |name| std::env::var(name).ok())
}

/// Same as [`interpolate_env_vars`] but resolves names through `lookup`.
///
/// Fails on the first reference that `lookup` cannot resolve.
pub fn interpolate_with<F>(content: &str, lookup: F) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(missing) = ENV_VAR_PATTERN
        .captures_iter(content)
        .map(|cap| cap[1].to_string())
        .find(|name| lookup(name).is_none())
    {
        return Err(ConfigError::EnvVarNotFound { var: missing });
    }

    let result = ENV_VAR_PATTERN.replace_all(content, |cap: &Captures| {
        lookup(&cap[1]).unwrap_or_default()
    });
    Ok(result.into_owned())
}
