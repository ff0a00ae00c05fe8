//! Configuration layering: defaults, optional JSON file, environment.
//!
//! # Design
//! - The environment is read through an injected lookup so loading never
//!   depends on, or mutates, process-wide state in tests.
//! - The resulting [`ManagerConfig`] is validated before it is returned and is
//!   then passed explicitly to every component.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{ConfigError, ConfigResult};
use crate::model::{LogFormatSetting, ManagerConfig};
use crate::validate::validate;

/// First access code for the OIDC password grant.
pub const ENV_ACCESS_CODE1: &str = "BOOKKIT_ACCESS_CODE1";
/// Second access code for the OIDC password grant.
pub const ENV_ACCESS_CODE2: &str = "BOOKKIT_ACCESS_CODE2";
/// Pre-issued bearer token.
pub const ENV_TOKEN: &str = "BOOKKIT_TOKEN";
/// OIDC token endpoint.
pub const ENV_TOKEN_URI: &str = "BOOKKIT_TOKEN_URI";
/// Log level directive.
pub const ENV_LOG_LEVEL: &str = "BOOKKIT_LOG_LEVEL";
/// Log format (`pretty` or `json`).
pub const ENV_LOG_FORMAT: &str = "BOOKKIT_LOG_FORMAT";

/// Load configuration using the process environment.
///
/// # Errors
///
/// Returns an error when the file cannot be read or parsed, or when a value
/// fails validation.
pub fn load(path: Option<&Path>) -> ConfigResult<ManagerConfig> {
    load_with_env(path, |name| std::env::var(name).ok())
}

/// Load configuration, resolving environment overrides through `env`.
///
/// # Errors
///
/// Returns an error when the file cannot be read or parsed, or when a value
/// fails validation.
pub fn load_with_env<F>(path: Option<&Path>, env: F) -> ConfigResult<ManagerConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => read_file(path)?,
        None => ManagerConfig::default(),
    };
    apply_env(&mut config, &env)?;
    validate(&config)?;
    Ok(config)
}

fn read_file(path: &Path) -> ConfigResult<ManagerConfig> {
    debug!(path = %path.display(), "loading configuration file");
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn apply_env<F>(config: &mut ManagerConfig, env: &F) -> ConfigResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |name: &str| env(name).filter(|value| !value.trim().is_empty());

    if let Some(value) = non_empty(ENV_ACCESS_CODE1) {
        config.auth.access_code1 = Some(value);
    }
    if let Some(value) = non_empty(ENV_ACCESS_CODE2) {
        config.auth.access_code2 = Some(value);
    }
    if let Some(value) = non_empty(ENV_TOKEN) {
        config.auth.token = Some(value);
    }
    if let Some(value) = non_empty(ENV_TOKEN_URI) {
        config.auth.token_uri = Some(value);
    }
    if let Some(value) = non_empty(ENV_LOG_LEVEL) {
        config.logging.level = value;
    }
    if let Some(value) = non_empty(ENV_LOG_FORMAT) {
        config.logging.format = Some(parse_log_format(&value)?);
    }
    Ok(())
}

fn parse_log_format(value: &str) -> ConfigResult<LogFormatSetting> {
    match value.trim().to_ascii_lowercase().as_str() {
        "pretty" => Ok(LogFormatSetting::Pretty),
        "json" => Ok(LogFormatSetting::Json),
        _ => Err(ConfigError::invalid(
            "logging",
            "format",
            Some(value.to_string()),
            "must be 'pretty' or 'json'",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_apply_without_file_or_env() -> ConfigResult<()> {
        let config = load_with_env(None, env_from(&[]))?;
        assert_eq!(config, ManagerConfig::default());
        Ok(())
    }

    #[test]
    fn file_values_are_loaded() -> Result<(), Box<dyn std::error::Error>> {
        let mut file = tempfile::NamedTempFile::new()?;
        write!(
            file,
            r#"{{"retry": {{"max_attempts": 3, "retryable_statuses": [502, 503]}},
                "http": {{"timeout_secs": 5}},
                "auth": {{"token_uri": "https://oidc.example/grantToken"}}}}"#
        )?;

        let config = load_with_env(Some(file.path()), env_from(&[]))?;
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry.retryable_statuses, vec![502, 503]);
        assert_eq!(config.retry.backoff_ms, 2_000);
        assert_eq!(config.http.timeout_secs, 5);
        assert_eq!(
            config.auth.token_uri.as_deref(),
            Some("https://oidc.example/grantToken")
        );
        Ok(())
    }

    #[test]
    fn environment_overrides_file() -> Result<(), Box<dyn std::error::Error>> {
        let mut file = tempfile::NamedTempFile::new()?;
        write!(
            file,
            r#"{{"auth": {{"access_code1": "from-file"}}, "logging": {{"level": "warn"}}}}"#
        )?;

        let env = env_from(&[
            (ENV_ACCESS_CODE1, "from-env"),
            (ENV_ACCESS_CODE2, "second"),
            (ENV_TOKEN, "  "),
            (ENV_LOG_LEVEL, "debug"),
            (ENV_LOG_FORMAT, "JSON"),
        ]);
        let config = load_with_env(Some(file.path()), env)?;
        assert_eq!(config.auth.access_code1.as_deref(), Some("from-env"));
        assert_eq!(config.auth.access_code2.as_deref(), Some("second"));
        assert_eq!(config.auth.token, None);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, Some(LogFormatSetting::Json));
        Ok(())
    }

    #[test]
    fn invalid_log_format_is_rejected() {
        let err = load_with_env(None, env_from(&[(ENV_LOG_FORMAT, "xml")]))
            .expect_err("unknown format should fail");
        assert!(matches!(
            err,
            ConfigError::InvalidField {
                section: "logging",
                field: "format",
                ..
            }
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_with_env(Some(Path::new("/definitely/missing.json")), env_from(&[]))
            .expect_err("missing file should fail");
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("/definitely/missing.json"));
    }

    #[test]
    fn malformed_file_is_a_parse_error() -> Result<(), Box<dyn std::error::Error>> {
        let mut file = tempfile::NamedTempFile::new()?;
        write!(file, "{{ not json")?;
        let err = load_with_env(Some(file.path()), env_from(&[])).expect_err("parse failure");
        assert!(matches!(err, ConfigError::Parse { .. }));
        Ok(())
    }
}
