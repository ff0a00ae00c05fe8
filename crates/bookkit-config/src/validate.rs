//! Validation helpers for loaded configuration.

use crate::error::{ConfigError, ConfigResult};
use crate::loader::ENV_TOKEN;
use crate::model::{AuthSettings, Credentials, ManagerConfig};

/// Check value ranges across all sections.
///
/// Credentials are not required here; they are resolved with
/// [`AuthSettings::credentials`] only when a session is needed.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] for the first offending value.
pub fn validate(config: &ManagerConfig) -> ConfigResult<()> {
    if config.retry.max_attempts == 0 {
        return Err(ConfigError::invalid(
            "retry",
            "max_attempts",
            Some("0".to_string()),
            "must be at least 1",
        ));
    }
    if let Some(status) = config
        .retry
        .retryable_statuses
        .iter()
        .find(|status| !(100..=599).contains(*status))
    {
        return Err(ConfigError::invalid(
            "retry",
            "retryable_statuses",
            Some(status.to_string()),
            "must be HTTP status codes between 100 and 599",
        ));
    }
    if config.http.timeout_secs == 0 {
        return Err(ConfigError::invalid(
            "http",
            "timeout_secs",
            Some("0".to_string()),
            "must be at least 1",
        ));
    }
    if config.logging.level.trim().is_empty() {
        return Err(ConfigError::invalid(
            "logging",
            "level",
            None,
            "must not be empty",
        ));
    }
    Ok(())
}

impl AuthSettings {
    /// Resolve which credentials to authenticate with.
    ///
    /// A pre-issued token wins; otherwise both access codes and a token URI
    /// must be present.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingCredentials`] when neither option is
    /// complete.
    pub fn credentials(&self) -> ConfigResult<Credentials> {
        if let Some(token) = self.token.as_ref().filter(|token| !token.is_empty()) {
            return Ok(Credentials::Token(token.clone()));
        }
        match (&self.token_uri, &self.access_code1, &self.access_code2) {
            (Some(token_uri), Some(access_code1), Some(access_code2)) => {
                Ok(Credentials::AccessCodes {
                    token_uri: token_uri.clone(),
                    access_code1: access_code1.clone(),
                    access_code2: access_code2.clone(),
                    scope: self.scope.clone(),
                })
            }
            _ => Err(ConfigError::MissingCredentials {
                token_env: ENV_TOKEN,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() -> ConfigResult<()> {
        validate(&ManagerConfig::default())
    }

    #[test]
    fn zero_attempts_are_rejected() {
        let mut config = ManagerConfig::default();
        config.retry.max_attempts = 0;
        let err = validate(&config).expect_err("zero attempts");
        assert!(matches!(
            err,
            ConfigError::InvalidField {
                field: "max_attempts",
                ..
            }
        ));
    }

    #[test]
    fn out_of_range_status_is_rejected() {
        let mut config = ManagerConfig::default();
        config.retry.retryable_statuses = vec![502, 42];
        let err = validate(&config).expect_err("bad status");
        assert!(matches!(
            err,
            ConfigError::InvalidField {
                field: "retryable_statuses",
                value: Some(ref v),
                ..
            } if v == "42"
        ));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let mut config = ManagerConfig::default();
        config.http.timeout_secs = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn token_takes_precedence_over_access_codes() -> ConfigResult<()> {
        let auth = AuthSettings {
            token: Some("issued".to_string()),
            token_uri: Some("https://oidc.example/grantToken".to_string()),
            access_code1: Some("a".to_string()),
            access_code2: Some("b".to_string()),
            ..AuthSettings::default()
        };
        assert_eq!(auth.credentials()?, Credentials::Token("issued".to_string()));
        Ok(())
    }

    #[test]
    fn access_codes_require_token_uri() -> ConfigResult<()> {
        let mut auth = AuthSettings {
            access_code1: Some("a".to_string()),
            access_code2: Some("b".to_string()),
            ..AuthSettings::default()
        };
        assert!(matches!(
            auth.credentials(),
            Err(ConfigError::MissingCredentials { .. })
        ));

        auth.token_uri = Some("https://oidc.example/grantToken".to_string());
        match auth.credentials()? {
            Credentials::AccessCodes {
                token_uri, scope, ..
            } => {
                assert_eq!(token_uri, "https://oidc.example/grantToken");
                assert_eq!(scope, crate::defaults::SCOPE);
            }
            other => panic!("unexpected credentials {other:?}"),
        }
        Ok(())
    }
}
