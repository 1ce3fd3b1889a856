use super::types::*;
use crate::config::{expand_env_vars, ENV_VAR_PATTERN};
use axum::http::HeaderName;
use regex::Regex;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation failed:\n{}", .0.join("\n"))]
    ValidationList(Vec<String>),

    #[error("validation failed: {0}")]
    Validation(String),
}

pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let yaml_string = fs::read_to_string(path).map_err(|e| {
        ConfigError::Io(std::io::Error::new(
            e.kind(),
            format!("failed to read config file '{}': {}", path.display(), e),
        ))
    })?;

    parse_config(&yaml_string)
}

/// Parse and validate a config from YAML text.
///
/// `$env{VAR}` references are expanded first. An empty document yields the
/// default config.
pub fn parse_config(yaml: &str) -> Result<Config, ConfigError> {
    let yaml = expand_env_vars(yaml);
    check_unexpanded_vars(&yaml)?;

    let config: Config = if yaml.trim().is_empty() {
        Config::default()
    } else {
        serde_yaml::from_str(&yaml)?
    };

    validate_config(&config)?;
    Ok(config)
}

fn check_unexpanded_vars(yaml: &str) -> Result<(), ConfigError> {
    let re = Regex::new(ENV_VAR_PATTERN).map_err(|e| ConfigError::Validation(e.to_string()))?;
    let mut unexpanded: Vec<&str> = re
        .captures_iter(yaml)
        .filter_map(|cap| cap.get(1).map(|m| m.as_str()))
        .collect();

    if unexpanded.is_empty() {
        return Ok(());
    }

    unexpanded.sort_unstable();
    unexpanded.dedup();

    Err(ConfigError::Validation(format!(
        "environment variables are not set: {}",
        unexpanded.join(", ")
    )))
}

fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let mut errors = Vec::new();

    if config.server.listen.parse::<SocketAddr>().is_err() {
        errors.push(format!(
            "server.listen: '{}' is not a valid socket address",
            config.server.listen
        ));
    }

    if config.server.max_body_bytes == 0 {
        errors.push("server.max_body_bytes must be greater than 0".to_string());
    }

    if config.request_id.headers.is_empty() {
        errors.push("request_id.headers must contain at least one header name".to_string());
    }

    for (i, header) in config.request_id.headers.iter().enumerate() {
        if HeaderName::from_bytes(header.as_bytes()).is_err() {
            errors.push(format!(
                "request_id.headers[{}]: '{}' is not a valid header name",
                i, header
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationList(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_default() {
        let config = parse_config("").unwrap();
        assert_eq!(config.server.listen, "0.0.0.0:8888");
        assert_eq!(config.request_id.prefix, "req-");
        assert_eq!(config.request_id.headers.len(), 3);
    }

    #[test]
    fn test_partial_sections_keep_defaults() {
        let config = parse_config("server:\n  listen: \"127.0.0.1:9000\"\n").unwrap();
        assert_eq!(config.server.listen, "127.0.0.1:9000");
        assert_eq!(config.server.max_body_bytes, 2 * 1024 * 1024);
        assert_eq!(config.logging.filter, "lognorm=info");
    }

    #[test]
    fn test_collects_all_errors() {
        let yaml = r#"
server:
  listen: "not-an-address"
  max_body_bytes: 0
request_id:
  headers: ["bad header"]
"#;
        match parse_config(yaml) {
            Err(ConfigError::ValidationList(errors)) => assert_eq!(errors.len(), 3),
            other => panic!("expected validation errors, got {:?}", other),
        }
    }

    #[test]
    fn test_unset_env_var_is_reported() {
        let err = parse_config("server:\n  listen: \"$env{LOGNORM_TEST_UNSET_LISTEN}\"\n")
            .unwrap_err();
        assert!(err.to_string().contains("LOGNORM_TEST_UNSET_LISTEN"));
    }

    #[test]
    fn test_env_var_expanded() {
        std::env::set_var("LOGNORM_TEST_PREFIX", "trace-");
        let config = parse_config("request_id:\n  prefix: \"$env{LOGNORM_TEST_PREFIX}\"\n").unwrap();
        assert_eq!(config.request_id.prefix, "trace-");
        std::env::remove_var("LOGNORM_TEST_PREFIX");
    }
}
