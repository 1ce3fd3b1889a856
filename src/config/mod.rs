pub mod generate;
pub mod parse;
pub mod types;

use regex::Regex;
use std::path::{Path, PathBuf};

pub use parse::{load_config, parse_config, ConfigError};
pub use types::{Config, LoggingConfig, RequestIdConfig, ServerConfig};

/// Matches `$env{VAR_NAME}`; group 1 is the variable name.
pub(crate) const ENV_VAR_PATTERN: &str = r"\$env\{([A-Za-z_][A-Za-z0-9_]*)\}";

/// Expands environment variables in a string.
/// Supports $env{VAR_NAME} syntax.
/// If an environment variable is not set, it's left unchanged.
pub fn expand_env_vars(text: &str) -> String {
    let re = Regex::new(ENV_VAR_PATTERN).expect("env var pattern is a valid regex");

    re.replace_all(text, |caps: &regex::Captures| {
        std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
    })
    .to_string()
}

/// Expands a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
    let path_str = path.to_string_lossy();

    if let Some(rest) = path_str.strip_prefix("~/") {
        if let Some(home_dir) = dirs::home_dir() {
            return home_dir.join(rest);
        }
    } else if path_str == "~" {
        if let Some(home_dir) = dirs::home_dir() {
            return home_dir;
        }
    }

    path.to_path_buf()
}

/// Per-user config location, `~/.config/lognorm/config.yml`.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config/lognorm/config.yml"))
}

pub fn system_config_path() -> PathBuf {
    PathBuf::from("/etc/lognorm/config.yml")
}

/// Resolves the config file path based on explicit argument or default locations.
/// Returns the first existing path from:
/// 1. Explicit path (if provided, with tilde expansion)
/// 2. ~/.config/lognorm/config.yml
/// 3. /etc/lognorm/config.yml
pub fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(expand_tilde(path));
    }

    if let Some(user_config) = user_config_path() {
        if user_config.exists() {
            return Some(user_config);
        }
    }

    let system_config = system_config_path();
    if system_config.exists() {
        return Some(system_config);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_env_vars_single() {
        std::env::set_var("LOGNORM_TEST_VAR", "test_value");
        let result = expand_env_vars("path/$env{LOGNORM_TEST_VAR}/file");
        assert_eq!(result, "path/test_value/file");
        std::env::remove_var("LOGNORM_TEST_VAR");
    }

    #[test]
    fn test_expand_env_vars_unset() {
        let result = expand_env_vars("path/$env{LOGNORM_NONEXISTENT_VAR}/file");
        assert_eq!(result, "path/$env{LOGNORM_NONEXISTENT_VAR}/file");
    }

    #[test]
    fn test_expand_env_vars_no_expansion() {
        assert_eq!(expand_env_vars("0.0.0.0:8888"), "0.0.0.0:8888");
        assert_eq!(expand_env_vars("${not_env}"), "${not_env}");
    }

    #[test]
    fn test_expand_tilde_with_path() {
        let expanded = expand_tilde(Path::new("~/test/path"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expanded, home.join("test/path"));
        }
    }

    #[test]
    fn test_expand_tilde_no_expansion() {
        assert_eq!(expand_tilde(Path::new("/absolute/path")), Path::new("/absolute/path"));
        assert_eq!(expand_tilde(Path::new("relative/~")), Path::new("relative/~"));
    }

    #[test]
    fn test_resolve_explicit_path_wins() {
        let resolved = resolve_config_path(Some(Path::new("/tmp/lognorm.yml")));
        assert_eq!(resolved, Some(PathBuf::from("/tmp/lognorm.yml")));
    }
}
