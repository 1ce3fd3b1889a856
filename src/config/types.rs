use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub request_id: RequestIdConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen")]
    pub listen: String,
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

fn default_listen() -> String {
    "0.0.0.0:8888".to_string()
}

fn default_max_body_bytes() -> usize {
    2 * 1024 * 1024
}

/// How a correlation id is obtained for each request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestIdConfig {
    /// Headers checked in order; the first non-empty value wins.
    #[serde(default = "default_request_id_headers")]
    pub headers: Vec<String>,
    /// Prefix for generated ids.
    #[serde(default = "default_request_id_prefix")]
    pub prefix: String,
}

impl Default for RequestIdConfig {
    fn default() -> Self {
        Self {
            headers: default_request_id_headers(),
            prefix: default_request_id_prefix(),
        }
    }
}

fn default_request_id_headers() -> Vec<String> {
    vec![
        "X-Request-ID".to_string(),
        "X-Correlation-ID".to_string(),
        "X-Trace-ID".to_string(),
    ]
}

fn default_request_id_prefix() -> String {
    "req-".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive. `RUST_LOG` takes precedence.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

fn default_log_filter() -> String {
    "lognorm=info".to_string()
}
