pub fn generate_starter_config() -> String {
    r#"# =============================================================================
# LOGNORM CONFIGURATION
# =============================================================================
# Every section is optional. Anything left out uses the value shown here.
#
# Config file locations (in order of precedence):
#   1. Path specified via --config argument
#   2. ~/.config/lognorm/config.yml
#   3. /etc/lognorm/config.yml
#
# Values may reference environment variables with the $env{...} syntax.

# =============================================================================
# SERVER
# =============================================================================
# POST / and POST /transform accept a JSON array of log records or a single
# record object.

server:
  listen: "0.0.0.0:8888"
  # Requests with larger bodies are rejected with 400
  max_body_bytes: 2097152

# =============================================================================
# REQUEST IDS
# =============================================================================
# The first non-empty header in this list is used as the batch correlation id.
# Records without their own request_id inherit it. When none of the headers is
# present an id is generated: prefix + 16 hex characters.

request_id:
  headers:
    - X-Request-ID
    - X-Correlation-ID
    - X-Trace-ID
  prefix: "req-"

# =============================================================================
# LOGGING
# =============================================================================
# tracing EnvFilter directive. RUST_LOG overrides this when set.

logging:
  filter: "lognorm=info"
"#
    .to_string()
}
