use crate::config::Config;
use crate::pipeline::{format_instant, process, PipelineError};
use crate::web::{RequestIdResolver, TransformResponse};
use chrono::Utc;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("failed to read input '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read stdin: {0}")]
    Stdin(#[source] std::io::Error),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Run the pipeline once over a file (or stdin) and render the response envelope.
pub fn transform_input(
    input: Option<&Path>,
    request_id: Option<String>,
    config: &Config,
) -> Result<String, TransformError> {
    let payload = match input {
        Some(path) => std::fs::read(path).map_err(|source| TransformError::Read {
            path: path.to_path_buf(),
            source,
        })?,
        None => {
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .map_err(TransformError::Stdin)?;
            buf
        }
    };

    let request_id = request_id
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| RequestIdResolver::new(&config.request_id).generate());

    let batch = process(&payload, &request_id)?;
    info!(
        request_id = %request_id,
        logs_processed = batch.records.len(),
        errors = batch.metrics.error_count(),
        "Batch transformed"
    );

    let response = TransformResponse {
        transformed_logs: batch.records,
        metrics: batch.metrics,
        request_id,
        processed_at: format_instant(Utc::now()),
    };

    Ok(serde_json::to_string_pretty(&response)?)
}

pub fn run(
    input: Option<PathBuf>,
    request_id: Option<String>,
    config: &Config,
) -> Result<(), TransformError> {
    let output = transform_input(input.as_deref(), request_id, config)?;
    println!("{}", output);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_transform_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"[{{"level": "err", "message": "x", "service": "svc-a"}}]"#).unwrap();

        let output =
            transform_input(Some(file.path()), Some("req-cli".to_string()), &Config::default())
                .unwrap();
        let response: TransformResponse = serde_json::from_str(&output).unwrap();

        assert_eq!(response.request_id, "req-cli");
        assert_eq!(response.transformed_logs[0].record_id, "req-cli");
        assert_eq!(response.metrics.errors_by_service.get("svc-a"), Some(&1));
    }

    #[test]
    fn test_transform_generates_request_id() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "[]").unwrap();

        let output = transform_input(Some(file.path()), None, &Config::default()).unwrap();
        let response: TransformResponse = serde_json::from_str(&output).unwrap();
        assert!(response.request_id.starts_with("req-"));
    }

    #[test]
    fn test_transform_reports_pipeline_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not valid json").unwrap();

        let err = transform_input(Some(file.path()), None, &Config::default()).unwrap_err();
        assert_eq!(err.to_string(), "invalid JSON format");
    }

    #[test]
    fn test_transform_missing_file() {
        let err = transform_input(
            Some(Path::new("/nonexistent/lognorm-input.json")),
            None,
            &Config::default(),
        )
        .unwrap_err();
        assert!(matches!(err, TransformError::Read { .. }));
    }
}
