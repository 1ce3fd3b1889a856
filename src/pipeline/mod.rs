//! Decode, validate and normalize one batch of log records.
//!
//! The stages are pure functions. Nothing in this module holds state between
//! calls, so a batch can be processed from any number of tasks at once.

pub mod decode;
pub mod level;
pub mod record;
pub mod transform;
pub mod validate;

pub use decode::{decode, DecodeError};
pub use level::Level;
pub use record::{MetricsSummary, NormalizedRecord, RawRecord};
pub use transform::{format_instant, transform, transform_at, PIPELINE_STAGE};
pub use validate::{validate, ValidationError, ValidationReason};

use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Output of a successful pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedBatch {
    pub records: Vec<NormalizedRecord>,
    pub metrics: MetricsSummary,
}

/// Run all three stages on a raw payload, short-circuiting on the first failure.
pub fn process(payload: &[u8], correlation_id: &str) -> Result<ProcessedBatch, PipelineError> {
    process_at(payload, correlation_id, Utc::now())
}

pub fn process_at(
    payload: &[u8],
    correlation_id: &str,
    now: DateTime<Utc>,
) -> Result<ProcessedBatch, PipelineError> {
    let raw = decode(payload)?;
    validate(&raw)?;
    let (records, metrics) = transform_at(&raw, correlation_id, now);
    Ok(ProcessedBatch { records, metrics })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_short_circuits_on_decode() {
        let err = process(b"{", "req-1").unwrap_err();
        assert_eq!(err, PipelineError::Decode(DecodeError));
        assert_eq!(err.to_string(), "invalid JSON format");
    }

    #[test]
    fn test_process_short_circuits_on_validation() {
        let err = process(br#"[{"message": "a", "service": ""}]"#, "req-1").unwrap_err();
        assert_eq!(
            err.to_string(),
            "validation failed for log at index 0: service is required and cannot be empty"
        );
    }

    #[test]
    fn test_process_success() {
        let batch = process(
            br#"{"level": "E", "message": "down", "service": "db", "error_type": "conn"}"#,
            "req-9",
        )
        .unwrap();

        assert_eq!(batch.records.len(), 1);
        assert_eq!(batch.metrics.errors_by_type.get("conn"), Some(&1));
    }
}
