use super::record::RawRecord;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationReason {
    #[error("message is required and cannot be empty")]
    EmptyMessage,

    #[error("service is required and cannot be empty")]
    EmptyService,
}

/// First record in a batch that failed a required-field rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("validation failed for log at index {index}: {reason}")]
pub struct ValidationError {
    /// Zero-based position of the offending record in the batch.
    pub index: usize,
    pub reason: ValidationReason,
}

/// Check a single record. `message` is checked before `service`.
pub fn validate_record(record: &RawRecord) -> Result<(), ValidationReason> {
    if record.message.trim().is_empty() {
        return Err(ValidationReason::EmptyMessage);
    }
    if record.service.trim().is_empty() {
        return Err(ValidationReason::EmptyService);
    }
    Ok(())
}

/// Check every record in order and stop at the first violation.
pub fn validate(records: &[RawRecord]) -> Result<(), ValidationError> {
    for (index, record) in records.iter().enumerate() {
        validate_record(record).map_err(|reason| ValidationError { index, reason })?;
    }
    Ok(())
}
