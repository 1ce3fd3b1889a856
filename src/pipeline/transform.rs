use super::level::Level;
use super::record::{MetricsSummary, NormalizedRecord, RawRecord};
use chrono::{DateTime, SecondsFormat, TimeZone, Utc};

/// Tag attached to every record this pipeline emits.
pub const PIPELINE_STAGE: &str = "fission-log-processor";

/// Key used in `errors_by_service` for ERROR records without a service.
pub const UNKNOWN_SERVICE: &str = "unknown";

/// Key used in `errors_by_type` for ERROR records without a classification.
pub const GENERIC_ERROR_TYPE: &str = "generic";

/// Normalize a validated batch and aggregate its error counts.
///
/// Uses the current time for `received_at` and for records without a usable
/// timestamp. See [`transform_at`] for a deterministic variant.
pub fn transform(
    records: &[RawRecord],
    correlation_id: &str,
) -> (Vec<NormalizedRecord>, MetricsSummary) {
    transform_at(records, correlation_id, Utc::now())
}

/// Normalize a validated batch using `now` as the batch's receive instant.
///
/// Output order matches input order. Only records whose normalized level is
/// ERROR contribute to the summary's maps.
pub fn transform_at(
    records: &[RawRecord],
    correlation_id: &str,
    now: DateTime<Utc>,
) -> (Vec<NormalizedRecord>, MetricsSummary) {
    let received_at = format_instant(now);

    let mut normalized = Vec::with_capacity(records.len());
    let mut metrics = MetricsSummary::new(records.len());

    for raw in records {
        let level = Level::normalize(&raw.level);

        let timestamp_iso = raw
            .timestamp
            .and_then(epoch_seconds)
            .map(format_instant)
            .unwrap_or_else(|| received_at.clone());

        let record_id = match raw.record_id.as_deref() {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => correlation_id.to_string(),
        };

        let error_type = raw.error_type.as_deref().filter(|t| !t.is_empty());

        if level == Level::Error {
            let service_key = if raw.service.is_empty() {
                UNKNOWN_SERVICE
            } else {
                raw.service.as_str()
            };
            *metrics
                .errors_by_service
                .entry(service_key.to_string())
                .or_insert(0) += 1;

            *metrics
                .errors_by_type
                .entry(error_type.unwrap_or(GENERIC_ERROR_TYPE).to_string())
                .or_insert(0) += 1;
        }

        normalized.push(NormalizedRecord {
            level,
            message: raw.message.trim().to_string(),
            service: raw.service.clone(),
            error_type: error_type.map(str::to_string),
            timestamp_iso,
            received_at: received_at.clone(),
            record_id,
            pipeline_stage: PIPELINE_STAGE.to_string(),
        });
    }

    (normalized, metrics)
}

/// Render an instant as RFC3339 in UTC with whole seconds, e.g. `2024-01-01T00:00:00Z`.
pub fn format_instant(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Interpret a positive epoch value as whole seconds. Fractions are truncated.
///
/// Returns `None` for non-positive, non-finite or out-of-range values so the
/// caller falls back to the batch instant.
fn epoch_seconds(timestamp: f64) -> Option<DateTime<Utc>> {
    if !timestamp.is_finite() || timestamp <= 0.0 {
        return None;
    }
    Utc.timestamp_opt(timestamp.trunc() as i64, 0).single()
}
