use super::level::Level;
use serde::de::{IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A log record as submitted by a client. Nothing here is trusted yet.
///
/// Decoding is lenient so loosely-shaped producers reach validation instead
/// of failing to parse:
/// - keys match field names ignoring ASCII case (`Message`, `SERVICE`),
/// - a repeated key keeps the last value,
/// - `null` leaves a field at its previous (initially empty) value,
/// - unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    pub level: String,

    pub message: String,

    /// Seconds since the Unix epoch. Zero or negative means "not provided".
    pub timestamp: Option<f64>,

    pub service: String,

    pub error_type: Option<String>,

    /// Read from the `request_id` key.
    pub record_id: Option<String>,
}

#[derive(Debug, Clone, Copy)]
enum RawField {
    Level,
    Message,
    Timestamp,
    Service,
    ErrorType,
    RecordId,
}

const RAW_FIELDS: [(&str, RawField); 6] = [
    ("level", RawField::Level),
    ("message", RawField::Message),
    ("timestamp", RawField::Timestamp),
    ("service", RawField::Service),
    ("error_type", RawField::ErrorType),
    ("request_id", RawField::RecordId),
];

impl RawField {
    fn lookup(key: &str) -> Option<Self> {
        RAW_FIELDS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(key))
            .map(|(_, field)| *field)
    }
}

impl<'de> Deserialize<'de> for RawRecord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(RawRecordVisitor)
    }
}

/// `null` (`None`) leaves the slot untouched.
fn overwrite<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

struct RawRecordVisitor;

impl<'de> Visitor<'de> for RawRecordVisitor {
    type Value = RawRecord;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a log record object")
    }

    fn visit_map<A>(self, mut map: A) -> Result<RawRecord, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut record = RawRecord::default();

        while let Some(key) = map.next_key::<String>()? {
            let Some(field) = RawField::lookup(&key) else {
                map.next_value::<IgnoredAny>()?;
                continue;
            };

            match field {
                RawField::Level => overwrite(&mut record.level, map.next_value()?),
                RawField::Message => overwrite(&mut record.message, map.next_value()?),
                RawField::Service => overwrite(&mut record.service, map.next_value()?),
                RawField::Timestamp => {
                    overwrite(&mut record.timestamp, map.next_value::<Option<f64>>()?.map(Some))
                }
                RawField::ErrorType => {
                    overwrite(&mut record.error_type, map.next_value::<Option<String>>()?.map(Some))
                }
                RawField::RecordId => {
                    overwrite(&mut record.record_id, map.next_value::<Option<String>>()?.map(Some))
                }
            }
        }

        Ok(record)
    }
}

/// A record after normalization, ready to be returned to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub level: Level,
    pub message: String,
    pub service: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    pub timestamp_iso: String,
    pub received_at: String,
    #[serde(rename = "request_id")]
    pub record_id: String,
    pub pipeline_stage: String,
}

/// Error counts for a single batch.
///
/// Maps are ordered so the serialized summary is stable for identical input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSummary {
    #[serde(rename = "total_logs")]
    pub total_records: usize,
    pub errors_by_service: BTreeMap<String, u64>,
    pub errors_by_type: BTreeMap<String, u64>,
}

impl MetricsSummary {
    pub fn new(total_records: usize) -> Self {
        Self {
            total_records,
            ..Self::default()
        }
    }

    /// Number of ERROR records counted into this summary.
    pub fn error_count(&self) -> u64 {
        self.errors_by_service.values().sum()
    }
}
