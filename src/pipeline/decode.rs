use super::record::RawRecord;
use thiserror::Error;

/// The payload was neither an array of records nor a single record.
///
/// Parser diagnostics from the two attempts are intentionally not carried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid JSON format")]
pub struct DecodeError;

/// Decode a request payload into an ordered batch of raw records.
///
/// An array is tried first; if that fails the payload is read as one object
/// and wrapped into a single-element batch. `[]` and `null` both decode to an
/// empty batch. A `null` element becomes an empty record and is left for
/// validation to reject.
pub fn decode(payload: &[u8]) -> Result<Vec<RawRecord>, DecodeError> {
    if let Ok(records) = serde_json::from_slice::<Option<Vec<Option<RawRecord>>>>(payload) {
        return Ok(records
            .unwrap_or_default()
            .into_iter()
            .map(Option::unwrap_or_default)
            .collect());
    }

    serde_json::from_slice::<RawRecord>(payload)
        .map(|record| vec![record])
        .map_err(|_| DecodeError)
}
