//! Wire shape of the processing service's `POST /api/uploads` reply

use serde::{Deserialize, Serialize};

use super::normalize::{normalize_records, RawRecord};
use crate::types::DrillingRecord;

/// `{ processedData?: [...], error?: string }`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(rename = "processedData", default, skip_serializing_if = "Option::is_none")]
    pub processed_data: Option<Vec<RawRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UploadResponse {
    /// Number of raw rows, zero when `processedData` is absent.
    pub fn row_count(&self) -> usize {
        self.processed_data.as_ref().map_or(0, Vec::len)
    }

    /// Normalized rows, or `None` when there is nothing to chart. Callers
    /// keep their previous records in that case.
    pub fn records(&self) -> Option<Vec<DrillingRecord>> {
        match &self.processed_data {
            Some(rows) if !rows.is_empty() => Some(normalize_records(rows)),
            _ => None,
        }
    }
}

/// Failure to read a saved reply as a list of rows.
#[derive(Debug, thiserror::Error)]
pub enum ReplyError {
    #[error("not a processing-service reply: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("reply carries an error: {0}")]
    Rejected(String),
}

/// Rows from saved reply text: either the full `{ processedData }` reply or
/// a bare array of rows. A reply with an `error` field is rejected.
pub fn rows_from_json(text: &str) -> Result<Vec<RawRecord>, ReplyError> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    if value.is_array() {
        return Ok(serde_json::from_value(value)?);
    }
    let reply: UploadResponse = serde_json::from_value(value)?;
    match reply.error {
        Some(err) => Err(ReplyError::Rejected(err)),
        None => Ok(reply.processed_data.unwrap_or_default()),
    }
}

/// Pull the `error` field out of an error body, if it has one.
pub fn error_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<UploadResponse>(body)
        .ok()
        .and_then(|r| r.error)
        .filter(|e| !e.trim().is_empty())
}
