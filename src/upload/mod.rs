//! Upload pipeline: send a file to the processing service and turn its reply
//! into chart-ready drilling records.
//!
//! - [`client`]: `reqwest` multipart client for `POST /api/uploads`
//! - [`response`]: the service's JSON reply
//! - [`normalize`]: field mapping into [`crate::types::DrillingRecord`]

pub mod client;
pub mod normalize;
pub mod response;

pub use client::UploadClient;
pub use normalize::{normalize_record, normalize_records, RawRecord};
pub use response::{rows_from_json, ReplyError, UploadResponse};

use async_trait::async_trait;

/// Upload failures.
///
/// `Status` is an HTTP-level failure; every other variant is a transport or
/// decoding failure.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("no file provided")]
    EmptyFile,
    #[error("server returned status {status}")]
    Status { status: u16, message: Option<String> },
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("response decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

impl UploadError {
    /// True for non-success HTTP statuses (as opposed to transport/parse errors).
    pub const fn is_http_failure(&self) -> bool {
        matches!(self, Self::Status { .. })
    }

    /// Text shown to the operator.
    pub fn user_message(&self) -> String {
        match self {
            Self::Status {
                message: Some(msg), ..
            } => format!("Upload failed: {msg}"),
            Self::Status { message: None, .. } | Self::EmptyFile => "Upload failed".to_string(),
            Self::Transport(_) | Self::Decode(_) => "Upload error".to_string(),
        }
    }
}

/// A file selected for upload.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            bytes,
        }
    }

    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Anything that can process an uploaded file into an [`UploadResponse`].
#[async_trait]
pub trait UploadBackend: Send + Sync {
    async fn upload(&self, file: UploadFile) -> Result<UploadResponse, UploadError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        let err = UploadError::Status {
            status: 500,
            message: None,
        };
        assert!(err.is_http_failure());
        assert_eq!(err.user_message(), "Upload failed");

        let err = UploadError::Status {
            status: 422,
            message: Some("bad columns".into()),
        };
        assert_eq!(err.user_message(), "Upload failed: bad columns");

        let err = UploadError::Decode(serde_json::from_str::<UploadResponse>("nope").unwrap_err());
        assert!(!err.is_http_failure());
        assert_eq!(err.user_message(), "Upload error");
    }
}
