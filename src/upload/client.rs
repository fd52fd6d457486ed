//! HTTP client for the upload processing service

use std::time::Duration;

use async_trait::async_trait;
use mime_guess::mime::Mime;
use reqwest::multipart::{Form, Part};
use tracing::{debug, info, warn};

use super::response::{error_message, UploadResponse};
use super::{UploadBackend, UploadError, UploadFile};

/// Posts files to `{base_url}/api/uploads` as `multipart/form-data`.
#[derive(Clone)]
pub struct UploadClient {
    http: reqwest::Client,
    base_url: String,
}

impl UploadClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, UploadError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/api/uploads", self.base_url)
    }

    /// Build the `file` part. A content type that does not parse as a MIME
    /// type is dropped and the part is sent without one.
    fn form(file: UploadFile) -> Result<Form, UploadError> {
        let content_type = file.content_type.filter(|ct| {
            let valid = ct.parse::<Mime>().is_ok();
            if !valid {
                debug!(file = %file.file_name, content_type = %ct, "Dropping invalid content type");
            }
            valid
        });
        let mut part = Part::bytes(file.bytes).file_name(file.file_name);
        if let Some(ct) = content_type {
            part = part.mime_str(&ct)?;
        }
        Ok(Form::new().part("file", part))
    }
}

#[async_trait]
impl UploadBackend for UploadClient {
    async fn upload(&self, file: UploadFile) -> Result<UploadResponse, UploadError> {
        if file.is_empty() {
            return Err(UploadError::EmptyFile);
        }

        let file_name = file.file_name.clone();
        let size = file.bytes.len();
        debug!(file = %file_name, bytes = size, url = %self.endpoint(), "Posting upload");

        let resp = self
            .http
            .post(self.endpoint())
            .multipart(Self::form(file)?)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.bytes().await?;

        if !status.is_success() {
            let message = error_message(&body);
            warn!(file = %file_name, status = status.as_u16(), error = ?message, "Upload rejected");
            return Err(UploadError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: UploadResponse = serde_json::from_slice(&body)?;
        info!(file = %file_name, rows = parsed.row_count(), "Upload processed");
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Multipart;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::json;

    /// Stand-in processing service: echoes the uploaded file name and size
    /// back as a single row, or fails for files named `reject.csv`.
    async fn fake_uploads(mut multipart: Multipart) -> axum::response::Response {
        while let Ok(Some(field)) = multipart.next_field().await {
            if field.name() != Some("file") {
                continue;
            }
            let name = field.file_name().unwrap_or_default().to_string();
            let data = field.bytes().await.unwrap_or_default();
            if name == "reject.csv" {
                return (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(json!({"error": "missing DEPTH column"})),
                )
                    .into_response();
            }
            if name == "garbage.csv" {
                return (StatusCode::OK, "not json").into_response();
            }
            return Json(json!({
                "processedData": [{"DEPTH": data.len(), "%SH": 60, "SH": 5}]
            }))
            .into_response();
        }
        (StatusCode::BAD_REQUEST, Json(json!({"error": "no file"}))).into_response()
    }

    async fn spawn_service() -> String {
        let app = Router::new().route("/api/uploads", post(fake_uploads));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/")
    }

    #[tokio::test]
    async fn test_upload_success_parses_rows() {
        let base = spawn_service().await;
        let client = UploadClient::new(&base, Duration::from_secs(5)).unwrap();
        let resp = client
            .upload(UploadFile::new("logs.csv", b"a,b,c\n".to_vec()).with_content_type("text/csv"))
            .await
            .unwrap();
        let records = resp.records().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].depth, Some(6.0));
        assert_eq!(records[0].sh, 60.0);
    }

    #[tokio::test]
    async fn test_invalid_content_type_is_dropped_not_fatal() {
        let base = spawn_service().await;
        let client = UploadClient::new(&base, Duration::from_secs(5)).unwrap();
        let resp = client
            .upload(UploadFile::new("logs.csv", b"abc".to_vec()).with_content_type("not a mime"))
            .await
            .unwrap();
        assert_eq!(resp.records().unwrap()[0].depth, Some(3.0));
    }

    #[tokio::test]
    async fn test_upload_http_failure_carries_server_error() {
        let base = spawn_service().await;
        let client = UploadClient::new(&base, Duration::from_secs(5)).unwrap();
        let err = client
            .upload(UploadFile::new("reject.csv", b"x".to_vec()))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            UploadError::Status { status: 422, ref message } if message.as_deref() == Some("missing DEPTH column")
        ));
    }

    #[tokio::test]
    async fn test_upload_bad_body_is_decode_error() {
        let base = spawn_service().await;
        let client = UploadClient::new(&base, Duration::from_secs(5)).unwrap();
        let err = client
            .upload(UploadFile::new("garbage.csv", b"x".to_vec()))
            .await
            .unwrap_err();
        assert!(matches!(err, UploadError::Decode(_)));
    }

    #[tokio::test]
    async fn test_empty_file_is_rejected_locally() {
        let client = UploadClient::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        let err = client.upload(UploadFile::new("a.csv", Vec::new())).await.unwrap_err();
        assert!(matches!(err, UploadError::EmptyFile));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let client = UploadClient::new(&format!("http://{addr}"), Duration::from_secs(2)).unwrap();
        let err = client
            .upload(UploadFile::new("a.csv", b"x".to_vec()))
            .await
            .unwrap_err();
        assert!(matches!(err, UploadError::Transport(_)));
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let client = UploadClient::new("http://proc:9000/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.endpoint(), "http://proc:9000/api/uploads");
    }
}
