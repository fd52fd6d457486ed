//! Dashboard service: session state plus the upload path, shared across
//! HTTP handlers.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, warn};

use super::notify::{NotificationCenter, Notifier};
use super::session::{ChatContext, DashboardSession, DashboardSnapshot, SessionError, UploadSummary};
use super::upload_gate::UploadGate;
use crate::types::{DrillingRecord, Notification, Well, WellEntry};
use crate::upload::{UploadBackend, UploadError, UploadFile};

#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("no file provided")]
    NoFile,
    #[error("an upload is already in progress")]
    Busy,
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("{}", .summary.message)]
    Upload {
        summary: UploadSummary,
        #[source]
        source: UploadError,
    },
}

#[derive(Clone)]
pub struct DashboardService {
    session: Arc<RwLock<DashboardSession>>,
    gate: UploadGate,
    backend: Arc<dyn UploadBackend>,
    notifications: Arc<NotificationCenter>,
}

impl DashboardService {
    pub fn new(
        wells: &[WellEntry],
        backend: Arc<dyn UploadBackend>,
        notifications: Arc<NotificationCenter>,
    ) -> Self {
        let notifier: Arc<dyn Notifier> = notifications.clone();
        Self {
            session: Arc::new(RwLock::new(DashboardSession::new(wells, notifier))),
            gate: UploadGate::new(),
            backend,
            notifications,
        }
    }

    pub fn is_uploading(&self) -> bool {
        self.gate.is_uploading()
    }

    pub async fn snapshot(&self) -> DashboardSnapshot {
        let uploading = self.is_uploading();
        self.session.read().await.snapshot(uploading)
    }

    pub async fn select_well(&self, id: &str) -> Result<Well, DashboardError> {
        let mut session = self.session.write().await;
        Ok(session.select_well(id)?.clone())
    }

    pub async fn records(&self) -> Vec<DrillingRecord> {
        self.session.read().await.records().to_vec()
    }

    pub async fn chat_context(&self) -> ChatContext {
        self.session.read().await.chat_context()
    }

    pub fn notifications_since(&self, after: u64) -> Vec<Notification> {
        self.notifications.since(after)
    }

    /// Send a file to the processing service and apply the result.
    ///
    /// The session lock is not held while the request is in flight; the
    /// upload gate alone keeps uploads single-flight.
    pub async fn upload(&self, file: UploadFile) -> Result<UploadSummary, DashboardError> {
        if file.is_empty() {
            return Err(DashboardError::NoFile);
        }
        let Some(_permit) = self.gate.try_begin() else {
            warn!(file = %file.file_name, "Upload refused, another upload is pending");
            return Err(DashboardError::Busy);
        };

        let file_name = file.file_name.clone();
        info!(file = %file_name, bytes = file.bytes.len(), "Upload started");
        let result = self.backend.upload(file).await;

        let mut session = self.session.write().await;
        match result {
            Ok(response) => Ok(session.apply_upload(&file_name, &response).clone()),
            Err(source) => {
                let summary = session.apply_upload_failure(&file_name, &source).clone();
                Err(DashboardError::Upload { summary, source })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NotificationKind;
    use crate::upload::UploadResponse;
    use async_trait::async_trait;
    use tokio::sync::Notify;

    /// Backend returning a canned reply, optionally parked until released.
    struct StubBackend {
        reply: fn() -> Result<UploadResponse, UploadError>,
        release: Option<Arc<Notify>>,
    }

    #[async_trait]
    impl UploadBackend for StubBackend {
        async fn upload(&self, _file: UploadFile) -> Result<UploadResponse, UploadError> {
            if let Some(release) = &self.release {
                release.notified().await;
            }
            (self.reply)()
        }
    }

    fn rows() -> Result<UploadResponse, UploadError> {
        Ok(serde_json::from_str(r#"{"processedData":[{"DEPTH":100,"%SH":30}]}"#).unwrap())
    }

    fn http_failure() -> Result<UploadResponse, UploadError> {
        Err(UploadError::Status {
            status: 500,
            message: None,
        })
    }

    fn service(backend: StubBackend) -> (DashboardService, Arc<NotificationCenter>) {
        let center = Arc::new(NotificationCenter::new(16));
        let wells = [WellEntry::new("Alpha-1", 12_000.0)];
        (DashboardService::new(&wells, Arc::new(backend), center.clone()), center)
    }

    fn file() -> UploadFile {
        UploadFile::new("run.csv", b"DEPTH\n100\n".to_vec())
    }

    #[tokio::test]
    async fn test_upload_success_updates_records() {
        let (svc, _) = service(StubBackend { reply: rows, release: None });
        let summary = svc.upload(file()).await.unwrap();
        assert!(summary.succeeded);
        let records = svc.records().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].sh, 30.0);
        assert!(!svc.is_uploading());
    }

    #[tokio::test]
    async fn test_upload_failure_reports_and_releases_gate() {
        let (svc, center) = service(StubBackend { reply: http_failure, release: None });
        let err = svc.upload(file()).await.unwrap_err();
        assert!(matches!(err, DashboardError::Upload { .. }));
        assert_eq!(err.to_string(), "Upload failed");
        assert!(!svc.is_uploading());
        assert_eq!(center.latest().unwrap().kind, NotificationKind::Error);
    }

    #[tokio::test]
    async fn test_empty_file_is_ignored_silently() {
        let (svc, center) = service(StubBackend { reply: rows, release: None });
        let err = svc.upload(UploadFile::new("x.csv", Vec::new())).await.unwrap_err();
        assert!(matches!(err, DashboardError::NoFile));
        assert!(center.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_upload_is_refused() {
        let release = Arc::new(Notify::new());
        let (svc, _) = service(StubBackend {
            reply: rows,
            release: Some(release.clone()),
        });

        let first = {
            let svc = svc.clone();
            tokio::spawn(async move { svc.upload(file()).await })
        };
        while !svc.is_uploading() {
            tokio::task::yield_now().await;
        }
        assert!(svc.snapshot().await.is_uploading);

        let second = svc.upload(file()).await;
        assert!(matches!(second, Err(DashboardError::Busy)));

        release.notify_one();
        assert!(first.await.unwrap().is_ok());
        assert!(!svc.is_uploading());
    }

    #[tokio::test]
    async fn test_select_well_through_service() {
        let (svc, _) = service(StubBackend { reply: rows, release: None });
        let well = svc.select_well("well-0").await.unwrap();
        assert_eq!(well.name, "Alpha-1");
        assert_eq!(svc.chat_context().await.selected_well.as_deref(), Some("Alpha-1"));
        assert!(matches!(
            svc.select_well("nope").await,
            Err(DashboardError::Session(SessionError::UnknownWell(_)))
        ));
    }
}
