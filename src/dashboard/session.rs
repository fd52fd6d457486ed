//! Dashboard session state: the well catalog, the selected well, the current
//! drilling records and the outcome of the last upload.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use super::notify::Notifier;
use crate::config::defaults::{DASHBOARD_TABS, DASHBOARD_TITLE, UPLOAD_SUCCESS_MESSAGE};
use crate::types::{DrillingRecord, Well, WellEntry};
use crate::upload::{UploadError, UploadResponse};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("unknown well: {0}")]
    UnknownWell(String),
}

/// Result of the most recent upload attempt.
#[derive(Debug, Clone, Serialize)]
pub struct UploadSummary {
    pub file_name: String,
    pub succeeded: bool,
    /// Rows returned by the processing service
    pub rows: usize,
    /// Whether the records shown in the charts were replaced
    pub replaced_records: bool,
    pub message: String,
    pub finished_at: DateTime<Utc>,
}

/// Sidebar entry with its highlight state.
#[derive(Debug, Clone, Serialize)]
pub struct WellView {
    #[serde(flatten)]
    pub well: Well,
    pub depth_label: String,
    pub highlighted: bool,
}

/// Serializable view of the whole page.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub title: &'static str,
    pub tabs: &'static [&'static str],
    pub wells: Vec<WellView>,
    pub selected_well: Option<Well>,
    pub record_count: usize,
    pub is_uploading: bool,
    pub upload_label: &'static str,
    pub last_upload: Option<UploadSummary>,
}

/// Props handed to the chat assistant panel.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatContext {
    pub selected_well: Option<String>,
    pub drilling_data: Vec<DrillingRecord>,
}

pub struct DashboardSession {
    wells: Vec<Well>,
    selected: Option<Well>,
    records: Vec<DrillingRecord>,
    last_upload: Option<UploadSummary>,
    notifier: Arc<dyn Notifier>,
}

impl DashboardSession {
    pub fn new(entries: &[WellEntry], notifier: Arc<dyn Notifier>) -> Self {
        Self {
            wells: Well::catalog(entries),
            selected: None,
            records: Vec::new(),
            last_upload: None,
            notifier,
        }
    }

    pub fn selected_well(&self) -> Option<&Well> {
        self.selected.as_ref()
    }

    pub fn records(&self) -> &[DrillingRecord] {
        &self.records
    }

    /// Select a well by id. Replaces any previous selection.
    pub fn select_well(&mut self, id: &str) -> Result<&Well, SessionError> {
        let well = self
            .wells
            .iter()
            .find(|w| w.id == id)
            .cloned()
            .ok_or_else(|| SessionError::UnknownWell(id.to_string()))?;

        if self.selected.as_ref().is_some_and(|s| s.name == well.name) {
            debug!(well = %well.name, "Well already selected");
        } else {
            info!(well = %well.name, id = %well.id, "Well selected");
        }
        Ok(&*self.selected.insert(well))
    }

    /// Highlight follows the selected well's name.
    pub fn is_highlighted(&self, name: &str) -> bool {
        self.selected.as_ref().is_some_and(|w| w.name == name)
    }

    /// Apply a successful reply from the processing service. Records are only
    /// replaced when the reply carries at least one row.
    pub fn apply_upload(&mut self, file_name: &str, response: &UploadResponse) -> &UploadSummary {
        self.notifier.success(UPLOAD_SUCCESS_MESSAGE);

        let replaced = match response.records() {
            Some(records) => {
                info!(file = %file_name, rows = records.len(), "Drilling records replaced");
                self.records = records;
                true
            }
            None => {
                debug!(file = %file_name, "Upload returned no rows, keeping current records");
                false
            }
        };

        self.last_upload.insert(UploadSummary {
            file_name: file_name.to_string(),
            succeeded: true,
            rows: response.row_count(),
            replaced_records: replaced,
            message: UPLOAD_SUCCESS_MESSAGE.to_string(),
            finished_at: Utc::now(),
        })
    }

    /// Report a failed upload. Records and selection are left as they were.
    pub fn apply_upload_failure(&mut self, file_name: &str, err: &UploadError) -> &UploadSummary {
        let message = err.user_message();
        self.notifier.error(&message);

        self.last_upload.insert(UploadSummary {
            file_name: file_name.to_string(),
            succeeded: false,
            rows: 0,
            replaced_records: false,
            message,
            finished_at: Utc::now(),
        })
    }

    pub fn snapshot(&self, is_uploading: bool) -> DashboardSnapshot {
        DashboardSnapshot {
            title: DASHBOARD_TITLE,
            tabs: DASHBOARD_TABS,
            wells: self.well_views(),
            selected_well: self.selected.clone(),
            record_count: self.records.len(),
            is_uploading,
            upload_label: if is_uploading { "Uploading..." } else { "Upload" },
            last_upload: self.last_upload.clone(),
        }
    }

    pub fn well_views(&self) -> Vec<WellView> {
        self.wells
            .iter()
            .map(|w| WellView {
                well: w.clone(),
                depth_label: w.depth_label(),
                highlighted: self.is_highlighted(&w.name),
            })
            .collect()
    }

    pub fn chat_context(&self) -> ChatContext {
        ChatContext {
            selected_well: self.selected.as_ref().map(|w| w.name.clone()),
            drilling_data: self.records.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::notify::NotificationCenter;
    use crate::types::NotificationKind;

    fn session() -> (DashboardSession, Arc<NotificationCenter>) {
        let center = Arc::new(NotificationCenter::new(16));
        let entries = vec![
            WellEntry::new("Alpha-1", 12_000.0),
            WellEntry::new("Bravo-2", 9_500.0),
        ];
        let notifier: Arc<dyn Notifier> = center.clone();
        (DashboardSession::new(&entries, notifier), center)
    }

    fn response(json: &str) -> UploadResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_select_well_highlights_exactly_one_entry() {
        let (mut s, _) = session();
        assert!(s.well_views().iter().all(|w| !w.highlighted));

        s.select_well("well-1").unwrap();
        let highlighted: Vec<_> = s
            .well_views()
            .into_iter()
            .filter(|w| w.highlighted)
            .map(|w| w.well.name)
            .collect();
        assert_eq!(highlighted, ["Bravo-2"]);

        s.select_well("well-0").unwrap();
        assert!(s.is_highlighted("Alpha-1"));
        assert!(!s.is_highlighted("Bravo-2"));
    }

    #[test]
    fn test_reselecting_same_well_keeps_selection() {
        let (mut s, _) = session();
        s.select_well("well-0").unwrap();
        let again = s.select_well("well-0").unwrap().clone();
        assert_eq!(again.id, "well-0");
        assert_eq!(s.selected_well(), Some(&again));
    }

    #[test]
    fn test_unknown_well_is_rejected_and_selection_kept() {
        let (mut s, _) = session();
        s.select_well("well-1").unwrap();
        let err = s.select_well("well-9").unwrap_err();
        assert!(matches!(err, SessionError::UnknownWell(ref id) if id == "well-9"));
        assert_eq!(s.selected_well().map(|w| w.id.as_str()), Some("well-1"));
    }

    #[test]
    fn test_successful_upload_replaces_records_and_notifies() {
        let (mut s, center) = session();
        let summary = s
            .apply_upload("a.csv", &response(r#"{"processedData":[{"DEPTH":10},{"DEPTH":20}]}"#))
            .clone();
        assert!(summary.replaced_records);
        assert_eq!(summary.rows, 2);
        assert_eq!(s.records().len(), 2);

        let latest = center.latest().unwrap();
        assert_eq!(latest.kind, NotificationKind::Success);
        assert_eq!(latest.message, "File uploaded and processed successfully.");

        s.apply_upload("b.csv", &response(r#"{"processedData":[{"DEPTH":30}]}"#));
        assert_eq!(s.records().len(), 1);
        assert_eq!(s.records()[0].depth, Some(30.0));
    }

    #[test]
    fn test_empty_upload_keeps_previous_records() {
        let (mut s, center) = session();
        s.apply_upload("a.csv", &response(r#"{"processedData":[{"DEPTH":10}]}"#));
        let summary = s.apply_upload("b.csv", &response(r#"{"processedData":[]}"#)).clone();
        assert!(!summary.replaced_records);
        assert_eq!(s.records().len(), 1);
        assert_eq!(center.since(0).len(), 2);
    }

    #[test]
    fn test_failed_upload_leaves_state_and_reports_error() {
        let (mut s, center) = session();
        s.apply_upload("a.csv", &response(r#"{"processedData":[{"DEPTH":10}]}"#));
        let err = UploadError::Status {
            status: 500,
            message: None,
        };
        let summary = s.apply_upload_failure("b.csv", &err).clone();
        assert!(!summary.succeeded);
        assert_eq!(s.records().len(), 1);

        let latest = center.latest().unwrap();
        assert_eq!(latest.kind, NotificationKind::Error);
        assert_eq!(latest.message, "Upload failed");
    }

    #[test]
    fn test_snapshot_and_chat_context() {
        let (mut s, _) = session();
        s.select_well("well-0").unwrap();
        s.apply_upload("a.csv", &response(r#"{"processedData":[{"%SS":45}]}"#));

        let snap = s.snapshot(true);
        assert_eq!(snap.upload_label, "Uploading...");
        assert_eq!(snap.record_count, 1);
        assert_eq!(snap.tabs.len(), 3);
        assert_eq!(s.snapshot(false).upload_label, "Upload");

        let chat = serde_json::to_value(s.chat_context()).unwrap();
        assert_eq!(chat["selectedWell"], "Alpha-1");
        assert_eq!(chat["drillingData"][0]["SS"], 45.0);
    }
}
