//! DEEPBIT: Drill AI Intelligence Platform
//!
//! Dashboard service for oil-well drilling telemetry.
//!
//! ## Architecture
//!
//! - **Upload**: forwards operator files to the processing service and
//!   normalizes its rows into the fixed chart schema
//! - **Dashboard**: well selection, current records, single-flight uploads
//!   and toast notifications
//! - **API**: Axum routes plus the embedded dashboard page

pub mod api;
pub mod config;
pub mod dashboard;
pub mod types;
pub mod upload;

// Re-export configuration
pub use config::DashboardConfig;

// Re-export commonly used types
pub use types::{DrillingRecord, Lithology, Notification, NotificationKind, Well, WellEntry, WellStatus};

// Re-export dashboard components
pub use dashboard::{DashboardError, DashboardService, NotificationCenter};

// Re-export upload components
pub use upload::{normalize_record, normalize_records, UploadBackend, UploadClient, UploadError, UploadFile, UploadResponse};

use std::sync::Arc;

/// Wire the production service: HTTP upload client, notification center and
/// session, all from one config.
pub fn build_service(config: &DashboardConfig) -> Result<DashboardService, UploadError> {
    let client = UploadClient::new(&config.upload.base_url, config.upload.timeout())?;
    let notifications = Arc::new(NotificationCenter::new(config.notifications.capacity));
    Ok(DashboardService::new(&config.wells, Arc::new(client), notifications))
}
