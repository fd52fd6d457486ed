//! System-wide default constants.
//!
//! Grouped by subsystem for easy discovery.

// ============================================================================
// Server
// ============================================================================

/// Default HTTP bind address.
pub const SERVER_ADDR: &str = "0.0.0.0:8080";

/// Request body limit for `POST /api/dashboard/upload` (bytes). 25 MiB.
pub const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

// ============================================================================
// Upload processing service
// ============================================================================

/// Base URL of the service answering `POST /api/uploads`.
pub const UPLOAD_BASE_URL: &str = "http://127.0.0.1:3000";

/// Per-request timeout for the processing service (seconds).
pub const UPLOAD_TIMEOUT_SECS: u64 = 120;

// ============================================================================
// Notifications
// ============================================================================

/// Toasts retained for polling clients.
pub const NOTIFICATION_CAPACITY: usize = 50;

pub const UPLOAD_SUCCESS_MESSAGE: &str = "File uploaded and processed successfully.";

// ============================================================================
// Page
// ============================================================================

pub const DASHBOARD_TITLE: &str = "Drill AI Intelligence Platform";

pub const DASHBOARD_TABS: &[&str] = &["Drilling Monitoring", "Offset Wells Map", "Bit Summary"];

/// Built-in sidebar catalog used when the config has no `[[wells]]`.
pub const DEFAULT_WELLS: &[(&str, f64)] = &[
    ("Well A-1", 12_500.0),
    ("Well A-2", 11_800.0),
    ("Well B-1", 9_650.0),
    ("Well B-3", 10_420.0),
    ("Well C-2", 13_100.0),
    ("Well D-4", 8_750.0),
];
