//! Dashboard state and behavior behind the web page
//!
//! - [`session`]: well selection, current records, upload outcomes
//! - [`service`]: shared handle used by the HTTP layer, owns the upload path
//! - [`upload_gate`]: single-flight upload guard
//! - [`notify`]: toast feed

pub mod notify;
pub mod service;
pub mod session;
pub mod upload_gate;

pub use notify::{NotificationCenter, Notifier};
pub use service::{DashboardError, DashboardService};
pub use session::{ChatContext, DashboardSession, DashboardSnapshot, SessionError, UploadSummary, WellView};
pub use upload_gate::{UploadGate, UploadPermit};
