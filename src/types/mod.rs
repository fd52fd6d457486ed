//! Shared data structures for the drilling dashboard
//!
//! - Wells: the sidebar catalog and the selected well
//! - Drilling records: normalized telemetry rows used by the charts
//! - Notifications: transient success / error messages for the page

mod notification;
mod record;
mod well;

pub use notification::*;
pub use record::*;
pub use well::*;
