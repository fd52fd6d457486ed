//! Single-flight guard for uploads
//!
//! Only one upload may be pending at a time. A second attempt while one is in
//! flight is refused rather than queued.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct UploadGate {
    busy: Arc<AtomicBool>,
}

impl UploadGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the gate. Returns `None` when an upload is already pending.
    pub fn try_begin(&self) -> Option<UploadPermit> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| UploadPermit {
                busy: Arc::clone(&self.busy),
            })
    }

    pub fn is_uploading(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Held for the duration of an upload; releases the gate on drop.
#[derive(Debug)]
pub struct UploadPermit {
    busy: Arc<AtomicBool>,
}

impl Drop for UploadPermit {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}
