//! Well catalog types shown in the sidebar

use serde::{Deserialize, Serialize};
use std::fmt;

/// Operational status of a well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WellStatus {
    #[default]
    Active,
    Inactive,
    Maintenance,
}

impl fmt::Display for WellStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Inactive => write!(f, "inactive"),
            Self::Maintenance => write!(f, "maintenance"),
        }
    }
}

/// Static catalog entry, as listed in `[[wells]]` of the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WellEntry {
    pub name: String,
    /// Measured depth in feet
    pub depth: f64,
}

impl WellEntry {
    pub fn new(name: impl Into<String>, depth: f64) -> Self {
        Self {
            name: name.into(),
            depth,
        }
    }
}

/// A well as presented to the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Well {
    pub id: String,
    pub name: String,
    pub depth: f64,
    pub status: WellStatus,
}

impl Well {
    /// Build a well from its catalog position. Catalog wells are always
    /// reported as active.
    pub fn from_entry(index: usize, entry: &WellEntry) -> Self {
        Self {
            id: format!("well-{index}"),
            name: entry.name.clone(),
            depth: entry.depth,
            status: WellStatus::Active,
        }
    }

    /// Build the whole catalog in list order.
    pub fn catalog(entries: &[WellEntry]) -> Vec<Self> {
        entries
            .iter()
            .enumerate()
            .map(|(i, e)| Self::from_entry(i, e))
            .collect()
    }

    /// Sidebar caption, e.g. `Depth: 12500 ft`.
    pub fn depth_label(&self) -> String {
        format!("Depth: {} ft", self.depth)
    }
}
