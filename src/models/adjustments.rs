use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Which edge of the donor's green stays put during a time transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixedPoint {
    /// Start of green
    Sog,
    /// End of green
    #[default]
    Eog,
}

impl fmt::Display for FixedPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sog => write!(f, "SOG"),
            Self::Eog => write!(f, "EOG"),
        }
    }
}

/// A pending stage-to-stage green time transfer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageTransfer {
    pub donor: String,
    pub recipient: String,
    pub fixed_point: FixedPoint,
    pub amount: i64,
}

/// Uncommitted, session-scoped plan adjustments keyed by junction id
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TempAdjustments {
    pub offsets: IndexMap<String, i64>,
    /// Per junction: plan row index (in the offset, sorted plan) to delta seconds
    pub boundary: IndexMap<String, BTreeMap<usize, i64>>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub transfers: IndexMap<String, Vec<StageTransfer>>,
}

impl TempAdjustments {
    #[must_use]
    pub fn offset(&self, junction_id: &str) -> i64 {
        self.offsets.get(junction_id).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn boundary_nudges(&self, junction_id: &str) -> Option<&BTreeMap<usize, i64>> {
        self.boundary.get(junction_id)
    }

    #[must_use]
    pub fn transfers_for(&self, junction_id: &str) -> &[StageTransfer] {
        self.transfers.get(junction_id).map_or(&[], Vec::as_slice)
    }

    /// Drop every adjustment held for one junction
    pub fn clear_junction(&mut self, junction_id: &str) {
        self.offsets.shift_remove(junction_id);
        self.boundary.shift_remove(junction_id);
        self.transfers.shift_remove(junction_id);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty() && self.boundary.is_empty() && self.transfers.is_empty()
    }
}
