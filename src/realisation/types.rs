//! Result and error types of cycle realisation.

use crate::models::ChangeRequest;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Diagnostics for one plan row of the stable (second) simulated cycle.
///
/// Times are cycle-relative without wrapping, so `realised_next` may exceed
/// the cycle length for the last row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageDetail {
    pub i: usize,
    pub rq_cur: i64,
    pub rq_next: i64,
    pub rq_next2: i64,
    pub ig_prev: i64,
    pub mg_cur: i64,
    pub stage_start: i64,
    #[serde(rename = "earliestMG")]
    pub earliest_mg: i64,
    pub realised_next: i64,
    /// Seconds the following change was held back by min green or intergreen
    pub delay: i64,
    pub cur_stage: String,
    pub next_stage: String,
}

impl StageDetail {
    /// Green time actually shown for this row's stage
    #[must_use]
    pub fn green(&self) -> i64 {
        (self.realised_next - self.stage_start).max(0)
    }

    /// Whether the UTC request was honoured late (drawn as a queued change)
    #[must_use]
    pub fn is_queued(&self) -> bool {
        self.delay > 0
    }
}

/// Realised stage-change times of one junction over its effective cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RealisedCycle {
    #[serde(rename = "Cj")]
    pub cycle: i64,
    pub plan: Vec<ChangeRequest>,
    #[serde(rename = "toIdx")]
    pub stage_indices: Vec<usize>,
    /// `N + 1` change times in `[0, Cj)`, the last one carrying the `+Cj` wrap
    #[serde(rename = "RC")]
    pub change_times: Vec<i64>,
    #[serde(rename = "RCmod")]
    pub change_times_mod: Vec<i64>,
    pub details: Vec<StageDetail>,
}

impl RealisedCycle {
    #[must_use]
    pub fn len(&self) -> usize {
        self.plan.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plan.is_empty()
    }

    /// Span of the reported cycle, from the first change to the wrapped closing one
    #[must_use]
    pub fn closing_span(&self) -> i64 {
        match (self.change_times.first(), self.change_times.last()) {
            (Some(first), Some(last)) => last - first,
            _ => 0,
        }
    }

    /// Whether the reported cycle repeats itself every `Cj` seconds
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closing_span() == self.cycle
    }

    /// Stage labels in plan order
    #[must_use]
    pub fn stage_sequence(&self) -> Vec<&str> {
        self.plan.iter().map(|row| row.to.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RealisationError {
    EmptyPlan {
        junction: String,
    },
    InvalidCycle {
        junction: String,
        cycle: i64,
    },
    UnknownStage {
        junction: String,
        label: String,
    },
    MalformedIntergreen {
        junction: String,
        stages: usize,
    },
    NotPermitted {
        junction: String,
        from: String,
        to: String,
    },
    NotAchievable {
        junction: String,
        from: String,
        to: String,
        next_request_at: i64,
    },
}

impl RealisationError {
    #[must_use]
    pub fn junction(&self) -> &str {
        match self {
            Self::EmptyPlan { junction }
            | Self::InvalidCycle { junction, .. }
            | Self::UnknownStage { junction, .. }
            | Self::MalformedIntergreen { junction, .. }
            | Self::NotPermitted { junction, .. }
            | Self::NotAchievable { junction, .. } => junction,
        }
    }
}

impl fmt::Display for RealisationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPlan { junction } => write!(f, "{junction}: UTC plan empty"),
            Self::InvalidCycle { junction, cycle } => {
                write!(f, "{junction}: Invalid effective cycle {cycle}s")
            }
            Self::UnknownStage { junction, label } => {
                write!(f, "{junction}: Stage '{label}' not found")
            }
            Self::MalformedIntergreen { junction, stages } => {
                write!(f, "{junction}: Intergreen matrix must be {stages}×{stages}")
            }
            Self::NotPermitted { junction, from, to } => {
                write!(f, "{junction}: Stage move not permitted {from} → {to}")
            }
            Self::NotAchievable { junction, from, to, next_request_at } => write!(
                f,
                "{junction}: Stage change not achievable {from} → {to} before next request at t={next_request_at}s"
            ),
        }
    }
}

impl std::error::Error for RealisationError {}
