use serde::{Deserialize, Serialize};
use super::{ChangeRequest, InitConfig, Stage, StageDirection};

/// Intergreen value marking a forbidden transition (also used on the diagonal)
pub const NOT_PERMITTED: i64 = -1;

/// N×N clearance times in seconds, `[from][to]`. `-1` marks a forbidden move.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IntergreenMatrix(pub Vec<Vec<i64>>);

impl IntergreenMatrix {
    /// Build an N×N matrix with the locked value on the diagonal
    #[must_use]
    pub fn uniform(n: usize, off_diagonal: i64, locked: i64) -> Self {
        Self(
            (0..n)
                .map(|r| (0..n).map(|c| if r == c { locked } else { off_diagonal }).collect())
                .collect(),
        )
    }

    #[must_use]
    pub fn get(&self, from: usize, to: usize) -> Option<i64> {
        self.0.get(from).and_then(|row| row.get(to)).copied()
    }

    /// Clearance before `to` may start, forbidden moves counting as zero
    #[must_use]
    pub fn clearance(&self, from: usize, to: usize) -> i64 {
        self.get(from, to).unwrap_or(0).max(0)
    }

    #[must_use]
    pub fn is_permitted(&self, from: usize, to: usize) -> bool {
        self.get(from, to).is_some_and(|v| v != NOT_PERMITTED)
    }

    #[must_use]
    pub fn is_square(&self, n: usize) -> bool {
        self.0.len() == n && self.0.iter().all(|row| row.len() == n)
    }

    /// Copy into an `n`×`n` matrix, keeping existing entries and filling new cells
    #[must_use]
    pub fn resized(&self, n: usize, off_diagonal: i64, locked: i64) -> Self {
        Self(
            (0..n)
                .map(|r| {
                    (0..n)
                        .map(|c| {
                            if r == c {
                                locked
                            } else {
                                self.get(r, c).unwrap_or(off_diagonal)
                            }
                        })
                        .collect()
                })
                .collect(),
        )
    }
}

/// Which intergreen matrix realisation uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntergreenSet {
    #[default]
    Min,
    Max,
}

impl IntergreenSet {
    #[must_use]
    pub fn is_min(&self) -> bool {
        *self == Self::Min
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Junction {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub double_cycle: bool,
    #[serde(default)]
    pub travel_prev: i64,
    #[serde(default)]
    pub travel_next: i64,
    pub stages: Vec<Stage>,
    pub intergreen: IntergreenMatrix,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intergreen_max: Option<IntergreenMatrix>,
    #[serde(default, skip_serializing_if = "IntergreenSet::is_min")]
    pub active_intergreen_set: IntergreenSet,
    #[serde(default)]
    pub utc_plan: Vec<ChangeRequest>,
}

impl Junction {
    /// Create a junction with the configured default stages, intergreens and plan
    #[must_use]
    pub fn from_config(id: &str, cfg: &InitConfig) -> Self {
        let stage_count = usize::try_from(cfg.stage_count.default.max(cfg.stage_count.min)).unwrap_or(2);
        let stages = (1..=stage_count)
            .map(|k| Stage::new(format!("S{k}"), cfg.stage.min_green.default))
            .collect();
        let matrix = IntergreenMatrix::uniform(
            stage_count,
            cfg.intergreen.defaults.off_diagonal,
            cfg.intergreen.diagonal_locked_value,
        );
        Self {
            id: id.to_string(),
            name: format!("Junction {id}"),
            double_cycle: false,
            travel_prev: cfg.journey_time.default,
            travel_next: cfg.journey_time.default,
            stages,
            intergreen: matrix.clone(),
            intergreen_max: Some(matrix),
            active_intergreen_set: IntergreenSet::Min,
            utc_plan: cfg.utc_plan.defaults.clone(),
        }
    }

    /// Cycle length this junction runs at for a given main cycle
    #[must_use]
    pub fn effective_cycle(&self, main_cycle: i64) -> i64 {
        if self.double_cycle {
            main_cycle / 2
        } else {
            main_cycle
        }
    }

    /// The matrix selected by `active_intergreen_set` (falls back to `intergreen`)
    #[must_use]
    pub fn active_intergreen(&self) -> &IntergreenMatrix {
        match (self.active_intergreen_set, &self.intergreen_max) {
            (IntergreenSet::Max, Some(max)) => max,
            _ => &self.intergreen,
        }
    }

    #[must_use]
    pub fn stage_index(&self, label: &str) -> Option<usize> {
        self.stages.iter().position(|s| s.label == label)
    }

    #[must_use]
    pub fn min_green(&self, stage_idx: usize) -> i64 {
        self.stages.get(stage_idx).map_or(0, |s| s.min_green_sec.max(0))
    }

    /// Grow or shrink the stage list, keeping matrices square and plan rows valid
    pub fn resize_stages(&mut self, n: usize, cfg: &InitConfig) {
        if n == 0 {
            return;
        }
        while self.stages.len() < n {
            let label = format!("S{}", self.stages.len() + 1);
            self.stages.push(Stage {
                label,
                min_green_sec: cfg.stage.min_green.default,
                dir: StageDirection::default(),
            });
        }
        self.stages.truncate(n);

        let off = cfg.intergreen.defaults.off_diagonal;
        let locked = cfg.intergreen.diagonal_locked_value;
        self.intergreen = self.intergreen.resized(n, off, locked);
        if let Some(max) = &self.intergreen_max {
            self.intergreen_max = Some(max.resized(n, off, locked));
        }

        let first = self.stages[0].label.clone();
        for row in &mut self.utc_plan {
            if self.stages.iter().all(|s| s.label != row.to) {
                row.to.clone_from(&first);
            }
        }
    }
}
