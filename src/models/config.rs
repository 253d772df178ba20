use serde::{Deserialize, Serialize};
use super::ChangeRequest;

/// Inclusive integer bounds with a default value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub default: i64,
    pub min: i64,
    pub max: i64,
}

impl Bounds {
    #[must_use]
    pub fn clamp(&self, value: i64) -> i64 {
        value.max(self.min).min(self.max)
    }

    #[must_use]
    pub fn contains(&self, value: i64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LowerBound {
    pub default: i64,
    pub min: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageConfig {
    pub min_green: LowerBound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntergreenDefaults {
    pub off_diagonal: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    pub min: i64,
    pub max: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntergreenConfig {
    pub diagonal_locked_value: i64,
    pub defaults: IntergreenDefaults,
    pub domain: Domain,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtcPlanConfig {
    pub defaults: Vec<ChangeRequest>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewCyclesConfig {
    pub default: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlotConfig {
    pub view_cycles: ViewCyclesConfig,
}

/// Validation bounds and defaults loaded from the bundled `initCfg` JSON
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InitConfig {
    pub main_cycle_time: Bounds,
    pub junction_count: Bounds,
    pub stage_count: LowerBound,
    pub stage: StageConfig,
    pub intergreen: IntergreenConfig,
    pub journey_time: Bounds,
    pub utc_plan: UtcPlanConfig,
    pub plot: PlotConfig,
}

impl Default for InitConfig {
    fn default() -> Self {
        Self {
            main_cycle_time: Bounds { default: 60, min: 1, max: 240 },
            junction_count: Bounds { default: 3, min: 2, max: 5 },
            stage_count: LowerBound { default: 2, min: 2 },
            stage: StageConfig {
                min_green: LowerBound { default: 7, min: 1 },
            },
            intergreen: IntergreenConfig {
                diagonal_locked_value: -1,
                defaults: IntergreenDefaults { off_diagonal: 5 },
                domain: Domain { min: 0, max: 60 },
            },
            journey_time: Bounds { default: 20, min: 0, max: 60 },
            utc_plan: UtcPlanConfig {
                defaults: vec![
                    ChangeRequest::new("S1", 0),
                    ChangeRequest::new("S2", 30),
                ],
            },
            plot: PlotConfig {
                view_cycles: ViewCyclesConfig { default: 2 },
            },
        }
    }
}

impl InitConfig {
    /// Parse a configuration override; keys that are absent keep their defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a present key has the wrong shape.
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("Failed to parse config: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_bundled_values() {
        let cfg = InitConfig::default();
        assert_eq!(cfg.main_cycle_time.default, 60);
        assert_eq!(cfg.main_cycle_time.max, 240);
        assert_eq!(cfg.stage.min_green.default, 7);
        assert_eq!(cfg.intergreen.diagonal_locked_value, -1);
        assert_eq!(cfg.utc_plan.defaults.len(), 2);
    }

    #[test]
    fn test_from_json_partial_override() {
        let json = r#"{
            "mainCycleTime": { "default": 90, "min": 30, "max": 180 },
            "stage": { "minGreen": { "default": 5, "min": 3 } }
        }"#;
        let cfg = InitConfig::from_json(json).expect("valid config");
        assert_eq!(cfg.main_cycle_time.default, 90);
        assert_eq!(cfg.main_cycle_time.min, 30);
        assert_eq!(cfg.stage.min_green.min, 3);
        // untouched sections keep defaults
        assert_eq!(cfg.junction_count.max, 5);
        assert_eq!(cfg.intergreen.domain.max, 60);
    }

    #[test]
    fn test_from_json_invalid() {
        let result = InitConfig::from_json("{ \"mainCycleTime\": 12 }");
        assert!(result.is_err());
        assert!(result.expect_err("Expected error").contains("Failed to parse config"));
    }

    #[test]
    fn test_bounds_clamp() {
        let b = Bounds { default: 60, min: 1, max: 240 };
        assert_eq!(b.clamp(0), 1);
        assert_eq!(b.clamp(300), 240);
        assert_eq!(b.clamp(90), 90);
        assert!(b.contains(240));
        assert!(!b.contains(241));
    }
}
