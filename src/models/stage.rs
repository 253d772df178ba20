use serde::{Deserialize, Serialize};

/// A stage (green phase) of a junction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stage {
    pub label: String,
    pub min_green_sec: i64,
    #[serde(default)]
    pub dir: StageDirection,
}

impl Stage {
    #[must_use]
    pub fn new(label: impl Into<String>, min_green_sec: i64) -> Self {
        Self {
            label: label.into(),
            min_green_sec,
            dir: StageDirection::default(),
        }
    }
}

/// Direction icon metadata. Presentation only, never consulted by the timing core.
///
/// Older files store a short code string, newer files the structured form.
/// The loaded shape is kept so saving writes back what was read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StageDirection {
    Legacy(String),
    Structured(DirectionDescriptor),
}

impl Default for StageDirection {
    fn default() -> Self {
        Self::Legacy("none".to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectionDescriptor {
    pub primary: String,
    #[serde(default)]
    pub primary_moves: Vec<String>,
    #[serde(default = "none_code")]
    pub secondary: String,
    #[serde(default)]
    pub secondary_moves: Vec<String>,
}

fn none_code() -> String {
    "none".to_string()
}

impl DirectionDescriptor {
    fn single(primary: &str, moves: &[&str]) -> Self {
        Self {
            primary: primary.to_string(),
            primary_moves: moves.iter().map(ToString::to_string).collect(),
            secondary: none_code(),
            secondary_moves: Vec::new(),
        }
    }

    fn pair(primary: &str, secondary: &str) -> Self {
        Self {
            primary: primary.to_string(),
            primary_moves: vec!["A".to_string()],
            secondary: secondary.to_string(),
            secondary_moves: vec!["A".to_string()],
        }
    }
}

impl StageDirection {
    /// Resolve to the structured form. Legacy single directions default to an ahead move.
    #[must_use]
    pub fn resolve(&self) -> DirectionDescriptor {
        match self {
            Self::Structured(descriptor) => descriptor.clone(),
            Self::Legacy(code) => match code.as_str() {
                "P" => DirectionDescriptor::single("P", &[]),
                "N" | "E" | "S" | "W" => DirectionDescriptor::single(code, &["A"]),
                "EW" => DirectionDescriptor::pair("E", "W"),
                "NS" => DirectionDescriptor::pair("N", "S"),
                _ => DirectionDescriptor::single("none", &[]),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_legacy_codes() {
        let none = StageDirection::default().resolve();
        assert_eq!(none.primary, "none");
        assert!(none.primary_moves.is_empty());

        let east = StageDirection::Legacy("E".to_string()).resolve();
        assert_eq!(east.primary, "E");
        assert_eq!(east.primary_moves, vec!["A".to_string()]);
        assert_eq!(east.secondary, "none");

        let ns = StageDirection::Legacy("NS".to_string()).resolve();
        assert_eq!(ns.primary, "N");
        assert_eq!(ns.secondary, "S");

        let unknown = StageDirection::Legacy("XYZ".to_string()).resolve();
        assert_eq!(unknown.primary, "none");
    }

    #[test]
    fn test_direction_keeps_loaded_shape() {
        let legacy: StageDirection = serde_json::from_str("\"W\"").expect("legacy code");
        assert_eq!(legacy, StageDirection::Legacy("W".to_string()));
        assert_eq!(serde_json::to_string(&legacy).expect("serialize"), "\"W\"");

        let structured: StageDirection = serde_json::from_str(
            r#"{"primary":"N","primaryMoves":["L","A"],"secondary":"none","secondaryMoves":[]}"#,
        )
        .expect("structured descriptor");
        let StageDirection::Structured(descriptor) = structured else {
            panic!("expected structured direction");
        };
        assert_eq!(descriptor.primary_moves.len(), 2);
    }

    #[test]
    fn test_stage_missing_dir_defaults_to_none() {
        let stage: Stage = serde_json::from_str(r#"{"label":"S1","minGreenSec":7}"#).expect("stage");
        assert_eq!(stage.dir, StageDirection::default());
    }
}
