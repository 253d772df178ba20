use crate::models::{InitConfig, Junction, Project, TempAdjustments};
use crate::storage::{FILE_EXTENSION, FILE_FORMAT_VERSION};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MainSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_cycle: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_cycles: Option<i64>,
}

/// JSON body of a saved diagram
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectFile {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub exported_at: String,
    #[serde(default)]
    pub main: MainSettings,
    #[serde(default)]
    pub junctions: Vec<Junction>,
    #[serde(default)]
    pub overlays: Vec<serde_json::Value>,
    #[serde(default)]
    pub temp: TempAdjustments,
}

impl ProjectFile {
    #[must_use]
    pub fn from_project(project: &Project, exported_at: String) -> Self {
        Self {
            version: FILE_FORMAT_VERSION.to_string(),
            exported_at,
            main: MainSettings {
                main_cycle: Some(project.main_cycle),
                view_cycles: Some(project.view_cycles),
            },
            junctions: project.junctions.clone(),
            overlays: project.overlays.clone(),
            temp: project.temp.clone(),
        }
    }

    /// Rebuild a session; main settings missing from the file take the configured defaults
    #[must_use]
    pub fn into_project(self, config: &InitConfig) -> Project {
        Project {
            main_cycle: self.main.main_cycle.unwrap_or(config.main_cycle_time.default),
            view_cycles: self.main.view_cycles.unwrap_or(config.plot.view_cycles.default),
            junctions: self.junctions,
            overlays: self.overlays,
            temp: self.temp,
            config: config.clone(),
        }
    }
}

fn export_timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%:z").to_string()
}

fn header(file: &ProjectFile) -> String {
    [
        "# Signal Plan Checker export".to_string(),
        format!("# Version: {}", file.version),
        format!("# Exported: {}", file.exported_at),
        "#".to_string(),
        "# The JSON below contains:".to_string(),
        "#  - main: mainCycle, viewCycles".to_string(),
        "#  - junctions: per-junction config (stages, intergreens, utcPlan)".to_string(),
        "#  - overlays: any saved overlays".to_string(),
        "#  - temp: uncommitted adjustments (offsets, boundary, transfers)".to_string(),
        "#".to_string(),
        String::new(),
    ]
    .join("\n")
}

/// Render a project as a commented, human-readable diagram file
///
/// # Errors
/// Returns an error if JSON serialization fails
pub fn export_project_text(project: &Project) -> Result<String, String> {
    let file = ProjectFile::from_project(project, export_timestamp());
    let json = serde_json::to_string_pretty(&file)
        .map_err(|e| format!("Failed to serialize project: {e}"))?;
    Ok(format!("{}{json}\n", header(&file)))
}

/// Parse a diagram file, ignoring `#` comment lines
///
/// # Errors
/// Returns an error if the remaining text is not a valid project JSON
pub fn parse_project_text(text: &str) -> Result<ProjectFile, String> {
    let json = text
        .lines()
        .filter(|line| !line.trim_start().starts_with('#'))
        .collect::<Vec<_>>()
        .join("\n");
    serde_json::from_str(&json).map_err(|e| format!("Failed to parse project: {e}"))
}

/// Parse a diagram file straight into a session
///
/// # Errors
/// Returns an error if the file cannot be parsed
pub fn load_project_text(text: &str, config: &InitConfig) -> Result<Project, String> {
    parse_project_text(text).map(|file| file.into_project(config))
}

/// Clean a user-entered file name and force the `.TD2` extension
#[must_use]
pub fn ensure_td2(name: &str) -> String {
    let stripped: String = name
        .trim()
        .chars()
        .filter(|c| !matches!(c, '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|'))
        .collect();
    let cleaned = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
    if cleaned.is_empty() {
        return format!("My Diagram{FILE_EXTENSION}");
    }
    if cleaned.to_ascii_lowercase().ends_with(&FILE_EXTENSION.to_ascii_lowercase()) {
        cleaned
    } else {
        format!("{cleaned}{FILE_EXTENSION}")
    }
}

/// Default name offered when saving: the current file's stem, or a timestamped name
#[must_use]
pub fn suggested_file_name(current: Option<&str>) -> String {
    if let Some(name) = current.filter(|n| !n.is_empty()) {
        let ext_len = FILE_EXTENSION.len();
        let has_ext = name.len() >= ext_len
            && name.is_char_boundary(name.len() - ext_len)
            && name[name.len() - ext_len..].eq_ignore_ascii_case(FILE_EXTENSION);
        return if has_ext {
            name[..name.len() - ext_len].to_string()
        } else {
            name.to_string()
        };
    }
    format!("Signal-Plan-{}", chrono::Utc::now().format("%Y-%m-%d-%H-%M-%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FixedPoint, StageDirection, StageTransfer};

    #[test]
    fn test_export_has_header_and_parses_back() {
        let mut project = Project::default();
        project.main_cycle = 90;
        project.set_offset("B", 12);
        project.set_boundary_nudge("A", 1, -3);
        project
            .add_transfer(
                "C",
                StageTransfer {
                    donor: "S1".to_string(),
                    recipient: "S2".to_string(),
                    fixed_point: FixedPoint::Sog,
                    amount: 3,
                },
            )
            .expect("transfer fits");

        let text = export_project_text(&project).expect("Failed to export");
        assert!(text.starts_with("# Signal Plan Checker export\n# Version: 2.6.1h\n# Exported: "));
        assert!(text.ends_with("}\n"));

        let loaded = load_project_text(&text, &InitConfig::default()).expect("Failed to load");
        assert_eq!(loaded, project);
    }

    #[test]
    fn test_parse_ignores_indented_comments() {
        let text = "# header\n   # indented\n{\"main\": {\"mainCycle\": 72}, \"junctions\": []}\n";
        let file = parse_project_text(text).expect("Failed to parse");
        assert_eq!(file.main.main_cycle, Some(72));
        assert!(file.junctions.is_empty());
    }

    #[test]
    fn test_load_fills_missing_fields() {
        let text = r#"
# Signal Plan Checker export
{
  "junctions": [
    {
      "id": "A",
      "name": "High St",
      "stages": [
        { "label": "S1", "minGreenSec": 7 },
        { "label": "S2", "minGreenSec": 9, "dir": "EW" }
      ],
      "intergreen": [[-1, 5], [6, -1]],
      "utcPlan": [{ "to": "S1", "at": 0 }, { "to": "S2", "at": 30 }]
    }
  ],
  "temp": { "offsets": { "A": 4 }, "boundary": { "A": { "1": 2 } } }
}
"#;
        let project = load_project_text(text, &InitConfig::default()).expect("Failed to load");
        assert_eq!(project.main_cycle, 60);
        assert_eq!(project.view_cycles, 2);
        let j = &project.junctions[0];
        assert!(!j.double_cycle);
        assert_eq!(j.travel_prev, 0);
        assert_eq!(j.stages[0].dir, StageDirection::default());
        assert_eq!(j.stages[1].dir, StageDirection::Legacy("EW".to_string()));
        assert!(j.intergreen_max.is_none());
        assert_eq!(project.temp.offset("A"), 4);
        assert_eq!(project.temp.boundary_nudges("A").and_then(|b| b.get(&1)), Some(&2));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = parse_project_text("# only a comment\nnot json").expect_err("Expected error");
        assert!(err.starts_with("Failed to parse project"));
    }

    #[test]
    fn test_ensure_td2() {
        assert_eq!(ensure_td2("  My:Plan*  v2 "), "MyPlan v2.TD2");
        assert_eq!(ensure_td2("junction.td2"), "junction.td2");
        assert_eq!(ensure_td2("a/b\\c"), "abc.TD2");
        assert_eq!(ensure_td2("  ?? "), "My Diagram.TD2");
    }

    #[test]
    fn test_suggested_file_name() {
        assert_eq!(suggested_file_name(Some("corridor.TD2")), "corridor");
        assert_eq!(suggested_file_name(Some("corridor.td2")), "corridor");
        assert_eq!(suggested_file_name(Some("corridor")), "corridor");
        let fresh = suggested_file_name(None);
        assert!(fresh.starts_with("Signal-Plan-"));
        assert_eq!(fresh.len(), "Signal-Plan-".len() + 19);
    }
}
