//! JSON-in/JSON-out entry points for the browser renderer.
//!
//! Every function takes the diagram text (commented header optional) and
//! returns a JSON string; failures come back as string `JsValue`s.

use crate::models::{FixedPoint, InitConfig, Project};
use crate::realisation::RealisedCycle;
use crate::storage::{export_project_text, load_project_text};
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
fn start() {
    console_error_panic_hook::set_once();
}

#[derive(Serialize)]
struct JunctionRealisation<'a> {
    id: &'a str,
    name: &'a str,
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<RealisedCycle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    err: Option<String>,
}

fn load(text: &str) -> Result<Project, JsValue> {
    load_project_text(text, &InitConfig::default()).map_err(|e| JsValue::from_str(&e))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| JsValue::from_str(&format!("Failed to serialize result: {e}")))
}

fn parse_fixed_point(value: &str) -> Result<FixedPoint, JsValue> {
    match value.to_ascii_lowercase().as_str() {
        "sog" => Ok(FixedPoint::Sog),
        "eog" => Ok(FixedPoint::Eog),
        other => Err(JsValue::from_str(&format!("Unknown fixed point '{other}'"))),
    }
}

/// Realised cycle of every junction, with pending adjustments applied
///
/// # Errors
/// Returns an error if the project text cannot be parsed
#[wasm_bindgen(js_name = realiseProject)]
pub fn realise_project(project_text: &str) -> Result<String, JsValue> {
    let project = load(project_text)?;
    let rows: Vec<JunctionRealisation> = project
        .junctions
        .iter()
        .map(|j| {
            let result = project.realised_cycle(j);
            JunctionRealisation {
                id: &j.id,
                name: &j.name,
                ok: result.is_ok(),
                err: result.as_ref().err().map(ToString::to_string),
                result: result.ok(),
            }
        })
        .collect();
    to_json(&rows)
}

/// Validation messages for the project; an empty array means valid
///
/// # Errors
/// Returns an error if the project text cannot be parsed
#[wasm_bindgen(js_name = validateProject)]
pub fn validate_project(project_text: &str) -> Result<String, JsValue> {
    let project = load(project_text)?;
    to_json(&crate::validation::run_validation(&project))
}

/// # Errors
/// Returns an error if the project text cannot be parsed or the target is out of bounds
#[wasm_bindgen(js_name = scalePreview)]
pub fn scale_preview(project_text: &str, target: i32, remove_double: bool) -> Result<String, JsValue> {
    let project = load(project_text)?;
    let preview = crate::scaling::scale_preview(&project, i64::from(target), remove_double)
        .map_err(|e| JsValue::from_str(&e))?;
    to_json(&preview)
}

/// Scale all plans and return the updated diagram text
///
/// # Errors
/// Returns the first scaling failure
#[wasm_bindgen(js_name = applyScale)]
pub fn apply_scale(project_text: &str, target: i32, remove_double: bool) -> Result<String, JsValue> {
    let mut project = load(project_text)?;
    crate::scaling::apply_scale(&mut project, i64::from(target), remove_double)
        .map_err(|e| JsValue::from_str(&e))?;
    export_project_text(&project).map_err(|e| JsValue::from_str(&e))
}

/// # Errors
/// Returns an error if there are no junctions or a plan does not realise
#[wasm_bindgen(js_name = suggestMinCycle)]
pub fn suggest_min_cycle(project_text: &str) -> Result<String, JsValue> {
    let project = load(project_text)?;
    let suggestion =
        crate::suggest::suggest_min_cycle(&project.junctions, project.context(), &project.config)
            .map_err(|e| JsValue::from_str(&e))?;
    to_json(&suggestion)
}

/// Preview a stage time transfer against the junction's adjusted plan
///
/// # Errors
/// Returns an error if the junction is missing or the transfer is rejected
#[wasm_bindgen(js_name = transferPreview)]
pub fn transfer_preview(
    project_text: &str,
    junction_id: &str,
    donor: &str,
    recipient: &str,
    seconds: i32,
    fixed_point: &str,
) -> Result<String, JsValue> {
    let project = load(project_text)?;
    let junction = project
        .junction(junction_id)
        .ok_or_else(|| JsValue::from_str(&format!("Junction {junction_id} not found")))?;
    let outcome = crate::transfer::calculate_stage_time_transfer(
        junction,
        project.context(),
        None,
        donor,
        recipient,
        i64::from(seconds),
        parse_fixed_point(fixed_point)?,
    )
    .map_err(|e| JsValue::from_str(&e))?;
    to_json(&outcome)
}

/// A fresh default diagram as file text
///
/// # Errors
/// Returns an error if serialization fails
#[wasm_bindgen(js_name = defaultProject)]
pub fn default_project() -> Result<String, JsValue> {
    export_project_text(&Project::default()).map_err(|e| JsValue::from_str(&e))
}

#[wasm_bindgen(js_name = ensureTd2)]
#[must_use]
pub fn ensure_td2(name: &str) -> String {
    crate::storage::ensure_td2(name)
}
