use crate::logging::log;
use crate::models::{InitConfig, IntergreenMatrix, Junction, Project, NOT_PERMITTED};
use crate::realisation::compute_realised_cycle;
use std::collections::HashMap;

/// Check one junction's configuration and, if it is structurally sound, its
/// committed plan's realisability at `main_cycle`.
///
/// Returns every problem found as `"<name>: <message>"`; empty means valid.
#[must_use]
pub fn validate_junction(junction: &Junction, main_cycle: i64, config: &InitConfig) -> Vec<String> {
    let name = &junction.name;
    let mut errors = Vec::new();

    let floor = config.stage.min_green.min;
    for stage in &junction.stages {
        if stage.min_green_sec < floor {
            errors.push(format!("{name}: Stage {} minGreen < {floor}", stage.label));
        }
    }

    check_matrix(junction, &junction.intergreen, "Intergreen", config, &mut errors);
    if let Some(max) = &junction.intergreen_max {
        check_matrix(junction, max, "Max intergreen", config, &mut errors);
    }

    let cycle = junction.effective_cycle(main_cycle);
    if junction.utc_plan.is_empty() {
        errors.push(format!("{name}: UTC plan empty"));
    }
    let mut seen: HashMap<i64, usize> = HashMap::new();
    for (i, row) in junction.utc_plan.iter().enumerate() {
        let row_no = i + 1;
        if row.at < 0 {
            errors.push(format!("{name}: Plan row #{row_no} at={} is negative", row.at));
        }
        if row.at >= cycle {
            errors.push(format!("{name}: Plan row #{row_no} at={} ≥ cycle ({cycle})", row.at));
        }
        if junction.stage_index(&row.to).is_none() {
            errors.push(format!("{name}: Plan row #{row_no} stage '{}' not found", row.to));
        }
        if let Some(first) = seen.insert(row.at, row_no) {
            errors.push(format!(
                "{name}: Plan rows #{first} and #{row_no} both request t={}s",
                row.at
            ));
        }
    }

    if errors.is_empty() {
        match compute_realised_cycle(junction, main_cycle) {
            Ok(rc) if !rc.is_closed() => errors.push(format!(
                "{name}: Realised cycle does not repeat ({}s instead of {cycle}s); delays grow every cycle",
                rc.closing_span()
            )),
            Ok(_) => {}
            Err(e) => errors.push(e.to_string()),
        }
    }
    errors
}

fn check_matrix(
    junction: &Junction,
    matrix: &IntergreenMatrix,
    what: &str,
    config: &InitConfig,
    errors: &mut Vec<String>,
) {
    let n = junction.stages.len();
    let name = &junction.name;
    if !matrix.is_square(n) {
        errors.push(format!("{name}: {what} matrix must be {n}×{n}"));
        return;
    }

    let locked = config.intergreen.diagonal_locked_value;
    let domain = config.intergreen.domain;
    for (from, row) in matrix.0.iter().enumerate() {
        for (to, &value) in row.iter().enumerate() {
            let (a, b) = (&junction.stages[from].label, &junction.stages[to].label);
            if from == to {
                if value != locked {
                    errors.push(format!("{name}: {what} {a} → {b} must be {locked}"));
                }
            } else if value != NOT_PERMITTED && !(domain.min..=domain.max).contains(&value) {
                errors.push(format!(
                    "{name}: {what} {a} → {b} = {value}s outside {}..{}s",
                    domain.min, domain.max
                ));
            }
        }
    }
}

/// Validate the whole project: main cycle constraints, then every junction.
///
/// Problems from all junctions are collected so they can be shown together.
#[must_use]
pub fn run_validation(project: &Project) -> Vec<String> {
    let mut errors = Vec::new();
    let main = project.main_cycle;
    let bounds = project.config.main_cycle_time;

    if !bounds.contains(main) {
        errors.push(format!(
            "Main cycle {main}s outside {}..{}s",
            bounds.min, bounds.max
        ));
    }
    if project.junctions.iter().any(|j| j.double_cycle) && main % 2 != 0 {
        errors.push("Main cycle must be even when any junction is double-cycling.".to_string());
    }
    if !project.junctions.iter().any(|j| !j.double_cycle) {
        errors.push("At least one junction must run the main cycle (not double).".to_string());
    }
    for junction in &project.junctions {
        errors.extend(validate_junction(junction, main, &project.config));
    }

    if errors.is_empty() {
        log!("VALIDATION OK");
    } else {
        log!("Validation failed with {} problem(s)", errors.len());
        for e in &errors {
            log!("  {}", e);
        }
    }
    errors
}
