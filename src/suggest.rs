use crate::adjust::compute_realised_cycle_adjusted;
use crate::logging::log;
use crate::models::{InitConfig, Junction, PlanContext};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JunctionMinCycle {
    pub id: String,
    pub name: String,
    pub sum_intergreen: i64,
    pub sum_min_green: i64,
    /// Shortest effective cycle this junction's current sequence can run in
    pub min_cycle: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MinCycleSuggestion {
    pub min_main: i64,
    #[serde(rename = "perJ")]
    pub per_junction: Vec<JunctionMinCycle>,
}

/// Smallest main cycle at which every junction can run its used stage
/// sequence at minimum green plus the intergreens of the moves it makes.
///
/// Double-cycling junctions need twice their own minimum in the main cycle,
/// and force the suggestion to be even. The result is clamped to the
/// configured main cycle bounds.
///
/// # Errors
///
/// Returns an error if there are no junctions or any junction's adjusted plan
/// does not realise.
pub fn suggest_min_cycle(
    junctions: &[Junction],
    ctx: PlanContext<'_>,
    config: &InitConfig,
) -> Result<MinCycleSuggestion, String> {
    if junctions.is_empty() {
        return Err("No junctions available".to_string());
    }

    let mut per_junction = Vec::with_capacity(junctions.len());
    let mut max_need = 0;
    let mut any_double = false;
    for junction in junctions {
        let realised = compute_realised_cycle_adjusted(junction, ctx).map_err(|e| e.to_string())?;
        let sum_intergreen: i64 = realised.details.iter().map(|d| d.ig_prev).sum();
        let sum_min_green: i64 = realised.details.iter().map(|d| d.mg_cur).sum();
        let min_cycle = sum_intergreen + sum_min_green;

        // a double-cycling junction fits two of its cycles into one main cycle
        let main_need = if junction.double_cycle {
            any_double = true;
            min_cycle * 2
        } else {
            min_cycle
        };
        max_need = max_need.max(main_need);

        per_junction.push(JunctionMinCycle {
            id: junction.id.clone(),
            name: junction.name.clone(),
            sum_intergreen,
            sum_min_green,
            min_cycle,
        });
    }

    // halving an odd main cycle would leave double-cycling junctions a fractional cycle
    if any_double && max_need % 2 != 0 {
        max_need += 1;
    }
    let min_main = config.main_cycle_time.clamp(max_need);
    log!("Suggested main cycle: {}s", min_main);

    Ok(MinCycleSuggestion { min_main, per_junction })
}
