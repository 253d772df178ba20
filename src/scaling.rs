//! Rescale UTC plans to a new main cycle, holding intergreens fixed and
//! sharing the change in cycle length out over green time only.

use crate::adjust::compute_realised_cycle_adjusted;
use crate::logging::log;
use crate::models::{is_rotation, sort_plan, ChangeRequest, Junction, PlanContext, Project};
use crate::realisation::compute_realised_cycle;
use crate::time::wrap_into_cycle;
use crate::validation::run_validation;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleMetrics {
    pub cur_cycle: i64,
    pub tgt_cycle: i64,
    /// Target over current effective cycle, rounded to three decimals
    pub factor: f64,
    pub ig_total: i64,
    pub cur_green: i64,
    pub min_green_total: i64,
    pub scaled_green: i64,
    pub need_green: i64,
}

/// Before/after breakdown for one plan row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageScaling {
    pub label: String,
    pub ig_prev: i64,
    pub min_green: i64,
    pub green_old: i64,
    pub green_new: i64,
    pub required_gap: i64,
    pub actual_gap: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaledPlan {
    pub plan: Vec<ChangeRequest>,
    pub metrics: ScaleMetrics,
    pub per_stage: Vec<StageScaling>,
}

/// Outcome of scaling one junction in a preview
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JunctionScaling {
    pub id: String,
    pub name: String,
    pub ok: bool,
    #[serde(flatten)]
    pub scaled: Option<ScaledPlan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub err: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScalePreview {
    pub ok: bool,
    pub details: Vec<JunctionScaling>,
}

/// Build a plan for `target_main` that keeps every intergreen and scales the
/// greens of the current adjusted plan.
///
/// Scaled greens are clamped to minimum green. Any excess over the available
/// green budget is taken back in proportion to each stage's surplus above its
/// minimum; any shortfall is handed out in proportion to the original greens.
/// The result is checked with the realisation engine at the target cycle and
/// must keep the stage sequence up to rotation.
///
/// # Errors
///
/// Returns an error if the current plan does not realise, the target cannot
/// hold the minimum greens and intergreens, or the built plan fails the
/// realisation or sequence check.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
pub fn compute_scaled_plan(
    junction: &Junction,
    ctx: PlanContext<'_>,
    target_main: i64,
) -> Result<ScaledPlan, String> {
    if junction.double_cycle && target_main % 2 != 0 {
        return Err(format!(
            "{}: target main cycle {target_main}s must be even for a double-cycling junction",
            junction.name
        ));
    }
    let cur_cycle = ctx.effective_cycle(junction);
    let tgt_cycle = junction.effective_cycle(target_main);
    if cur_cycle <= 0 || tgt_cycle <= 0 {
        return Err(format!("Invalid cycles for {}", junction.name));
    }

    let current = compute_realised_cycle_adjusted(junction, ctx).map_err(|e| e.to_string())?;
    let n = current.len();

    let ig_prev: Vec<i64> = current.details.iter().map(|d| d.ig_prev).collect();
    let greens: Vec<i64> = current.details.iter().map(|d| d.green()).collect();
    let mins: Vec<i64> = current.details.iter().map(|d| d.mg_cur).collect();

    let factor = tgt_cycle as f64 / cur_cycle as f64;
    let mut scaled: Vec<i64> = greens
        .iter()
        .zip(&mins)
        .map(|(&g, &min)| ((g as f64 * factor).round() as i64).max(0).max(min))
        .collect();

    let ig_total: i64 = ig_prev.iter().sum();
    let min_total: i64 = mins.iter().sum();
    let need = tgt_cycle - ig_total;
    let scaled_total: i64 = scaled.iter().sum();

    if scaled_total > need {
        let mut over = scaled_total - need;
        let mut surplus: Vec<i64> = scaled.iter().zip(&mins).map(|(&g, &m)| (g - m).max(0)).collect();
        let total_surplus: i64 = surplus.iter().sum();
        if total_surplus < over {
            return Err(format!(
                "{}: min greens ({min_total}s) + fixed intergreens ({ig_total}s) exceed {tgt_cycle}s (need ≤ {need}s green).",
                junction.name
            ));
        }

        let initial_over = over;
        for i in 0..n {
            let take = surplus[i].min(initial_over * surplus[i] / total_surplus);
            scaled[i] -= take;
            surplus[i] -= take;
            over -= take;
        }
        // remaining seconds one at a time; total surplus still covers them
        while over > 0 {
            for i in 0..n {
                if over == 0 {
                    break;
                }
                if surplus[i] > 0 {
                    scaled[i] -= 1;
                    surplus[i] -= 1;
                    over -= 1;
                }
            }
        }
    }

    let mut slack = need - scaled.iter().sum::<i64>();
    if slack > 0 {
        let base: i64 = greens.iter().sum();
        if base > 0 {
            let initial_slack = slack;
            for i in 0..n {
                let add = initial_slack * greens[i] / base;
                scaled[i] += add;
                slack -= add;
            }
        }
        let mut k = 0;
        while slack > 0 {
            scaled[k % n] += 1;
            slack -= 1;
            k += 1;
        }
    }

    let label = |i: usize| current.plan[i].to.clone();
    let per_stage: Vec<StageScaling> = (0..n)
        .map(|i| StageScaling {
            label: label(i),
            ig_prev: ig_prev[i],
            min_green: mins[i],
            green_old: greens[i],
            green_new: scaled[i],
            required_gap: ig_prev[i] + mins[i],
            actual_gap: ig_prev[i] + scaled[i],
        })
        .collect();

    // Boundaries anchored at 0, each request placed exactly at its change time
    let mut at = 0_i64;
    let mut plan = Vec::with_capacity(n);
    for i in 0..n {
        plan.push(ChangeRequest::new(label(i), wrap_into_cycle(at, tgt_cycle)));
        at += (ig_prev[i] + scaled[i]).max(1);
    }
    sort_plan(&mut plan);

    let mut probe = junction.clone();
    probe.utc_plan.clone_from(&plan);
    let verified = compute_realised_cycle(&probe, target_main).map_err(|e| e.to_string())?;
    if !is_rotation(&current.stage_sequence(), &verified.stage_sequence()) {
        return Err(format!(
            "{}: stage sequence changed unexpectedly (would miss or reorder a stage).",
            junction.name
        ));
    }

    let metrics = ScaleMetrics {
        cur_cycle,
        tgt_cycle,
        factor: (factor * 1000.0).round() / 1000.0,
        ig_total,
        cur_green: greens.iter().sum(),
        min_green_total: min_total,
        scaled_green: scaled.iter().sum(),
        need_green: need,
    };
    log!("{}: scaled {}s → {}s (factor {})", junction.name, cur_cycle, tgt_cycle, metrics.factor);

    Ok(ScaledPlan {
        plan,
        metrics,
        per_stage,
    })
}

fn check_target(project: &Project, target: i64) -> Result<(), String> {
    let bounds = project.config.main_cycle_time;
    if bounds.contains(target) {
        Ok(())
    } else {
        Err(format!("Target must be between {} and {} seconds.", bounds.min, bounds.max))
    }
}

fn candidate_junctions(project: &Project, remove_double: bool) -> Vec<Junction> {
    let mut junctions = project.junctions.clone();
    if remove_double {
        for j in &mut junctions {
            j.double_cycle = false;
        }
    }
    junctions
}

/// Scale every junction on copies and report each outcome; the project is left untouched
///
/// # Errors
///
/// Returns an error if `target` is outside the configured main cycle bounds.
pub fn scale_preview(project: &Project, target: i64, remove_double: bool) -> Result<ScalePreview, String> {
    check_target(project, target)?;
    let ctx = project.context();
    let details: Vec<JunctionScaling> = candidate_junctions(project, remove_double)
        .iter()
        .map(|j| {
            let result = compute_scaled_plan(j, ctx, target);
            JunctionScaling {
                id: j.id.clone(),
                name: j.name.clone(),
                ok: result.is_ok(),
                err: result.as_ref().err().cloned(),
                scaled: result.ok(),
            }
        })
        .collect();
    Ok(ScalePreview {
        ok: details.iter().all(|d| d.ok),
        details,
    })
}

/// Scale every junction and commit the new plans and main cycle.
///
/// Nothing is changed unless every junction scales. Scaled junctions lose
/// their pending adjustments since those are folded into the new plan.
/// Returns the validation messages of the updated project.
///
/// # Errors
///
/// Returns the first junction's scaling error, or a target bounds error.
pub fn apply_scale(project: &mut Project, target: i64, remove_double: bool) -> Result<Vec<String>, String> {
    check_target(project, target)?;
    let candidates = candidate_junctions(project, remove_double);
    let ctx = project.context();
    let plans = candidates
        .iter()
        .map(|j| compute_scaled_plan(j, ctx, target).map(|s| s.plan))
        .collect::<Result<Vec<_>, _>>()?;

    for (junction, plan) in project.junctions.iter_mut().zip(plans) {
        if remove_double {
            junction.double_cycle = false;
        }
        junction.utc_plan = plan;
        project.temp.clear_junction(&junction.id);
    }
    project.main_cycle = target;
    log!("Scaled plans to {}s and updated main cycle", target);

    Ok(run_validation(project))
}
