mod types;

pub use types::{RealisationError, RealisedCycle, StageDetail};

use crate::logging::log;
use crate::models::{sorted_plan, Junction};
use crate::time::wrap_into_cycle;

/// Cycles simulated before results are read. The first one only absorbs the
/// arbitrary anchor `RC[0] = first request`; the second is reported.
const SIMULATED_CYCLES: usize = 2;

/// Compute when stage changes actually happen for one junction.
///
/// Requests are honoured no earlier than the current stage's intergreen plus
/// minimum green allow. A change that cannot happen before the request after
/// it falls due makes the plan infeasible. The junction is never mutated.
///
/// # Errors
///
/// Returns the first violated precondition (empty plan, unknown stage,
/// malformed matrix, forbidden move) or the first infeasible change found
/// after the warmup cycle.
pub fn compute_realised_cycle(
    junction: &Junction,
    main_cycle: i64,
) -> Result<RealisedCycle, RealisationError> {
    let cycle = junction.effective_cycle(main_cycle);
    let plan = sorted_plan(&junction.utc_plan);
    let n = plan.len();
    if n == 0 {
        return Err(RealisationError::EmptyPlan {
            junction: junction.name.clone(),
        });
    }
    if cycle <= 0 {
        return Err(RealisationError::InvalidCycle {
            junction: junction.name.clone(),
            cycle,
        });
    }

    let intergreen = junction.active_intergreen();
    if !intergreen.is_square(junction.stages.len()) {
        return Err(RealisationError::MalformedIntergreen {
            junction: junction.name.clone(),
            stages: junction.stages.len(),
        });
    }

    let stage_indices = plan
        .iter()
        .map(|row| {
            junction.stage_index(&row.to).ok_or_else(|| RealisationError::UnknownStage {
                junction: junction.name.clone(),
                label: row.to.clone(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    let label = |idx: usize| junction.stages[idx].label.clone();

    for i in 0..n {
        let from = stage_indices[i];
        let to = stage_indices[(i + 1) % n];
        if !intergreen.is_permitted(from, to) {
            return Err(RealisationError::NotPermitted {
                junction: junction.name.clone(),
                from: label(from),
                to: label(to),
            });
        }
    }

    // Requested times laid out over consecutive cycles; one cycle beyond the
    // simulated horizon so the look-ahead never runs off the end.
    let horizon = i64::try_from(SIMULATED_CYCLES + 1).unwrap_or(i64::MAX);
    let requests: Vec<i64> = (0..=horizon)
        .flat_map(|c| plan.iter().map(move |row| row.at + c * cycle))
        .collect();

    let steps = n * SIMULATED_CYCLES;
    let mut rc = vec![0_i64; steps + 1];
    rc[0] = requests[0];

    for i in 0..steps {
        let cur = stage_indices[i % n];
        let prev = stage_indices[(i + n - 1) % n];
        let next = stage_indices[(i + 1) % n];

        let stage_start = rc[i] + intergreen.clearance(prev, cur);
        let earliest_mg = stage_start + junction.min_green(cur);
        let realised_next = requests[i + 1].max(earliest_mg);
        let next_next_request = requests[i + 2];

        if i >= n && realised_next >= next_next_request {
            return Err(RealisationError::NotAchievable {
                junction: junction.name.clone(),
                from: label(cur),
                to: label(next),
                next_request_at: wrap_into_cycle(next_next_request, cycle),
            });
        }
        rc[i + 1] = realised_next;
    }

    if rc[steps] - rc[n] != cycle {
        log!(
            "{}: realised cycle did not settle after warmup ({}s instead of {}s)",
            junction.name,
            rc[steps] - rc[n],
            cycle
        );
    }

    // Stable cycle, wrapped into [0, Cj) except the closing entry which keeps
    // its +Cj so the last segment can be drawn across the boundary.
    let mut change_times: Vec<i64> = (0..n).map(|i| wrap_into_cycle(rc[n + i], cycle)).collect();
    change_times.push(wrap_into_cycle(rc[2 * n], cycle) + cycle);
    let change_times_mod = change_times.iter().map(|&t| wrap_into_cycle(t, cycle)).collect();

    let details = (0..n)
        .map(|i| {
            let cur = stage_indices[i];
            let prev = stage_indices[(i + n - 1) % n];
            let next = stage_indices[(i + 1) % n];
            let ig_prev = intergreen.clearance(prev, cur);
            let mg_cur = junction.min_green(cur);
            let stage_start = rc[n + i] - cycle + ig_prev;
            let rq_next = requests[n + i + 1] - cycle;
            let realised_next = rc[n + i + 1] - cycle;
            StageDetail {
                i,
                rq_cur: plan[i].at,
                rq_next,
                rq_next2: requests[n + i + 2] - cycle,
                ig_prev,
                mg_cur,
                stage_start,
                earliest_mg: stage_start + mg_cur,
                realised_next,
                delay: realised_next - rq_next,
                cur_stage: label(cur),
                next_stage: label(next),
            }
        })
        .collect();

    Ok(RealisedCycle {
        cycle,
        plan,
        stage_indices,
        change_times,
        change_times_mod,
        details,
    })
}
