//! Temporary plan adjustments: global offset, per-boundary nudges and stage
//! time transfers layered over a junction's committed UTC plan.

use crate::logging::log;
use crate::models::{sort_plan, sorted_plan, ChangeRequest, Junction, PlanContext, Project, StageTransfer};
use crate::realisation::{compute_realised_cycle, RealisationError, RealisedCycle};
use crate::time::wrap_into_cycle;
use crate::transfer::calculate_stage_time_transfer;

/// The junction's plan with all pending adjustments applied, sorted by time.
///
/// Order is fixed: offset, then boundary nudges, then transfers in the order
/// they were added. A transfer that no longer fits is skipped. The stored
/// plan is never touched.
#[must_use]
pub fn adjusted_plan(junction: &Junction, ctx: PlanContext<'_>) -> Vec<ChangeRequest> {
    let mut plan = offset_and_nudged_plan(junction, ctx);

    for transfer in ctx.temp.transfers_for(&junction.id) {
        match calculate_stage_time_transfer(
            junction,
            ctx,
            Some(&plan),
            &transfer.donor,
            &transfer.recipient,
            transfer.amount,
            transfer.fixed_point,
        ) {
            Ok(outcome) => plan = outcome.new_plan,
            Err(e) => log!("{}: skipping transfer {} → {}: {}", junction.name, transfer.donor, transfer.recipient, e),
        }
    }

    sort_plan(&mut plan);
    plan
}

/// Offset and boundary nudges only; transfers work on top of this
fn offset_and_nudged_plan(junction: &Junction, ctx: PlanContext<'_>) -> Vec<ChangeRequest> {
    let cycle = ctx.effective_cycle(junction);
    let mut plan = sorted_plan(&junction.utc_plan);
    if cycle <= 0 {
        return plan;
    }

    let offset = ctx.temp.offset(&junction.id);
    if offset != 0 {
        for row in &mut plan {
            row.at = wrap_into_cycle(row.at + offset, cycle);
        }
        sort_plan(&mut plan);
    }

    if let Some(nudges) = ctx.temp.boundary_nudges(&junction.id) {
        for (&idx, &delta) in nudges {
            if let Some(row) = plan.get_mut(idx) {
                row.at = wrap_into_cycle(row.at + delta, cycle);
            }
        }
        sort_plan(&mut plan);
    }

    plan
}

/// Realise the adjusted plan, leaving the junction untouched
///
/// # Errors
///
/// Returns the realisation error of the adjusted plan.
pub fn compute_realised_cycle_adjusted(
    junction: &Junction,
    ctx: PlanContext<'_>,
) -> Result<RealisedCycle, RealisationError> {
    let mut adjusted = junction.clone();
    adjusted.utc_plan = adjusted_plan(junction, ctx);
    compute_realised_cycle(&adjusted, ctx.main_cycle)
}

impl Project {
    /// Realised cycle of a junction with its pending adjustments applied
    ///
    /// # Errors
    ///
    /// Returns the realisation error of the adjusted plan.
    pub fn realised_cycle(&self, junction: &Junction) -> Result<RealisedCycle, RealisationError> {
        compute_realised_cycle_adjusted(junction, self.context())
    }

    #[must_use]
    pub fn adjusted_plan(&self, junction: &Junction) -> Vec<ChangeRequest> {
        adjusted_plan(junction, self.context())
    }

    /// Set the global offset for a junction; zero removes it
    pub fn set_offset(&mut self, junction_id: &str, delta: i64) {
        if delta == 0 {
            self.temp.offsets.shift_remove(junction_id);
        } else {
            self.temp.offsets.insert(junction_id.to_string(), delta);
        }
    }

    /// Nudge one boundary (plan row index after the offset) by `delta`; zero removes it
    pub fn set_boundary_nudge(&mut self, junction_id: &str, boundary_idx: usize, delta: i64) {
        if delta == 0 {
            if let Some(nudges) = self.temp.boundary.get_mut(junction_id) {
                nudges.remove(&boundary_idx);
                if nudges.is_empty() {
                    self.temp.boundary.shift_remove(junction_id);
                }
            }
        } else {
            self.temp
                .boundary
                .entry(junction_id.to_string())
                .or_default()
                .insert(boundary_idx, delta);
        }
    }

    /// Queue a stage time transfer after checking it fits the current adjusted plan
    ///
    /// # Errors
    ///
    /// Returns an error if the junction does not exist or the transfer is rejected.
    pub fn add_transfer(&mut self, junction_id: &str, transfer: StageTransfer) -> Result<String, String> {
        let junction = self
            .junction(junction_id)
            .ok_or_else(|| format!("Junction {junction_id} not found"))?;
        let outcome = calculate_stage_time_transfer(
            junction,
            self.context(),
            None,
            &transfer.donor,
            &transfer.recipient,
            transfer.amount,
            transfer.fixed_point,
        )?;
        self.temp
            .transfers
            .entry(junction_id.to_string())
            .or_default()
            .push(transfer);
        log!("{}: transfer added (temporary)", junction_id);
        Ok(outcome.preview)
    }

    /// Remove one queued transfer by position
    pub fn remove_transfer(&mut self, junction_id: &str, index: usize) -> Option<StageTransfer> {
        let transfers = self.temp.transfers.get_mut(junction_id)?;
        if index >= transfers.len() {
            return None;
        }
        let removed = transfers.remove(index);
        if transfers.is_empty() {
            self.temp.transfers.shift_remove(junction_id);
        }
        Some(removed)
    }

    pub fn clear_adjustments(&mut self, junction_id: &str) {
        self.temp.clear_junction(junction_id);
    }

    /// Write every junction's adjusted plan back into its UTC plan and drop the adjustments
    pub fn commit_adjustments(&mut self) {
        let ctx = self.context();
        let committed: Vec<Vec<ChangeRequest>> =
            self.junctions.iter().map(|j| adjusted_plan(j, ctx)).collect();
        for (junction, plan) in self.junctions.iter_mut().zip(committed) {
            junction.utc_plan = plan;
        }
        self.temp = crate::models::TempAdjustments::default();
        log!("UTC plans updated from adjustments");
    }
}
