use crate::adjust::adjusted_plan;
use crate::models::{sort_plan, ChangeRequest, FixedPoint, Junction, PlanContext};
use crate::time::wrap_into_cycle;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferOutcome {
    pub new_plan: Vec<ChangeRequest>,
    /// Stages between donor and recipient whose position in the timeline moves
    pub affected: Vec<String>,
    pub preview: String,
}

/// Move `seconds` of green from `donor` to `recipient`, keeping one edge of the donor fixed.
///
/// Works on `plan` when given, otherwise on the junction's adjusted plan.
/// Durations are measured between consecutive requests, wrapped across the
/// cycle boundary.
///
/// # Errors
///
/// Returns an error if either stage is missing from the plan, both are the
/// same, `seconds` is not positive, or the donor would fall below its
/// minimum green.
pub fn calculate_stage_time_transfer(
    junction: &Junction,
    ctx: PlanContext<'_>,
    plan: Option<&[ChangeRequest]>,
    donor: &str,
    recipient: &str,
    seconds: i64,
    fixed_point: FixedPoint,
) -> Result<TransferOutcome, String> {
    let cycle = ctx.effective_cycle(junction);
    let plan: Vec<ChangeRequest> = match plan {
        Some(p) => p.to_vec(),
        None => adjusted_plan(junction, ctx),
    };
    let n = plan.len();
    if n == 0 {
        return Err("UTC plan is empty".to_string());
    }
    if cycle <= 0 {
        return Err(format!("Invalid cycle length {cycle}s"));
    }

    let donor_idx = plan
        .iter()
        .position(|p| p.to == donor)
        .ok_or_else(|| format!("Donor stage \"{donor}\" not found in UTC plan"))?;
    let recipient_idx = plan
        .iter()
        .position(|p| p.to == recipient)
        .ok_or_else(|| format!("Recipient stage \"{recipient}\" not found in UTC plan"))?;
    if donor_idx == recipient_idx {
        return Err("Donor and recipient must be different stages".to_string());
    }
    if seconds <= 0 {
        return Err("Transfer time must be positive".to_string());
    }

    let duration = |idx: usize| {
        let start = plan[idx].at;
        let end = plan[(idx + 1) % n].at;
        if end > start {
            end - start
        } else {
            end + cycle - start
        }
    };
    let donor_duration = duration(donor_idx);
    let donor_min_green = junction
        .stage_index(donor)
        .map(|idx| junction.min_green(idx))
        .ok_or_else(|| format!("Donor stage \"{donor}\" not defined for {}", junction.name))?;
    let max_transfer = donor_duration - donor_min_green;
    if seconds > max_transfer {
        return Err(format!(
            "Cannot transfer {seconds}s: donor stage has {donor_duration}s, needs minimum {donor_min_green}s (max transfer: {max_transfer}s)"
        ));
    }

    // plan indices strictly between donor and recipient, walking forward around the cycle
    let between: Vec<usize> = (1..n)
        .map(|k| (donor_idx + k) % n)
        .take_while(|&i| i != recipient_idx)
        .collect();
    let affected: Vec<String> = between.iter().map(|&i| plan[i].to.clone()).collect();

    let mut new_plan = plan.clone();
    let mut shift = |idx: usize, delta: i64| {
        new_plan[idx].at = wrap_into_cycle(new_plan[idx].at + delta, cycle);
    };

    match fixed_point {
        FixedPoint::Eog => {
            shift(donor_idx, seconds);
            // in a two-stage plan the boundary after the recipient is the donor itself
            let after_recipient = (recipient_idx + 1) % n;
            if after_recipient != donor_idx {
                shift(after_recipient, seconds);
            }
        }
        FixedPoint::Sog => {
            for &idx in between.iter().chain(std::iter::once(&recipient_idx)) {
                shift(idx, -seconds);
            }
        }
    }

    sort_plan(&mut new_plan);

    let affected_text = if affected.is_empty() {
        " No intermediate stages affected.".to_string()
    } else {
        format!(" Intermediate stages shifted: {}.", affected.join(", "))
    };
    let preview = format!(
        "Transfer {seconds}s from {donor} to {recipient} (fixed: {fixed_point}).{affected_text}"
    );

    Ok(TransferOutcome {
        new_plan,
        affected,
        preview,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{InitConfig, TempAdjustments};

    fn four_stage() -> Junction {
        let mut j = Junction::from_config("A", &InitConfig::default());
        j.resize_stages(4, &InitConfig::default());
        j.utc_plan = vec![
            ChangeRequest::new("S1", 0),
            ChangeRequest::new("S2", 20),
            ChangeRequest::new("S3", 40),
            ChangeRequest::new("S4", 60),
        ];
        j
    }

    fn at_of(plan: &[ChangeRequest], label: &str) -> i64 {
        plan.iter().find(|p| p.to == label).map(|p| p.at).expect("label present")
    }

    fn run(j: &Junction, donor: &str, recipient: &str, secs: i64, fp: FixedPoint) -> Result<TransferOutcome, String> {
        let temp = TempAdjustments::default();
        calculate_stage_time_transfer(j, PlanContext::new(80, &temp), None, donor, recipient, secs, fp)
    }

    #[test]
    fn test_eog_forward_keeps_donor_end() {
        let j = four_stage();
        let out = run(&j, "S1", "S3", 5, FixedPoint::Eog).expect("transfer fits");
        // donor end is S2's start
        assert_eq!(at_of(&out.new_plan, "S2"), 20);
        assert_eq!(at_of(&out.new_plan, "S1"), 5);
        assert_eq!(at_of(&out.new_plan, "S4"), 65);
        assert_eq!(out.affected, vec!["S2".to_string()]);
    }

    #[test]
    fn test_sog_forward_keeps_donor_start() {
        let j = four_stage();
        let out = run(&j, "S1", "S3", 5, FixedPoint::Sog).expect("transfer fits");
        assert_eq!(at_of(&out.new_plan, "S1"), 0);
        assert_eq!(at_of(&out.new_plan, "S2"), 15);
        assert_eq!(at_of(&out.new_plan, "S3"), 35);
        assert_eq!(at_of(&out.new_plan, "S4"), 60);
        assert_eq!(out.affected, vec!["S2".to_string()]);
        assert!(out.preview.contains("(fixed: SOG)"));
        assert!(out.preview.contains("Intermediate stages shifted: S2."));
    }

    #[test]
    fn test_sog_backward_wraps() {
        let j = four_stage();
        let out = run(&j, "S3", "S1", 4, FixedPoint::Sog).expect("transfer fits");
        assert_eq!(at_of(&out.new_plan, "S3"), 40);
        assert_eq!(at_of(&out.new_plan, "S4"), 56);
        assert_eq!(at_of(&out.new_plan, "S1"), 76);
        assert_eq!(at_of(&out.new_plan, "S2"), 20);
        assert_eq!(out.affected, vec!["S4".to_string()]);
        assert!(out.new_plan.windows(2).all(|w| w[0].at <= w[1].at));
    }

    #[test]
    fn test_eog_backward_lists_wrapped_stages() {
        let j = four_stage();
        let out = run(&j, "S3", "S1", 4, FixedPoint::Eog).expect("transfer fits");
        assert_eq!(at_of(&out.new_plan, "S3"), 44);
        assert_eq!(at_of(&out.new_plan, "S4"), 60);
        assert_eq!(at_of(&out.new_plan, "S2"), 24);
        assert_eq!(out.affected, vec!["S4".to_string()]);
    }

    #[test]
    fn test_two_stage_does_not_double_shift() {
        let mut j = four_stage();
        j.resize_stages(2, &InitConfig::default());
        j.utc_plan = vec![ChangeRequest::new("S1", 0), ChangeRequest::new("S2", 40)];
        let out = run(&j, "S2", "S1", 10, FixedPoint::Eog).expect("transfer fits");
        assert_eq!(at_of(&out.new_plan, "S2"), 50);
        assert_eq!(at_of(&out.new_plan, "S1"), 0);

        let out = run(&j, "S1", "S2", 10, FixedPoint::Eog).expect("transfer fits");
        assert_eq!(at_of(&out.new_plan, "S1"), 10);
        assert_eq!(at_of(&out.new_plan, "S2"), 40);
    }

    fn durations(plan: &[ChangeRequest], cycle: i64) -> Vec<(String, i64)> {
        let mut out: Vec<(String, i64)> = plan
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let next = plan[(i + 1) % plan.len()].at;
                (p.to.clone(), (next - p.at).rem_euclid(cycle))
            })
            .collect();
        out.sort();
        out
    }

    #[test]
    fn test_transfer_conserves_cycle_and_moves_exact_amount() {
        let j = four_stage();
        for (donor, recipient) in [("S1", "S3"), ("S3", "S1"), ("S2", "S4"), ("S4", "S2")] {
            for fp in [FixedPoint::Eog, FixedPoint::Sog] {
                let out = run(&j, donor, recipient, 6, fp).expect("transfer fits");
                let d = durations(&out.new_plan, 80);
                assert_eq!(d.iter().map(|(_, v)| v).sum::<i64>(), 80);
                assert_eq!(out.new_plan.len(), 4);
                let get = |l: &str| d.iter().find(|(k, _)| k == l).map(|(_, v)| *v).expect("stage kept");
                assert_eq!(get(donor), 14, "{donor} -> {recipient} {fp}");
                assert_eq!(get(recipient), 26, "{donor} -> {recipient} {fp}");
            }
        }
    }

    #[test]
    fn test_eog_five_stage_moves_two_separate_boundaries() {
        let mut j = four_stage();
        j.resize_stages(5, &InitConfig::default());
        j.utc_plan = ["S1", "S2", "S3", "S4", "S5"]
            .iter()
            .zip([0, 16, 32, 48, 64])
            .map(|(&label, at)| ChangeRequest::new(label, at))
            .collect();
        let out = run(&j, "S1", "S3", 5, FixedPoint::Eog).expect("transfer fits");

        // donor ends where S2 starts, which stays put
        assert_eq!(at_of(&out.new_plan, "S2"), 16);
        assert_eq!(at_of(&out.new_plan, "S1"), 5);
        assert_eq!(at_of(&out.new_plan, "S4"), 53);
        assert_eq!(out.affected, vec!["S2".to_string()]);

        // S5 absorbs the donor's late start, S4 pays for the recipient's late end
        let d = durations(&out.new_plan, 80);
        let expected: Vec<(String, i64)> = [("S1", 11), ("S2", 16), ("S3", 21), ("S4", 11), ("S5", 21)]
            .iter()
            .map(|&(l, v)| (l.to_string(), v))
            .collect();
        assert_eq!(d, expected);
    }

    #[test]
    fn test_validation_order() {
        let j = four_stage();
        assert!(run(&j, "S9", "S1", 5, FixedPoint::Eog).expect_err("missing donor").contains("Donor stage \"S9\""));
        assert!(run(&j, "S1", "S9", 5, FixedPoint::Eog).expect_err("missing recipient").contains("Recipient stage"));
        assert!(run(&j, "S1", "S1", 5, FixedPoint::Eog).expect_err("same stage").contains("must be different"));
        assert!(run(&j, "S1", "S2", 0, FixedPoint::Eog).expect_err("zero seconds").contains("must be positive"));
        let err = run(&j, "S1", "S2", 14, FixedPoint::Eog).expect_err("exceeds headroom");
        assert_eq!(err, "Cannot transfer 14s: donor stage has 20s, needs minimum 7s (max transfer: 13s)");
    }

    #[test]
    fn test_explicit_plan_overrides_adjusted() {
        let j = four_stage();
        let temp = TempAdjustments::default();
        let plan = vec![ChangeRequest::new("S1", 0), ChangeRequest::new("S2", 50)];
        let out = calculate_stage_time_transfer(
            &j,
            PlanContext::new(80, &temp),
            Some(&plan),
            "S1",
            "S2",
            10,
            FixedPoint::Sog,
        )
        .expect("transfer fits");
        assert_eq!(at_of(&out.new_plan, "S2"), 40);
        assert!(out.preview.contains("No intermediate stages affected."));
    }
}
