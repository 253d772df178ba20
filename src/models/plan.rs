use serde::{Deserialize, Serialize};

/// One row of a UTC plan: change to stage `to` at second `at` of the cycle
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChangeRequest {
    pub to: String,
    pub at: i64,
}

impl ChangeRequest {
    #[must_use]
    pub fn new(to: impl Into<String>, at: i64) -> Self {
        Self { to: to.into(), at }
    }
}

/// Sort plan rows by requested time (stable, so equal times keep their order)
pub fn sort_plan(plan: &mut [ChangeRequest]) {
    plan.sort_by_key(|row| row.at);
}

/// Clone a plan and return it sorted by requested time
#[must_use]
pub fn sorted_plan(plan: &[ChangeRequest]) -> Vec<ChangeRequest> {
    let mut sorted = plan.to_vec();
    sort_plan(&mut sorted);
    sorted
}

/// Check whether `b` is a cyclic rotation of `a`
#[must_use]
pub fn is_rotation<T: PartialEq>(a: &[T], b: &[T]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    if a.is_empty() {
        return true;
    }
    let n = a.len();
    (0..n).any(|shift| (0..n).all(|i| a[(i + shift) % n] == b[i]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorted_plan_does_not_touch_input() {
        let plan = vec![ChangeRequest::new("S2", 30), ChangeRequest::new("S1", 0)];
        let sorted = sorted_plan(&plan);
        assert_eq!(sorted[0].to, "S1");
        assert_eq!(plan[0].to, "S2");
    }

    #[test]
    fn test_is_rotation() {
        assert!(is_rotation(&["A", "B", "C"], &["B", "C", "A"]));
        assert!(is_rotation(&["A", "B", "C"], &["A", "B", "C"]));
        assert!(!is_rotation(&["A", "B", "C"], &["A", "C", "B"]));
        assert!(!is_rotation(&["A", "B"], &["A", "B", "A"]));
    }

    #[test]
    fn test_is_rotation_repeated_labels() {
        assert!(is_rotation(&["A", "B", "A", "C"], &["A", "C", "A", "B"]));
        assert!(!is_rotation(&["A", "B", "A", "C"], &["A", "A", "B", "C"]));
    }
}
