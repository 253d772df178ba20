/// Wrap a second value into `[0, cycle)`.
///
/// `cycle` must be positive; callers check cycle lengths before wrapping.
#[must_use]
pub fn wrap_into_cycle(t: i64, cycle: i64) -> i64 {
    t.rem_euclid(cycle)
}

/// Converts between absolute, relative and cycle-wrapped second values.
///
/// Operates exclusively on whole seconds. The reference offset is the main
/// cycle length the converter was built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeConverter {
    main_cycle: i64,
}

impl TimeConverter {
    #[must_use]
    pub const fn new(main_cycle: i64) -> Self {
        Self { main_cycle }
    }

    /// Build a converter from a possibly fractional reference value
    ///
    /// # Errors
    ///
    /// Returns an error if the value is NaN or infinite.
    pub fn from_seconds(main_cycle: f64) -> Result<Self, String> {
        Ok(Self::new(round_seconds(main_cycle)?))
    }

    #[must_use]
    pub const fn main_cycle(&self) -> i64 {
        self.main_cycle
    }

    /// Absolute to relative: `t - main_cycle`
    #[must_use]
    pub const fn to_relative(&self, t: i64) -> i64 {
        t - self.main_cycle
    }

    /// Relative to absolute: `t + main_cycle`
    #[must_use]
    pub const fn to_absolute(&self, t: i64) -> i64 {
        t + self.main_cycle
    }

    /// Wrap `t - main_cycle` into `[0, cycle_length)`
    ///
    /// # Errors
    ///
    /// Returns an error if `cycle_length` is not positive.
    pub fn wrap_cycle(&self, t: i64, cycle_length: i64) -> Result<i64, String> {
        if cycle_length <= 0 {
            return Err(format!("wrap_cycle: cycle length must be positive, got {cycle_length}"));
        }
        Ok(wrap_into_cycle(t - self.main_cycle, cycle_length))
    }
}

/// Round a fractional second value to whole seconds
///
/// # Errors
///
/// Returns an error if the value is NaN or infinite.
pub fn round_seconds(value: f64) -> Result<i64, String> {
    if !value.is_finite() {
        return Err(format!("Time value must be a finite number, got {value}"));
    }
    #[allow(clippy::cast_possible_truncation)]
    Ok(value.round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_relative_and_absolute() {
        let tc = TimeConverter::new(60);
        assert_eq!(tc.to_relative(125), 65);
        assert_eq!(tc.to_absolute(65), 125);
    }

    #[test]
    fn test_wrap_cycle() {
        let tc = TimeConverter::new(60);
        assert_eq!(tc.wrap_cycle(185, 90).expect("positive cycle"), 35);

        let zero = TimeConverter::new(0);
        assert_eq!(zero.wrap_cycle(185, 90).expect("positive cycle"), 5);
        assert_eq!(zero.wrap_cycle(-5, 90).expect("positive cycle"), 85);
    }

    #[test]
    fn test_wrap_cycle_rejects_non_positive_length() {
        let tc = TimeConverter::new(0);
        assert!(tc.wrap_cycle(10, 0).is_err());
        assert!(tc.wrap_cycle(10, -30).is_err());
    }

    #[test]
    fn test_from_seconds_rounds() {
        let tc = TimeConverter::from_seconds(59.6).expect("finite value");
        assert_eq!(tc.main_cycle(), 60);
    }

    #[test]
    fn test_from_seconds_rejects_nan() {
        assert!(TimeConverter::from_seconds(f64::NAN).is_err());
        assert!(round_seconds(f64::INFINITY).is_err());
    }

    #[test]
    fn test_wrap_into_cycle_negative() {
        assert_eq!(wrap_into_cycle(-1, 60), 59);
        assert_eq!(wrap_into_cycle(60, 60), 0);
        assert_eq!(wrap_into_cycle(125, 60), 5);
    }
}
