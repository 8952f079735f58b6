//! Business-rule guesses used to resolve ambiguous input.
//!
//! The values are kept as they have always been; [`Config`](crate::Config)
//! can override them.

/// An explicit `M월 D일` more than this many days in the past means next year's.
pub const PAST_ROLLOVER_DAYS: i64 = 30;

/// A bare `H시` below this hour (12 excepted) is read as afternoon.
pub const BARE_HOUR_PM_BEFORE: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Heuristics {
    pub past_rollover_days: i64,
    pub bare_hour_pm_before: u32,
}

impl Default for Heuristics {
    fn default() -> Self {
        Self {
            past_rollover_days: PAST_ROLLOVER_DAYS,
            bare_hour_pm_before: BARE_HOUR_PM_BEFORE,
        }
    }
}

impl Heuristics {
    /// Hour for a bare `H시` with no 오전/오후.
    pub fn bare_hour(&self, hour: u32) -> u32 {
        if hour < self.bare_hour_pm_before && hour != 12 {
            hour + 12
        } else {
            hour
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_hour_uses_pm_below_cutoff() {
        let h = Heuristics::default();
        assert_eq!(h.bare_hour(3), 15);
        assert_eq!(h.bare_hour(7), 19);
        assert_eq!(h.bare_hour(0), 12);
        assert_eq!(h.bare_hour(8), 8);
        assert_eq!(h.bare_hour(9), 9);
        assert_eq!(h.bare_hour(12), 12);
        assert_eq!(h.bare_hour(15), 15);
    }

    #[test]
    fn twelve_is_never_shifted_even_with_a_wide_cutoff() {
        let h = Heuristics {
            bare_hour_pm_before: 13,
            ..Default::default()
        };
        assert_eq!(h.bare_hour(12), 12);
        assert_eq!(h.bare_hour(11), 23);
    }
}
