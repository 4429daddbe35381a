//! Per-day late arrival and early exit evaluation.
//!
//! These rules look at a single day in isolation. Monthly escalation of
//! repeated minor lateness lives in [`super::monthly_penalty`].

use chrono::NaiveTime;

use crate::models::Shift;

/// Outcome of comparing the first punch to the shift start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LateVerdict {
    /// Arrived at or before shift start.
    OnTime,
    /// Late, but an approved late-coming regularization waives it.
    Waived {
        /// Minutes late.
        minutes: i64,
    },
    /// Arrived after the shift's half time.
    Major {
        /// Minutes late.
        minutes: i64,
    },
    /// Late while on probation; no grace applies.
    Probation {
        /// Minutes late.
        minutes: i64,
    },
    /// Late by more than the shift grace.
    BeyondGrace {
        /// Minutes late.
        minutes: i64,
    },
    /// Late within grace; counts toward the monthly allowance.
    Minor {
        /// Minutes late.
        minutes: i64,
    },
}

impl LateVerdict {
    /// Returns true if the verdict turns the day into a half day on its own.
    pub fn is_half_day(self) -> bool {
        matches!(
            self,
            LateVerdict::Major { .. }
                | LateVerdict::Probation { .. }
                | LateVerdict::BeyondGrace { .. }
        )
    }

    /// Remark attached to the day, if any.
    pub fn remark(self) -> Option<String> {
        match self {
            LateVerdict::OnTime | LateVerdict::Minor { .. } => None,
            LateVerdict::Waived { minutes } => Some(format!("Late Waived ({minutes}m)")),
            LateVerdict::Major { .. } => Some("Major Late (> Half Time)".to_string()),
            LateVerdict::Probation { .. } => Some("Probation Late (No Grace)".to_string()),
            LateVerdict::BeyondGrace { .. } => Some("Late Beyond Grace".to_string()),
        }
    }
}

/// Outcome of comparing the last punch to the shift end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EarlyVerdict {
    /// Left at or after shift end.
    OnTime,
    /// Left before the early-go floor but the exit is waived.
    MajorWaived {
        /// Minutes early.
        minutes: i64,
    },
    /// Left before the early-go floor.
    Major {
        /// Minutes early.
        minutes: i64,
        /// The floor that was breached.
        floor: NaiveTime,
    },
    /// Minor early exit waived by an approved early-go regularization.
    MinorWaived {
        /// Minutes early.
        minutes: i64,
    },
    /// Minor early exit.
    Minor {
        /// Minutes early.
        minutes: i64,
        /// True when the exit counts toward the monthly allowance.
        counted: bool,
    },
}

/// Minutes the first punch falls after shift start, zero when on time.
pub fn late_minutes(in_time: NaiveTime, shift: &Shift) -> i64 {
    if in_time > shift.start_time {
        (in_time - shift.start_time).num_minutes()
    } else {
        0
    }
}

/// Evaluates lateness for the first punch.
///
/// Rules apply in order: a waiver zeroes the lateness; arriving after half
/// time is major; any lateness on probation is a half day; lateness beyond
/// the grace is a half day; anything else is minor.
///
/// # Example
///
/// ```
/// use attendance_engine::models::Shift;
/// use attendance_engine::processing::{LateVerdict, evaluate_late};
/// use chrono::NaiveTime;
///
/// let shift: Shift = serde_yaml::from_str(
///     "id: GEN\nstart_time: \"09:00:00\"\nend_time: \"18:00:00\"\nlate_grace_minutes: 30\n",
/// ).unwrap();
/// let in_time = NaiveTime::from_hms_opt(9, 10, 0).unwrap();
///
/// assert_eq!(evaluate_late(in_time, &shift, false, false), LateVerdict::Minor { minutes: 10 });
/// assert_eq!(evaluate_late(in_time, &shift, true, false), LateVerdict::Probation { minutes: 10 });
/// ```
pub fn evaluate_late(
    in_time: NaiveTime,
    shift: &Shift,
    on_probation: bool,
    waived: bool,
) -> LateVerdict {
    let minutes = late_minutes(in_time, shift);
    if minutes == 0 {
        return LateVerdict::OnTime;
    }

    if waived {
        return LateVerdict::Waived { minutes };
    }
    if shift.half_time.is_some_and(|half| in_time > half) {
        return LateVerdict::Major { minutes };
    }
    if on_probation {
        return LateVerdict::Probation { minutes };
    }
    if minutes > shift.late_grace_minutes {
        return LateVerdict::BeyondGrace { minutes };
    }
    LateVerdict::Minor { minutes }
}

/// Evaluates an early exit for the last punch.
///
/// Leaving before the early-go floor is major (a half day unless waived).
/// Otherwise the exit is minor; it counts toward the monthly allowance when it
/// exceeds the early grace or the employee is on probation.
pub fn evaluate_early(
    out_time: NaiveTime,
    shift: &Shift,
    on_probation: bool,
    waived: bool,
) -> EarlyVerdict {
    if out_time >= shift.end_time {
        return EarlyVerdict::OnTime;
    }
    let minutes = (shift.end_time - out_time).num_minutes();

    if let Some(floor) = shift.early_go_floor.filter(|floor| out_time < *floor) {
        return if waived {
            EarlyVerdict::MajorWaived { minutes }
        } else {
            EarlyVerdict::Major { minutes, floor }
        };
    }

    if waived {
        return EarlyVerdict::MinorWaived { minutes };
    }
    EarlyVerdict::Minor {
        minutes,
        counted: minutes > shift.early_leave_grace_minutes || on_probation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn shift() -> Shift {
        serde_yaml::from_str(
            r#"
id: GEN
start_time: "09:00:00"
end_time: "18:00:00"
half_time: "13:30:00"
late_grace_minutes: 30
early_leave_grace_minutes: 10
early_go_floor: "16:00:00"
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_on_time_arrival() {
        assert_eq!(evaluate_late(time(9, 0), &shift(), true, false), LateVerdict::OnTime);
        assert_eq!(evaluate_late(time(8, 45), &shift(), false, false), LateVerdict::OnTime);
    }

    #[test]
    fn test_waiver_beats_every_other_rule() {
        assert_eq!(
            evaluate_late(time(14, 0), &shift(), true, true),
            LateVerdict::Waived { minutes: 300 }
        );
    }

    #[test]
    fn test_major_late_after_half_time() {
        let verdict = evaluate_late(time(13, 31), &shift(), false, false);
        assert!(matches!(verdict, LateVerdict::Major { .. }));
        assert!(verdict.is_half_day());
        assert_eq!(verdict.remark().unwrap(), "Major Late (> Half Time)");
    }

    #[test]
    fn test_beyond_grace() {
        assert_eq!(
            evaluate_late(time(9, 31), &shift(), false, false),
            LateVerdict::BeyondGrace { minutes: 31 }
        );
        assert_eq!(
            evaluate_late(time(9, 30), &shift(), false, false),
            LateVerdict::Minor { minutes: 30 }
        );
    }

    #[test]
    fn test_minor_late_has_no_remark() {
        let verdict = evaluate_late(time(9, 10), &shift(), false, false);
        assert!(!verdict.is_half_day());
        assert!(verdict.remark().is_none());
    }

    #[test]
    fn test_early_on_time() {
        assert_eq!(evaluate_early(time(18, 0), &shift(), false, false), EarlyVerdict::OnTime);
    }

    #[test]
    fn test_major_early_exit() {
        assert_eq!(
            evaluate_early(time(15, 30), &shift(), false, false),
            EarlyVerdict::Major {
                minutes: 150,
                floor: time(16, 0)
            }
        );
        assert_eq!(
            evaluate_early(time(15, 30), &shift(), false, true),
            EarlyVerdict::MajorWaived { minutes: 150 }
        );
    }

    #[test]
    fn test_minor_early_within_grace_is_not_counted() {
        assert_eq!(
            evaluate_early(time(17, 55), &shift(), false, false),
            EarlyVerdict::Minor {
                minutes: 5,
                counted: false
            }
        );
        assert_eq!(
            evaluate_early(time(17, 55), &shift(), true, false),
            EarlyVerdict::Minor {
                minutes: 5,
                counted: true
            }
        );
        assert_eq!(
            evaluate_early(time(17, 30), &shift(), false, false),
            EarlyVerdict::Minor {
                minutes: 30,
                counted: true
            }
        );
    }

    #[test]
    fn test_minor_early_waived() {
        assert_eq!(
            evaluate_early(time(17, 30), &shift(), false, true),
            EarlyVerdict::MinorWaived { minutes: 30 }
        );
    }
}
