//! Punch normalisation and break deduction.
//!
//! Device and regularized punches are merged into one ordered sequence. The
//! first and last punches of the day bound the worked span; the lunch break is
//! either the gap between the second and third punches or the shift's
//! standard lunch window.

use chrono::NaiveTime;

use crate::models::{PunchEvent, PunchOrigin, Shift, elapsed_minutes};

/// The shape of a day's punches once sorted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PunchPattern {
    /// No punches at all.
    Missing,
    /// One effective punch: a single event, or first and last at the same time.
    Single {
        /// Time of the lone punch.
        time: NaiveTime,
        /// True when the lone punch is a regularized out-punch.
        out_only: bool,
    },
    /// Distinct first and last punches.
    Span {
        /// First punch of the day.
        in_time: NaiveTime,
        /// Last punch of the day.
        out_time: NaiveTime,
        /// Minutes between them, overnight-aware.
        total_minutes: i64,
    },
}

/// Where the day's break deduction came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakSource {
    /// Gap between the second and third punches.
    Actual,
    /// The shift's standard lunch window.
    Standard,
    /// No shift, nothing deducted.
    Unassigned,
}

/// The break deducted from the worked span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakDeduction {
    /// Minutes deducted.
    pub minutes: i64,
    /// Where the figure came from.
    pub source: BreakSource,
}

/// Sorts punches by time; simultaneous punches order regularized-in, device, regularized-out.
///
/// # Example
///
/// ```
/// use attendance_engine::models::{PunchEvent, PunchOrigin};
/// use attendance_engine::processing::sort_punches;
/// use chrono::NaiveDate;
///
/// let at = NaiveDate::from_ymd_opt(2026, 3, 3).unwrap().and_hms_opt(9, 0, 0).unwrap();
/// let mut punches = vec![
///     PunchEvent { employee_id: "e".into(), timestamp: at, origin: PunchOrigin::RegularizedOut },
///     PunchEvent::device("e", at),
///     PunchEvent { employee_id: "e".into(), timestamp: at, origin: PunchOrigin::RegularizedIn },
/// ];
/// sort_punches(&mut punches);
///
/// assert_eq!(punches[0].origin, PunchOrigin::RegularizedIn);
/// assert_eq!(punches[2].origin, PunchOrigin::RegularizedOut);
/// ```
pub fn sort_punches(punches: &mut [PunchEvent]) {
    punches.sort_by_key(|p| (p.timestamp, p.origin.tie_rank()));
}

/// Classifies sorted punches.
pub fn evaluate_punches(sorted: &[PunchEvent]) -> PunchPattern {
    let (Some(first), Some(last)) = (sorted.first(), sorted.last()) else {
        return PunchPattern::Missing;
    };

    let in_time = first.timestamp.time();
    let out_time = last.timestamp.time();

    if sorted.len() == 1 || in_time == out_time {
        return PunchPattern::Single {
            time: in_time,
            out_only: sorted.len() == 1 && first.origin == PunchOrigin::RegularizedOut,
        };
    }

    PunchPattern::Span {
        in_time,
        out_time,
        total_minutes: elapsed_minutes(in_time, out_time),
    }
}

/// Works out the break to deduct for a day with a punch span.
///
/// With a shift and at least four punches the gap between the second and
/// third punches is the actual break. Otherwise the shift's standard lunch is
/// used. Without a shift nothing is deducted.
pub fn deduct_break(sorted: &[PunchEvent], shift: Option<&Shift>) -> BreakDeduction {
    let Some(shift) = shift else {
        return BreakDeduction {
            minutes: 0,
            source: BreakSource::Unassigned,
        };
    };

    if sorted.len() >= 4 {
        let gap = sorted[2].timestamp - sorted[1].timestamp;
        return BreakDeduction {
            minutes: gap.num_minutes().max(0),
            source: BreakSource::Actual,
        };
    }

    BreakDeduction {
        minutes: shift.standard_lunch_minutes(),
        source: BreakSource::Standard,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LunchWindow;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 3)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn punch(h: u32, m: u32) -> PunchEvent {
        PunchEvent::device("emp_001", at(h, m))
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn general_shift() -> Shift {
        serde_yaml::from_str(
            "id: GEN\nstart_time: \"09:00:00\"\nend_time: \"18:00:00\"\nlunch:\n  start: \"13:00:00\"\n  end: \"14:00:00\"\n",
        )
        .unwrap()
    }

    #[test]
    fn test_sort_by_time_then_origin() {
        let mut punches = vec![
            punch(18, 0),
            PunchEvent {
                employee_id: "emp_001".to_string(),
                timestamp: at(9, 0),
                origin: PunchOrigin::RegularizedOut,
            },
            punch(9, 0),
        ];
        sort_punches(&mut punches);

        assert_eq!(punches[0].origin, PunchOrigin::Device);
        assert_eq!(punches[1].origin, PunchOrigin::RegularizedOut);
        assert_eq!(punches[2].timestamp, at(18, 0));
    }

    #[test]
    fn test_evaluate_missing() {
        assert_eq!(evaluate_punches(&[]), PunchPattern::Missing);
    }

    #[test]
    fn test_evaluate_single_punch() {
        assert_eq!(
            evaluate_punches(&[punch(9, 5)]),
            PunchPattern::Single {
                time: time(9, 5),
                out_only: false
            }
        );
    }

    #[test]
    fn test_evaluate_duplicate_punches_is_single() {
        assert!(matches!(
            evaluate_punches(&[punch(9, 5), punch(9, 5)]),
            PunchPattern::Single { out_only: false, .. }
        ));
    }

    #[test]
    fn test_evaluate_regularized_out_only() {
        let out = PunchEvent {
            employee_id: "emp_001".to_string(),
            timestamp: at(18, 0),
            origin: PunchOrigin::RegularizedOut,
        };
        assert!(matches!(
            evaluate_punches(&[out]),
            PunchPattern::Single { out_only: true, .. }
        ));
    }

    #[test]
    fn test_evaluate_span() {
        assert_eq!(
            evaluate_punches(&[punch(9, 10), punch(18, 0)]),
            PunchPattern::Span {
                in_time: time(9, 10),
                out_time: time(18, 0),
                total_minutes: 530
            }
        );
    }

    #[test]
    fn test_actual_break_from_four_punches() {
        let shift = general_shift();
        let punches = [punch(9, 0), punch(13, 0), punch(13, 40), punch(18, 0)];

        let deduction = deduct_break(&punches, Some(&shift));
        assert_eq!(deduction.minutes, 40);
        assert_eq!(deduction.source, BreakSource::Actual);
    }

    #[test]
    fn test_standard_lunch_for_two_punches() {
        let shift = general_shift();
        let deduction = deduct_break(&[punch(9, 0), punch(18, 0)], Some(&shift));
        assert_eq!(deduction.minutes, 60);
        assert_eq!(deduction.source, BreakSource::Standard);
    }

    #[test]
    fn test_no_shift_deducts_nothing() {
        let punches = [punch(9, 0), punch(13, 0), punch(14, 0), punch(18, 0)];
        let deduction = deduct_break(&punches, None);
        assert_eq!(deduction.minutes, 0);
        assert_eq!(deduction.source, BreakSource::Unassigned);
    }

    #[test]
    fn test_shift_without_lunch_window() {
        let mut shift = general_shift();
        shift.lunch = None::<LunchWindow>;
        assert_eq!(deduct_break(&[punch(9, 0), punch(18, 0)], Some(&shift)).minutes, 0);
    }
}
