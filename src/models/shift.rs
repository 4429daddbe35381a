//! Shift policy model.
//!
//! A shift carries both the working window and the lateness/early-exit policy
//! the daily processor enforces. Optional thresholds fall back to the policy
//! defaults below when omitted from configuration.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

const MINUTES_PER_DAY: i64 = 24 * 60;

fn default_late_grace_minutes() -> i64 {
    30
}

fn default_max_late_per_month() -> u32 {
    3
}

fn default_half_day_on_late_exceed() -> bool {
    true
}

fn default_max_early_per_month() -> u32 {
    1
}

/// Minutes elapsed from `from` to `to`, wrapping past midnight when `to` is earlier.
///
/// # Examples
///
/// ```
/// use attendance_engine::models::elapsed_minutes;
/// use chrono::NaiveTime;
///
/// let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
/// let six_pm = NaiveTime::from_hms_opt(18, 0, 0).unwrap();
/// assert_eq!(elapsed_minutes(nine, six_pm), 540);
/// assert_eq!(elapsed_minutes(six_pm, nine), 900); // overnight
/// ```
pub fn elapsed_minutes(from: NaiveTime, to: NaiveTime) -> i64 {
    let minutes = (to - from).num_minutes();
    if minutes < 0 {
        minutes + MINUTES_PER_DAY
    } else {
        minutes
    }
}

/// The scheduled lunch window of a shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LunchWindow {
    /// Lunch start.
    pub start: NaiveTime,
    /// Lunch end.
    pub end: NaiveTime,
}

/// Represents a shift and its attendance policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shift {
    /// Unique identifier for the shift.
    pub id: String,
    /// Human-readable shift name.
    #[serde(default)]
    pub name: String,
    /// Scheduled start of the working day.
    pub start_time: NaiveTime,
    /// Scheduled end of the working day.
    pub end_time: NaiveTime,
    /// Standard lunch window; its length is the standard break deduction.
    #[serde(default)]
    pub lunch: Option<LunchWindow>,
    /// Arriving after this time is a major late arrival (immediate half day).
    #[serde(default)]
    pub half_time: Option<NaiveTime>,
    /// Late minutes tolerated before the day is individually a half day.
    #[serde(default = "default_late_grace_minutes")]
    pub late_grace_minutes: i64,
    /// Late arrivals allowed per calendar month before escalation.
    #[serde(default = "default_max_late_per_month")]
    pub max_late_per_month: u32,
    /// Whether exceeding the monthly late allowance escalates to a half day.
    #[serde(default = "default_half_day_on_late_exceed")]
    pub half_day_on_late_exceed: bool,
    /// Early minutes tolerated before a minor early exit is counted.
    #[serde(default)]
    pub early_leave_grace_minutes: i64,
    /// Leaving before this time is a major early exit (immediate half day).
    #[serde(default)]
    pub early_go_floor: Option<NaiveTime>,
    /// Minor early exits allowed per calendar month before escalation.
    #[serde(default = "default_max_early_per_month")]
    pub max_early_per_month: u32,
}

impl Shift {
    /// Returns the standard lunch deduction in minutes (zero without a lunch window).
    pub fn standard_lunch_minutes(&self) -> i64 {
        self.lunch
            .map(|l| elapsed_minutes(l.start, l.end))
            .unwrap_or(0)
    }

    /// Returns the scheduled span from start to end, overnight-aware.
    pub fn span_minutes(&self) -> i64 {
        elapsed_minutes(self.start_time, self.end_time)
    }

    /// Returns the net working duration: span minus the standard lunch.
    ///
    /// # Examples
    ///
    /// ```
    /// use attendance_engine::models::{LunchWindow, Shift};
    /// use chrono::NaiveTime;
    ///
    /// let t = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();
    /// let shift = Shift {
    ///     id: "GEN".to_string(),
    ///     name: "General".to_string(),
    ///     start_time: t(9, 0),
    ///     end_time: t(18, 0),
    ///     lunch: Some(LunchWindow { start: t(13, 0), end: t(14, 0) }),
    ///     half_time: None,
    ///     late_grace_minutes: 30,
    ///     max_late_per_month: 3,
    ///     half_day_on_late_exceed: true,
    ///     early_leave_grace_minutes: 0,
    ///     early_go_floor: None,
    ///     max_early_per_month: 1,
    /// };
    /// assert_eq!(shift.working_minutes(), 480);
    /// ```
    pub fn working_minutes(&self) -> i64 {
        (self.span_minutes() - self.standard_lunch_minutes()).max(0)
    }
}
