//! Attendance processing rules.
//!
//! One module per rule family: day classification, punch normalisation,
//! late/early evaluation, monthly penalty escalation, sandwich leave, comp-off
//! credits, ticket sequencing, the daily processor that combines them, the
//! batch driver, leave booking and yearly allocation maintenance.

mod allocations;
mod batch;
mod comp_off;
mod daily_processor;
mod day_detection;
mod late_early;
mod leave_booking;
mod monthly_penalty;
mod punches;
mod sandwich;
mod sequence;

pub use allocations::{carry_forward, initialize_allocations, prorata_quota};
pub use batch::{BatchReport, DayFailure, process_day, process_range};
pub use comp_off::{
    approve_comp_off, close_with_out_punch, credit_for_minutes, open_draft, reject_comp_off,
    usable_comp_off_balance,
};
pub use daily_processor::{apply_manual_override, process_employee_day};
pub use day_detection::{DayKind, classify_day, working_days};
pub use late_early::{EarlyVerdict, LateVerdict, evaluate_early, evaluate_late, late_minutes};
pub use leave_booking::{LeaveBooking, LeaveRequest, apply_leave, cancel_leave};
pub use monthly_penalty::{
    apply_monthly_penalties, month_history, prior_early_count, prior_late_count,
};
pub use punches::{
    BreakDeduction, BreakSource, PunchPattern, deduct_break, evaluate_punches, sort_punches,
};
pub use sandwich::find_sandwiching_leave;
pub use sequence::{
    catch_up_sequence, generate_ticket, max_live_number, peek_ticket, resync_sequence,
};
