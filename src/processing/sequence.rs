//! Month-scoped audit ticket numbers.
//!
//! Tickets read `<MON> <N>`. The next number is always derived from a live
//! scan of issued tickets for the month, so deleting the highest-numbered
//! request frees its number for the next issuance. The stored
//! [`ApplicationSequence`](crate::models::ApplicationSequence) is an advisory
//! cache only.

use chrono::{Datelike, NaiveDate};
use tracing::{debug, warn};

use crate::models::Ticket;
use crate::store::AttendanceStore;

/// Highest ticket number live in the month; zero when none are issued.
///
/// Every well-formed ticket on the month's requests counts, whatever month
/// prefix it carries.
pub fn max_live_number(store: &AttendanceStore, year: i32, month: u32) -> u32 {
    store
        .tickets_in_month(year, month)
        .into_iter()
        .filter_map(|raw| raw.parse::<Ticket>().ok())
        .map(|ticket| ticket.number)
        .max()
        .unwrap_or(0)
}

/// The ticket the next issuance in `date`'s month would receive. Nothing is written.
pub fn peek_ticket(store: &AttendanceStore, date: NaiveDate) -> Ticket {
    Ticket {
        month: date.month(),
        number: max_live_number(store, date.year(), date.month()) + 1,
    }
}

/// Issues the next ticket for `date`'s month and updates the cache.
///
/// The caller is expected to attach the ticket to a persisted request straight
/// away; until then a second call returns the same number.
///
/// # Example
///
/// ```
/// use attendance_engine::processing::generate_ticket;
/// use attendance_engine::store::AttendanceStore;
/// use chrono::NaiveDate;
///
/// let mut store = AttendanceStore::default();
/// let ticket = generate_ticket(&mut store, NaiveDate::from_ymd_opt(2026, 2, 10).unwrap());
/// assert_eq!(ticket.to_string(), "FEB 1");
/// ```
pub fn generate_ticket(store: &mut AttendanceStore, date: NaiveDate) -> Ticket {
    let ticket = peek_ticket(store, date);
    store.set_sequence(date.year(), date.month(), ticket.number);
    debug!(%ticket, "Generated application ticket");
    ticket
}

/// Resets the cache for a month to the live maximum. Returns that maximum.
pub fn resync_sequence(store: &mut AttendanceStore, year: i32, month: u32) -> u32 {
    let live = max_live_number(store, year, month);
    store.set_sequence(year, month, live);
    live
}

/// Fast-forwards the cache past an externally supplied ticket.
///
/// Malformed tickets are logged and ignored. The cache never moves backwards.
pub fn catch_up_sequence(store: &mut AttendanceStore, date: NaiveDate, ticket: &str) {
    let parsed = match ticket.parse::<Ticket>() {
        Ok(parsed) => parsed,
        Err(err) => {
            warn!(ticket, error = %err, "Ignoring malformed ticket");
            return;
        }
    };

    let (year, month) = (date.year(), date.month());
    let current = store.sequence(year, month).map_or(0, |s| s.current_value);
    if parsed.number > current {
        store.set_sequence(year, month, parsed.number);
    }
}
