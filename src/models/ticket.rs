//! Month-scoped audit tickets ("FEB 12") and the advisory sequence counter.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

/// Returns the upper-case three-letter abbreviation for a month (1-12).
pub fn month_abbreviation(month: u32) -> &'static str {
    match month {
        1..=12 => MONTH_ABBREVIATIONS[(month - 1) as usize],
        _ => "???",
    }
}

/// A parsed application number.
///
/// # Example
///
/// ```
/// use attendance_engine::models::Ticket;
///
/// let ticket: Ticket = "feb 12".parse().unwrap();
/// assert_eq!(ticket.month, 2);
/// assert_eq!(ticket.number, 12);
/// assert_eq!(ticket.to_string(), "FEB 12");
/// assert!("FEB".parse::<Ticket>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticket {
    /// Month (1-12).
    pub month: u32,
    /// Number within the month.
    pub number: u32,
}

impl std::fmt::Display for Ticket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", month_abbreviation(self.month), self.number)
    }
}

impl FromStr for Ticket {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidTicket {
            value: s.to_string(),
        };

        let mut parts = s.split_whitespace();
        let (Some(month_part), Some(number_part), None) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };

        let month_upper = month_part.to_ascii_uppercase();
        let month = MONTH_ABBREVIATIONS
            .iter()
            .position(|m| *m == month_upper)
            .ok_or_else(invalid)? as u32
            + 1;
        let number = number_part.parse::<u32>().map_err(|_| invalid())?;

        Ok(Ticket { month, number })
    }
}

/// Advisory per-month counter. The authoritative next number is always derived
/// from a live scan of issued tickets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationSequence {
    /// Calendar year.
    pub year: i32,
    /// Calendar month (1-12).
    pub month: u32,
    /// Highest number known when the cache was last written.
    pub current_value: u32,
}
