//! Holiday model.
//!
//! A holiday overrides every other attendance source for the employees it
//! applies to.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Who a holiday applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scope", content = "employee_ids", rename_all = "snake_case")]
pub enum HolidayScope {
    /// Every employee.
    Global,
    /// Only the listed employees.
    Employees(BTreeSet<String>),
}

/// A holiday spanning one or more days.
///
/// # Example
///
/// ```
/// use attendance_engine::models::{Holiday, HolidayScope};
/// use chrono::NaiveDate;
///
/// let holiday = Holiday {
///     name: "Holi".to_string(),
///     start_date: NaiveDate::from_ymd_opt(2026, 3, 4).unwrap(),
///     end_date: NaiveDate::from_ymd_opt(2026, 3, 5).unwrap(),
///     scope: HolidayScope::Global,
/// };
/// assert!(holiday.applies_to("emp_001", NaiveDate::from_ymd_opt(2026, 3, 5).unwrap()));
/// assert!(!holiday.applies_to("emp_001", NaiveDate::from_ymd_opt(2026, 3, 6).unwrap()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    /// Holiday name.
    pub name: String,
    /// First day (inclusive).
    pub start_date: NaiveDate,
    /// Last day (inclusive).
    pub end_date: NaiveDate,
    /// Global or restricted to specific employees.
    pub scope: HolidayScope,
}

impl Holiday {
    /// Returns true if `date` is inside the holiday window and the holiday covers the employee.
    pub fn applies_to(&self, employee_id: &str, date: NaiveDate) -> bool {
        if date < self.start_date || date > self.end_date {
            return false;
        }

        match &self.scope {
            HolidayScope::Global => true,
            HolidayScope::Employees(ids) => ids.contains(employee_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    #[test]
    fn test_restricted_holiday_only_applies_to_listed_employees() {
        let holiday = Holiday {
            name: "Regional".to_string(),
            start_date: date(10),
            end_date: date(10),
            scope: HolidayScope::Employees(BTreeSet::from(["emp_002".to_string()])),
        };
        assert!(holiday.applies_to("emp_002", date(10)));
        assert!(!holiday.applies_to("emp_001", date(10)));
    }

    #[test]
    fn test_window_is_inclusive() {
        let holiday = Holiday {
            name: "Festival".to_string(),
            start_date: date(4),
            end_date: date(6),
            scope: HolidayScope::Global,
        };
        assert!(!holiday.applies_to("emp_001", date(3)));
        assert!(holiday.applies_to("emp_001", date(4)));
        assert!(holiday.applies_to("emp_001", date(6)));
        assert!(!holiday.applies_to("emp_001", date(7)));
    }

    #[test]
    fn test_scope_deserialization() {
        let yaml = r#"
name: Regional
start_date: "2026-03-10"
end_date: "2026-03-10"
scope:
  scope: employees
  employee_ids: [emp_001, emp_003]
"#;
        let holiday: Holiday = serde_yaml::from_str(yaml).unwrap();
        assert!(holiday.applies_to("emp_003", date(10)));
        assert!(!holiday.applies_to("emp_002", date(10)));

        let global: Holiday = serde_yaml::from_str(
            "name: New Year\nstart_date: \"2026-01-01\"\nend_date: \"2026-01-01\"\nscope:\n  scope: global\n",
        )
        .unwrap();
        assert_eq!(global.scope, HolidayScope::Global);
    }
}
