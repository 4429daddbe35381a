//! In-memory attendance ledger.
//!
//! [`AttendanceStore`] stands in for the policy store and persistence layer:
//! it answers the lookups the processing rules need and holds every entity the
//! engine mutates (allocations, comp-off requests, daily records, sequences).
//! Callers must serialize mutation per employee; the store itself does no
//! locking.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::config::{AttendanceConfig, EnginePolicy};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    ApplicationSequence, ApprovalStatus, CompOffRequest, CompOffStatus, DailyAttendanceRecord,
    Employee, Holiday, LeaveAllocation, LeaveApplication, LeaveType, LeaveYear, PunchEvent,
    Regularization, Shift,
};

type EmployeeDay = (String, NaiveDate);

/// A weekoff day that was charged to a leave allocation by the sandwich rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SandwichCharge {
    /// Leave type the day was charged to.
    pub leave_type_code: String,
    /// Leave year of the charged allocation.
    pub leave_year: LeaveYear,
}

/// The engine's view of persisted attendance data.
#[derive(Debug, Clone, Default)]
pub struct AttendanceStore {
    policy: EnginePolicy,
    shifts: BTreeMap<String, Shift>,
    leave_types: BTreeMap<String, LeaveType>,
    employees: BTreeMap<String, Employee>,
    holidays: Vec<Holiday>,
    allocations: Vec<LeaveAllocation>,
    leave_applications: Vec<LeaveApplication>,
    regularizations: Vec<Regularization>,
    punches: Vec<PunchEvent>,
    comp_off_requests: Vec<CompOffRequest>,
    records: BTreeMap<EmployeeDay, DailyAttendanceRecord>,
    sequences: BTreeMap<(i32, u32), ApplicationSequence>,
    sandwich_charges: BTreeMap<EmployeeDay, SandwichCharge>,
}

impl AttendanceStore {
    /// Creates a store seeded with the configured policy, shifts and leave types.
    pub fn from_config(config: &AttendanceConfig) -> Self {
        Self {
            policy: config.policy().clone(),
            shifts: config.shifts().clone(),
            leave_types: config.leave_types().clone(),
            ..Self::default()
        }
    }

    /// Returns the engine-wide policy.
    pub fn policy(&self) -> &EnginePolicy {
        &self.policy
    }

    // ---------------------------------------------------------------------
    // Policy lookups
    // ---------------------------------------------------------------------

    /// Adds or replaces a shift.
    pub fn add_shift(&mut self, shift: Shift) {
        self.shifts.insert(shift.id.clone(), shift);
    }

    /// Gets a shift by id.
    pub fn shift(&self, id: &str) -> EngineResult<&Shift> {
        self.shifts.get(id).ok_or_else(|| EngineError::ShiftNotFound {
            shift_id: id.to_string(),
        })
    }

    /// Returns the employee's shift; `None` when unassigned, an error when the id is unknown.
    pub fn shift_for(&self, employee: &Employee) -> EngineResult<Option<&Shift>> {
        employee
            .shift_id
            .as_deref()
            .map(|id| self.shift(id))
            .transpose()
    }

    /// Adds or replaces a leave type.
    pub fn add_leave_type(&mut self, leave_type: LeaveType) {
        self.leave_types
            .insert(leave_type.code.clone(), leave_type);
    }

    /// Gets a leave type by code.
    pub fn leave_type(&self, code: &str) -> EngineResult<&LeaveType> {
        self.leave_types
            .get(code)
            .ok_or_else(|| EngineError::LeaveTypeNotFound {
                code: code.to_string(),
            })
    }

    /// All leave types in code order.
    pub fn leave_types(&self) -> Vec<LeaveType> {
        self.leave_types.values().cloned().collect()
    }

    /// Adds or replaces an employee.
    pub fn add_employee(&mut self, employee: Employee) {
        self.employees.insert(employee.id.clone(), employee);
    }

    /// Gets an employee by id.
    pub fn employee(&self, id: &str) -> EngineResult<&Employee> {
        self.employees
            .get(id)
            .ok_or_else(|| EngineError::EmployeeNotFound {
                employee_id: id.to_string(),
            })
    }

    /// All employee ids in ascending order.
    pub fn employee_ids(&self) -> Vec<String> {
        self.employees.keys().cloned().collect()
    }

    /// Adds a holiday.
    pub fn add_holiday(&mut self, holiday: Holiday) {
        self.holidays.push(holiday);
    }

    /// Returns true if any holiday applies to the employee on `date`.
    pub fn is_holiday(&self, employee_id: &str, date: NaiveDate) -> bool {
        self.holidays
            .iter()
            .any(|h| h.applies_to(employee_id, date))
    }

    // ---------------------------------------------------------------------
    // Leave allocations
    // ---------------------------------------------------------------------

    /// Adds an allocation, replacing any row for the same employee, type and year.
    pub fn upsert_allocation(&mut self, allocation: LeaveAllocation) {
        match self.allocation_mut(
            &allocation.employee_id,
            &allocation.leave_type_code,
            allocation.leave_year,
        ) {
            Some(existing) => *existing = allocation,
            None => self.allocations.push(allocation),
        }
    }

    /// Gets the allocation for an employee, leave type and year.
    pub fn allocation(
        &self,
        employee_id: &str,
        leave_type_code: &str,
        leave_year: LeaveYear,
    ) -> Option<&LeaveAllocation> {
        self.allocations.iter().find(|a| {
            a.employee_id == employee_id
                && a.leave_type_code == leave_type_code
                && a.leave_year == leave_year
        })
    }

    /// Mutable access to the allocation for an employee, leave type and year.
    pub fn allocation_mut(
        &mut self,
        employee_id: &str,
        leave_type_code: &str,
        leave_year: LeaveYear,
    ) -> Option<&mut LeaveAllocation> {
        self.allocations.iter_mut().find(|a| {
            a.employee_id == employee_id
                && a.leave_type_code == leave_type_code
                && a.leave_year == leave_year
        })
    }

    /// Returns the allocation row, creating an empty one if missing.
    pub fn allocation_entry(
        &mut self,
        employee_id: &str,
        leave_type_code: &str,
        leave_year: LeaveYear,
    ) -> &mut LeaveAllocation {
        let position = self.allocations.iter().position(|a| {
            a.employee_id == employee_id
                && a.leave_type_code == leave_type_code
                && a.leave_year == leave_year
        });
        let index = match position {
            Some(index) => index,
            None => {
                self.allocations.push(LeaveAllocation::new(
                    employee_id,
                    leave_type_code,
                    leave_year,
                ));
                self.allocations.len() - 1
            }
        };
        &mut self.allocations[index]
    }

    /// All of an employee's allocations of one leave type.
    pub fn allocations_of_type(
        &self,
        employee_id: &str,
        leave_type_code: &str,
    ) -> Vec<&LeaveAllocation> {
        self.allocations
            .iter()
            .filter(|a| a.employee_id == employee_id && a.leave_type_code == leave_type_code)
            .collect()
    }

    /// All of an employee's allocations of one leave type, oldest leave year first.
    pub fn allocations_of_type_mut(
        &mut self,
        employee_id: &str,
        leave_type_code: &str,
    ) -> Vec<&mut LeaveAllocation> {
        let mut rows: Vec<&mut LeaveAllocation> = self
            .allocations
            .iter_mut()
            .filter(|a| a.employee_id == employee_id && a.leave_type_code == leave_type_code)
            .collect();
        rows.sort_by_key(|a| a.leave_year);
        rows
    }

    /// Sum of used days across every leave year for one employee and leave type.
    pub fn total_used(&self, employee_id: &str, leave_type_code: &str) -> Decimal {
        self.allocations
            .iter()
            .filter(|a| a.employee_id == employee_id && a.leave_type_code == leave_type_code)
            .map(|a| a.used_count)
            .sum()
    }

    /// All allocations for a leave year.
    pub fn allocations_in_year(&self, leave_year: LeaveYear) -> Vec<LeaveAllocation> {
        self.allocations
            .iter()
            .filter(|a| a.leave_year == leave_year)
            .cloned()
            .collect()
    }

    /// Remembers that a weekoff was charged to an allocation.
    pub fn record_sandwich_charge(
        &mut self,
        employee_id: &str,
        date: NaiveDate,
        charge: SandwichCharge,
    ) {
        self.sandwich_charges
            .insert((employee_id.to_string(), date), charge);
    }

    /// Returns a previous sandwich charge for the day to its allocation.
    pub fn release_sandwich_charge(
        &mut self,
        employee_id: &str,
        date: NaiveDate,
    ) -> Option<SandwichCharge> {
        let charge = self
            .sandwich_charges
            .remove(&(employee_id.to_string(), date))?;
        if let Some(allocation) =
            self.allocation_mut(employee_id, &charge.leave_type_code, charge.leave_year)
        {
            allocation.release(Decimal::ONE);
        }
        Some(charge)
    }

    /// Puts back a charge taken by [`release_sandwich_charge`](Self::release_sandwich_charge).
    pub fn restore_sandwich_charge(
        &mut self,
        employee_id: &str,
        date: NaiveDate,
        charge: SandwichCharge,
    ) {
        if let Some(allocation) =
            self.allocation_mut(employee_id, &charge.leave_type_code, charge.leave_year)
        {
            allocation.used_count += Decimal::ONE;
        }
        self.record_sandwich_charge(employee_id, date, charge);
    }

    // ---------------------------------------------------------------------
    // Exceptions and punches
    // ---------------------------------------------------------------------

    /// Adds a leave application.
    pub fn add_leave_application(&mut self, application: LeaveApplication) {
        self.leave_applications.push(application);
    }

    /// Gets a leave application by id.
    pub fn leave_application(&self, id: Uuid) -> EngineResult<&LeaveApplication> {
        self.leave_applications
            .iter()
            .find(|l| l.id == id)
            .ok_or_else(|| EngineError::LeaveApplicationNotFound { id: id.to_string() })
    }

    /// Removes a leave application.
    pub fn remove_leave_application(&mut self, id: Uuid) -> EngineResult<LeaveApplication> {
        let index = self
            .leave_applications
            .iter()
            .position(|l| l.id == id)
            .ok_or_else(|| EngineError::LeaveApplicationNotFound { id: id.to_string() })?;
        Ok(self.leave_applications.remove(index))
    }

    /// The approved leave covering the employee's day, if any.
    pub fn approved_leave_on(
        &self,
        employee_id: &str,
        date: NaiveDate,
    ) -> Option<&LeaveApplication> {
        self.leave_applications.iter().find(|l| {
            l.employee_id == employee_id && l.status == ApprovalStatus::Approved && l.covers(date)
        })
    }

    /// The first approved leave of the employee intersecting `[start, end]`.
    pub fn overlapping_leave(
        &self,
        employee_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Option<&LeaveApplication> {
        self.leave_applications.iter().find(|l| {
            l.employee_id == employee_id
                && l.status == ApprovalStatus::Approved
                && l.start_date <= end
                && start <= l.end_date
        })
    }

    /// The approved full-day, non-exempt leave that can bridge a weekoff on `date`.
    pub fn bridging_leave_on(
        &self,
        employee_id: &str,
        date: NaiveDate,
    ) -> Option<&LeaveApplication> {
        self.leave_applications
            .iter()
            .find(|l| l.employee_id == employee_id && l.bridges(date))
    }

    /// Adds a regularization.
    pub fn add_regularization(&mut self, regularization: Regularization) {
        self.regularizations.push(regularization);
    }

    /// Removes a regularization, returning it if it existed.
    pub fn remove_regularization(&mut self, id: Uuid) -> Option<Regularization> {
        let index = self.regularizations.iter().position(|r| r.id == id)?;
        Some(self.regularizations.remove(index))
    }

    /// The approved regularization for the employee's day, if any.
    pub fn approved_regularization_on(
        &self,
        employee_id: &str,
        date: NaiveDate,
    ) -> Option<&Regularization> {
        self.regularizations.iter().find(|r| {
            r.employee_id == employee_id && r.date == date && r.status == ApprovalStatus::Approved
        })
    }

    /// Records a raw punch.
    pub fn add_punch(&mut self, punch: PunchEvent) {
        self.punches.push(punch);
    }

    /// Device punches plus regularized virtual punches for the employee's day, unsorted.
    pub fn punches_for(&self, employee_id: &str, date: NaiveDate) -> Vec<PunchEvent> {
        let device = self
            .punches
            .iter()
            .filter(|p| p.employee_id == employee_id && p.date() == date)
            .cloned();
        let virtual_punches = self
            .regularizations
            .iter()
            .filter(|r| r.employee_id == employee_id && r.date == date)
            .flat_map(Regularization::virtual_punches);

        device.chain(virtual_punches).collect()
    }

    /// Returns true if the employee has any punch on `date`.
    pub fn has_punches(&self, employee_id: &str, date: NaiveDate) -> bool {
        !self.punches_for(employee_id, date).is_empty()
    }

    // ---------------------------------------------------------------------
    // Comp-off requests
    // ---------------------------------------------------------------------

    /// Adds a comp-off request.
    pub fn add_comp_off_request(&mut self, request: CompOffRequest) {
        self.comp_off_requests.push(request);
    }

    /// The comp-off request for an employee's worked date.
    pub fn comp_off_for(
        &self,
        employee_id: &str,
        worked_date: NaiveDate,
    ) -> Option<&CompOffRequest> {
        self.comp_off_requests
            .iter()
            .find(|r| r.employee_id == employee_id && r.worked_date == worked_date)
    }

    /// Mutable access to the comp-off request for an employee's worked date.
    pub fn comp_off_for_mut(
        &mut self,
        employee_id: &str,
        worked_date: NaiveDate,
    ) -> Option<&mut CompOffRequest> {
        self.comp_off_requests
            .iter_mut()
            .find(|r| r.employee_id == employee_id && r.worked_date == worked_date)
    }

    /// Gets a comp-off request by id.
    pub fn comp_off(&self, id: Uuid) -> EngineResult<&CompOffRequest> {
        self.comp_off_requests
            .iter()
            .find(|r| r.id == id)
            .ok_or_else(|| EngineError::CompOffRequestNotFound { id: id.to_string() })
    }

    /// Mutable access to a comp-off request by id.
    pub fn comp_off_mut(&mut self, id: Uuid) -> EngineResult<&mut CompOffRequest> {
        self.comp_off_requests
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| EngineError::CompOffRequestNotFound { id: id.to_string() })
    }

    /// Approved credits for an employee, oldest worked date first.
    pub fn approved_comp_offs(&self, employee_id: &str) -> Vec<&CompOffRequest> {
        let mut approved: Vec<&CompOffRequest> = self
            .comp_off_requests
            .iter()
            .filter(|r| r.employee_id == employee_id && r.status == CompOffStatus::Approved)
            .collect();
        approved.sort_by_key(|r| r.worked_date);
        approved
    }

    // ---------------------------------------------------------------------
    // Daily records
    // ---------------------------------------------------------------------

    /// Persists a daily record, replacing any previous version.
    pub fn save_record(&mut self, record: DailyAttendanceRecord) {
        self.records
            .insert((record.employee_id.clone(), record.date), record);
    }

    /// Gets the stored record for an employee's day.
    pub fn record(&self, employee_id: &str, date: NaiveDate) -> Option<&DailyAttendanceRecord> {
        self.records.get(&(employee_id.to_string(), date))
    }

    /// Mutable access to the stored record for an employee's day.
    pub fn record_mut(
        &mut self,
        employee_id: &str,
        date: NaiveDate,
    ) -> Option<&mut DailyAttendanceRecord> {
        self.records.get_mut(&(employee_id.to_string(), date))
    }

    /// Stored records from the first of the month up to, excluding, `date`.
    pub fn records_in_month_before(
        &self,
        employee_id: &str,
        date: NaiveDate,
    ) -> Vec<&DailyAttendanceRecord> {
        let Some(month_start) = date.with_day(1) else {
            return Vec::new();
        };
        self.records
            .range((employee_id.to_string(), month_start)..(employee_id.to_string(), date))
            .map(|(_, record)| record)
            .collect()
    }

    // ---------------------------------------------------------------------
    // Tickets
    // ---------------------------------------------------------------------

    /// Every ticket string issued in a month across regularizations (by date),
    /// leave applications (by start date) and daily records (by date).
    pub fn tickets_in_month(&self, year: i32, month: u32) -> Vec<&str> {
        let in_month = |d: NaiveDate| d.year() == year && d.month() == month;

        let regularizations = self
            .regularizations
            .iter()
            .filter(|r| in_month(r.date))
            .filter_map(|r| r.ticket.as_deref());
        let leaves = self
            .leave_applications
            .iter()
            .filter(|l| in_month(l.start_date))
            .filter_map(|l| l.ticket.as_deref());
        let records = self
            .records
            .values()
            .filter(|d| in_month(d.date))
            .filter_map(|d| d.ticket.as_deref());

        regularizations.chain(leaves).chain(records).collect()
    }

    /// The advisory counter for a month.
    pub fn sequence(&self, year: i32, month: u32) -> Option<&ApplicationSequence> {
        self.sequences.get(&(year, month))
    }

    /// Writes the advisory counter for a month.
    pub fn set_sequence(&mut self, year: i32, month: u32, current_value: u32) {
        self.sequences.insert(
            (year, month),
            ApplicationSequence {
                year,
                month,
                current_value,
            },
        );
    }
}
