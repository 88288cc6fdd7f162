use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::availability::minutes_of_day;
use crate::error::AvailabilityError;

/// One weekday's opening window of a shop. A weekly schedule is a list of
/// these with at most one entry per weekday; a missing weekday means closed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayWindow {
    /// 0 = Sunday .. 6 = Saturday
    pub day_of_week: u8,
    pub start: String,
    pub end: String,
    pub is_open: bool,
}

/// Per-staff working hours for one weekday. Presence of an entry means the
/// staff member works that day; no entry means unavailable regardless of
/// shop hours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffHours {
    pub day_of_week: u8,
    pub start: String,
    pub end: String,
}

/// Time occupied by an active appointment, as seen by the availability
/// engine. `staff_id` is `None` for bookings not assigned to anyone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookedInterval {
    pub start: String,
    pub duration_minutes: i64,
    pub staff_id: Option<Uuid>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub shop_id: Uuid,
    pub staff_id: Option<Uuid>,
    pub client_name: String,
    /// "YYYY-MM-DD"
    pub date: String,
    /// "HH:MM"
    pub time: String,
    pub duration_minutes: i64,
    pub status: AppointmentStatus,
    pub notes: String,
    /// Set when this appointment was created by the recurrence re-check.
    pub source_appointment_id: Option<Uuid>,
}

impl Appointment {
    pub fn is_active(&self) -> bool {
        self.status == AppointmentStatus::Scheduled
    }

    pub fn as_booked_interval(&self) -> BookedInterval {
        BookedInterval {
            start: self.time.clone(),
            duration_minutes: self.duration_minutes,
            staff_id: self.staff_id,
        }
    }
}

/// Insert shape for a booking; id and status are assigned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAppointment {
    pub shop_id: Uuid,
    pub staff_id: Option<Uuid>,
    pub client_name: String,
    pub date: String,
    pub time: String,
    pub duration_minutes: i64,
    pub notes: String,
    pub source_appointment_id: Option<Uuid>,
}

/// Checks the weekly-schedule invariants before hours are written: one entry
/// per weekday, parsable times, and `start < end` whenever the day is open.
pub fn validate_shop_schedule(windows: &[DayWindow]) -> Result<(), AvailabilityError> {
    let mut seen = [false; 7];
    for window in windows {
        check_weekday(&mut seen, window.day_of_week)?;
        let start = minutes_of_day(&window.start)?;
        let end = minutes_of_day(&window.end)?;
        if window.is_open && start >= end {
            return Err(AvailabilityError::InvalidScheduleFormat(format!(
                "window {}-{} does not start before it ends",
                window.start, window.end
            )));
        }
    }
    Ok(())
}

/// Same invariants for per-staff hours; every entry implies an open day.
pub fn validate_staff_schedule(windows: &[StaffHours]) -> Result<(), AvailabilityError> {
    let mut seen = [false; 7];
    for window in windows {
        check_weekday(&mut seen, window.day_of_week)?;
        let start = minutes_of_day(&window.start)?;
        let end = minutes_of_day(&window.end)?;
        if start >= end {
            return Err(AvailabilityError::InvalidScheduleFormat(format!(
                "window {}-{} does not start before it ends",
                window.start, window.end
            )));
        }
    }
    Ok(())
}

fn check_weekday(seen: &mut [bool; 7], day_of_week: u8) -> Result<(), AvailabilityError> {
    let index = usize::from(day_of_week);
    if index >= 7 || seen[index] {
        return Err(AvailabilityError::InvalidScheduleFormat(format!(
            "invalid or duplicate weekday {day_of_week}"
        )));
    }
    seen[index] = true;
    Ok(())
}
