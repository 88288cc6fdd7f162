//! The availability engine: pure slot computation over a shop's weekly
//! schedule, optional per-staff hours, and the day's active bookings.
//!
//! Every booking surface (direct booking, admin booking, recurrence
//! re-check) goes through this module, so the overlap and capacity rules
//! exist exactly once.

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, Timelike};
use std::collections::HashSet;
use uuid::Uuid;

use crate::error::AvailabilityError;
use crate::types::{BookedInterval, DayWindow, StaffHours};

/// Snapshot of everything a slot computation needs. Fetched fresh per query
/// by the caller; the engine holds no state and performs no I/O.
#[derive(Debug, Clone)]
pub struct SlotQuery<'a> {
    pub shop_schedule: &'a [DayWindow],
    /// Hours of the requested staff member, when `staff_id` is set. `None`
    /// means the staff member is unknown or has no configured hours.
    pub staff_schedule: Option<&'a [StaffHours]>,
    pub staff_id: Option<Uuid>,
    /// "YYYY-MM-DD"
    pub date: &'a str,
    pub service_duration_minutes: i64,
    pub slot_interval_minutes: i64,
    /// All active bookings of the shop on `date`, every staff member's;
    /// the engine filters by staff itself.
    pub booked: &'a [BookedInterval],
    /// Total staff at the shop, used for capacity when no staff is requested.
    pub staff_count: usize,
    pub now: DateTime<Local>,
}

/// Outcome of the recurrence re-check: the source time either still exists
/// on the shifted date or it does not. Strictly go/no-go, no nearby search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecurrenceCheck {
    Confirmed { date: String, time: String },
    Unavailable { date: String },
}

/// Computes the ordered list of bookable "HH:MM" start times for a date.
pub fn compute_available_slots(query: &SlotQuery) -> Result<Vec<String>, AvailabilityError> {
    if query.service_duration_minutes <= 0 || query.slot_interval_minutes <= 0 {
        return Err(AvailabilityError::InvalidDuration);
    }
    let date = parse_date(query.date)?;
    let day_of_week = date.weekday().num_days_from_sunday() as u8;

    // Staff hours supersede shop hours entirely: a staff member with no
    // entry for the weekday is off that day even if the shop is open.
    let window = match query.staff_id {
        Some(_) => query
            .staff_schedule
            .and_then(|hours| hours.iter().find(|h| h.day_of_week == day_of_week))
            .map(|h| (h.start.as_str(), h.end.as_str())),
        None => query
            .shop_schedule
            .iter()
            .find(|w| w.day_of_week == day_of_week)
            .filter(|w| w.is_open)
            .map(|w| (w.start.as_str(), w.end.as_str())),
    };
    let Some((start, end)) = window else {
        return Ok(Vec::new());
    };
    let window_start = minutes_of_day(start)?;
    let window_end = minutes_of_day(end)?;

    let booked = parse_booked(query.booked)?;

    let today = date == query.now.date_naive();
    let now_seconds = i64::from(query.now.time().num_seconds_from_midnight());

    let mut slots = Vec::new();
    let mut candidate = window_start;
    while candidate < window_end {
        // A slot that would run past closing is dropped, not truncated,
        // and no later candidate can fit either.
        if candidate + query.service_duration_minutes > window_end {
            break;
        }
        let taken = interval_is_taken(
            candidate,
            query.service_duration_minutes,
            query.staff_id,
            query.staff_count,
            &booked,
        );
        // "Not strictly after now": second precision, so 09:20 is gone
        // the moment the clock reads 09:20:00.
        let in_past = today && candidate * 60 <= now_seconds;
        if !taken && !in_past {
            slots.push(format_time(candidate));
        }
        candidate += query.slot_interval_minutes;
    }
    slots.dedup();
    Ok(slots)
}

/// The shared conflict rule, also run by backends atomically with the
/// booking insert. Returns whether `[start, start + duration)` is occupied.
pub fn slot_is_taken(
    start: &str,
    duration_minutes: i64,
    staff_id: Option<Uuid>,
    staff_count: usize,
    booked: &[BookedInterval],
) -> Result<bool, AvailabilityError> {
    if duration_minutes <= 0 {
        return Err(AvailabilityError::InvalidDuration);
    }
    let start = minutes_of_day(start)?;
    let booked = parse_booked(booked)?;
    Ok(interval_is_taken(
        start,
        duration_minutes,
        staff_id,
        staff_count,
        &booked,
    ))
}

/// The source date moved forward by whole weeks, for the recurrence
/// re-check. Same weekday by construction.
pub fn shifted_date(date: &str, weeks_forward: i64) -> Result<NaiveDate, AvailabilityError> {
    Ok(parse_date(date)? + Duration::weeks(weeks_forward))
}

/// Re-checks whether `source_time` is still bookable under `query` (already
/// scoped to the shifted date).
pub fn shift_and_check(
    source_time: &str,
    query: &SlotQuery,
) -> Result<RecurrenceCheck, AvailabilityError> {
    let slots = compute_available_slots(query)?;
    if slots.iter().any(|slot| slot == source_time) {
        Ok(RecurrenceCheck::Confirmed {
            date: query.date.to_string(),
            time: source_time.to_string(),
        })
    } else {
        Ok(RecurrenceCheck::Unavailable {
            date: query.date.to_string(),
        })
    }
}

/// "HH:MM" to minutes since midnight, rejecting anything else.
pub fn minutes_of_day(time: &str) -> Result<i64, AvailabilityError> {
    let malformed = || AvailabilityError::InvalidScheduleFormat(time.to_string());
    let (hours, minutes) = time.split_once(':').ok_or_else(malformed)?;
    if hours.len() != 2 || minutes.len() != 2 {
        return Err(malformed());
    }
    let hours: i64 = hours.parse().map_err(|_| malformed())?;
    let minutes: i64 = minutes.parse().map_err(|_| malformed())?;
    if hours >= 24 || minutes >= 60 {
        return Err(malformed());
    }
    Ok(hours * 60 + minutes)
}

pub fn parse_date(date: &str) -> Result<NaiveDate, AvailabilityError> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AvailabilityError::InvalidDate(date.to_string()))
}

struct ParsedBooking {
    start: i64,
    end: i64,
    staff_id: Option<Uuid>,
}

fn parse_booked(booked: &[BookedInterval]) -> Result<Vec<ParsedBooking>, AvailabilityError> {
    booked
        .iter()
        .map(|b| {
            let start = minutes_of_day(&b.start)?;
            Ok(ParsedBooking {
                start,
                end: start + b.duration_minutes,
                staff_id: b.staff_id,
            })
        })
        .collect()
}

fn interval_is_taken(
    start: i64,
    duration_minutes: i64,
    staff_id: Option<Uuid>,
    staff_count: usize,
    booked: &[ParsedBooking],
) -> bool {
    let end = start + duration_minutes;
    // Strict inequalities: a booking ending exactly at `start` (or starting
    // exactly at `end`) does not conflict.
    let mut overlapping = booked.iter().filter(|b| start < b.end && b.start < end);

    match staff_id {
        Some(staff_id) => overlapping.any(|b| b.staff_id == Some(staff_id)),
        None => {
            // Capacity check: distinct assigned staff plus unassigned
            // bookings, each of which ties up one member.
            let mut assigned = HashSet::new();
            let mut unassigned = 0usize;
            for booking in overlapping {
                match booking.staff_id {
                    Some(id) => {
                        assigned.insert(id);
                    }
                    None => unassigned += 1,
                }
            }
            let occupied = assigned.len() + unassigned;
            occupied >= staff_count.max(1)
        }
    }
}

fn format_time(minutes: i64) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}
