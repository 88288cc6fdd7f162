use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Arc, Mutex,
};

use chrono::{DateTime, Local, TimeZone};
use uuid::Uuid;

use crate::backend::SchedulingBackend;
use crate::clock::Clock;
use crate::configuration::Configuration;
use crate::error::BookingError;
use crate::types::{
    Appointment, AppointmentStatus, BookedInterval, DayWindow, NewAppointment, StaffHours,
};

pub struct MockSchedulingBackendInner {
    pub success: AtomicBool,
    pub calls_to_shop_schedule: AtomicU64,
    pub calls_to_staff_schedule: AtomicU64,
    pub calls_to_staff_count: AtomicU64,
    pub calls_to_booked_intervals: AtomicU64,
    pub calls_to_appointment: AtomicU64,
    pub calls_to_book_appointment: AtomicU64,
    pub calls_to_cancel_appointment: AtomicU64,
    pub calls_to_set_shop_schedule: AtomicU64,
    pub calls_to_set_staff_schedule: AtomicU64,
    pub shop_schedule: Mutex<Vec<DayWindow>>,
    pub staff_schedule: Mutex<Option<Vec<StaffHours>>>,
    pub staff_count: AtomicU64,
    pub booked_intervals: Mutex<Vec<BookedInterval>>,
    pub appointment: Mutex<Option<Appointment>>,
    pub last_booked: Mutex<Option<NewAppointment>>,
}

#[derive(Clone)]
pub struct MockSchedulingBackend(pub Arc<MockSchedulingBackendInner>);

impl MockSchedulingBackend {
    pub fn new() -> Self {
        Self(Arc::new(MockSchedulingBackendInner {
            success: AtomicBool::new(true),
            calls_to_shop_schedule: AtomicU64::default(),
            calls_to_staff_schedule: AtomicU64::default(),
            calls_to_staff_count: AtomicU64::default(),
            calls_to_booked_intervals: AtomicU64::default(),
            calls_to_appointment: AtomicU64::default(),
            calls_to_book_appointment: AtomicU64::default(),
            calls_to_cancel_appointment: AtomicU64::default(),
            calls_to_set_shop_schedule: AtomicU64::default(),
            calls_to_set_staff_schedule: AtomicU64::default(),
            shop_schedule: Mutex::default(),
            staff_schedule: Mutex::default(),
            staff_count: AtomicU64::new(1),
            booked_intervals: Mutex::default(),
            appointment: Mutex::default(),
            last_booked: Mutex::default(),
        }))
    }
}

impl SchedulingBackend for MockSchedulingBackend {
    fn shop_schedule(&self, _shop_id: Uuid) -> Vec<DayWindow> {
        self.0.calls_to_shop_schedule.fetch_add(1, Ordering::SeqCst);
        self.0.shop_schedule.lock().unwrap().clone()
    }

    fn staff_schedule(&self, _staff_id: Uuid) -> Option<Vec<StaffHours>> {
        self.0
            .calls_to_staff_schedule
            .fetch_add(1, Ordering::SeqCst);
        self.0.staff_schedule.lock().unwrap().clone()
    }

    fn staff_count(&self, _shop_id: Uuid) -> usize {
        self.0.calls_to_staff_count.fetch_add(1, Ordering::SeqCst);
        self.0.staff_count.load(Ordering::SeqCst) as usize
    }

    fn booked_intervals(&self, _shop_id: Uuid, _date: &str) -> Vec<BookedInterval> {
        self.0
            .calls_to_booked_intervals
            .fetch_add(1, Ordering::SeqCst);
        self.0.booked_intervals.lock().unwrap().clone()
    }

    fn appointment(&self, _id: Uuid) -> Option<Appointment> {
        self.0.calls_to_appointment.fetch_add(1, Ordering::SeqCst);
        self.0.appointment.lock().unwrap().clone()
    }

    fn book_appointment(&self, appointment: NewAppointment) -> Result<Appointment, BookingError> {
        self.0
            .calls_to_book_appointment
            .fetch_add(1, Ordering::SeqCst);
        *self.0.last_booked.lock().unwrap() = Some(appointment.clone());
        if !self.0.success.load(Ordering::SeqCst) {
            return Err(BookingError::SlotNoLongerAvailable);
        }
        Ok(Appointment {
            id: Uuid::new_v4(),
            shop_id: appointment.shop_id,
            staff_id: appointment.staff_id,
            client_name: appointment.client_name,
            date: appointment.date,
            time: appointment.time,
            duration_minutes: appointment.duration_minutes,
            status: AppointmentStatus::Scheduled,
            notes: appointment.notes,
            source_appointment_id: appointment.source_appointment_id,
        })
    }

    fn cancel_appointment(&self, _id: Uuid) -> Result<(), BookingError> {
        self.0
            .calls_to_cancel_appointment
            .fetch_add(1, Ordering::SeqCst);
        match self.0.success.load(Ordering::SeqCst) {
            true => Ok(()),
            false => Err(BookingError::NotFound),
        }
    }

    fn set_shop_schedule(&self, _shop_id: Uuid, _windows: Vec<DayWindow>) {
        self.0
            .calls_to_set_shop_schedule
            .fetch_add(1, Ordering::SeqCst);
    }

    fn set_staff_schedule(&self, _shop_id: Uuid, _staff_id: Uuid, _windows: Vec<StaffHours>) {
        self.0
            .calls_to_set_staff_schedule
            .fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone)]
pub struct FixedClock(pub DateTime<Local>);

impl FixedClock {
    /// Monday 2025-03-10, 08:00 local time, before any slot of the day.
    pub fn early_monday() -> Self {
        Self(Local.with_ymd_and_hms(2025, 3, 10, 8, 0, 0).unwrap())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct TestConfiguration;

impl Configuration for TestConfiguration {
    fn port(&self) -> String {
        "0".into()
    }

    fn admin_password(&self) -> String {
        "123".into()
    }

    fn database_url(&self) -> Option<String> {
        None
    }

    fn slot_interval_minutes(&self) -> i64 {
        30
    }
}
