use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use tracing::info;
use uuid::Uuid;

use crate::availability::slot_is_taken;
use crate::backend::SchedulingBackend;
use crate::error::BookingError;
use crate::types::{
    Appointment, AppointmentStatus, BookedInterval, DayWindow, NewAppointment, StaffHours,
};

/// In-memory backend, used when the service runs without a database.
#[derive(Debug, Clone, Default)]
pub struct LocalStore {
    inner: Arc<Mutex<LocalStoreInner>>,
}

#[derive(Debug, Default)]
struct LocalStoreInner {
    shop_hours: HashMap<Uuid, Vec<DayWindow>>,
    staff_hours: HashMap<Uuid, Vec<StaffHours>>,
    shop_staff: HashMap<Uuid, HashSet<Uuid>>,
    appointments: HashMap<Uuid, Appointment>,
}

impl LocalStore {
    /// Seeds one shop with the usual barbershop week: Mon-Fri 09:00-18:00,
    /// Sat 10:00-16:00, closed Sunday.
    pub fn insert_example_shop(&self) -> Uuid {
        let shop_id = Uuid::new_v4();
        let mut windows = vec![DayWindow {
            day_of_week: 0,
            start: "09:00".into(),
            end: "18:00".into(),
            is_open: false,
        }];
        for day_of_week in 1..=5 {
            windows.push(DayWindow {
                day_of_week,
                start: "09:00".into(),
                end: "18:00".into(),
                is_open: true,
            });
        }
        windows.push(DayWindow {
            day_of_week: 6,
            start: "10:00".into(),
            end: "16:00".into(),
            is_open: true,
        });
        self.set_shop_schedule(shop_id, windows);
        info!(%shop_id, "seeded example shop");
        shop_id
    }

    fn active_intervals(inner: &LocalStoreInner, shop_id: Uuid, date: &str) -> Vec<BookedInterval> {
        inner
            .appointments
            .values()
            .filter(|a| a.shop_id == shop_id && a.date == date && a.is_active())
            .map(Appointment::as_booked_interval)
            .collect()
    }
}

impl SchedulingBackend for LocalStore {
    fn shop_schedule(&self, shop_id: Uuid) -> Vec<DayWindow> {
        let inner = self.inner.lock().unwrap();
        inner.shop_hours.get(&shop_id).cloned().unwrap_or_default()
    }

    fn staff_schedule(&self, staff_id: Uuid) -> Option<Vec<StaffHours>> {
        let inner = self.inner.lock().unwrap();
        inner.staff_hours.get(&staff_id).cloned()
    }

    fn staff_count(&self, shop_id: Uuid) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.shop_staff.get(&shop_id).map_or(0, HashSet::len)
    }

    fn booked_intervals(&self, shop_id: Uuid, date: &str) -> Vec<BookedInterval> {
        let inner = self.inner.lock().unwrap();
        Self::active_intervals(&inner, shop_id, date)
    }

    fn appointment(&self, id: Uuid) -> Option<Appointment> {
        let inner = self.inner.lock().unwrap();
        inner.appointments.get(&id).cloned()
    }

    fn book_appointment(&self, appointment: NewAppointment) -> Result<Appointment, BookingError> {
        // Conflict check and insert under one lock; a concurrent booking of
        // the same slot deterministically loses with SlotNoLongerAvailable.
        let mut inner = self.inner.lock().unwrap();
        let booked = Self::active_intervals(&inner, appointment.shop_id, &appointment.date);
        let staff_count = inner
            .shop_staff
            .get(&appointment.shop_id)
            .map_or(0, HashSet::len);
        if slot_is_taken(
            &appointment.time,
            appointment.duration_minutes,
            appointment.staff_id,
            staff_count,
            &booked,
        )? {
            return Err(BookingError::SlotNoLongerAvailable);
        }

        let record = Appointment {
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
        };
        inner.appointments.insert(record.id, record.clone());
        Ok(record)
    }

    fn cancel_appointment(&self, id: Uuid) -> Result<(), BookingError> {
        let mut inner = self.inner.lock().unwrap();
        match inner.appointments.get_mut(&id) {
            Some(appointment) => {
                appointment.status = AppointmentStatus::Cancelled;
                Ok(())
            }
            None => Err(BookingError::NotFound),
        }
    }

    fn set_shop_schedule(&self, shop_id: Uuid, windows: Vec<DayWindow>) {
        let mut inner = self.inner.lock().unwrap();
        inner.shop_hours.insert(shop_id, windows);
        inner.shop_staff.entry(shop_id).or_default();
    }

    fn set_staff_schedule(&self, shop_id: Uuid, staff_id: Uuid, windows: Vec<StaffHours>) {
        let mut inner = self.inner.lock().unwrap();
        inner.staff_hours.insert(staff_id, windows);
        inner.shop_staff.entry(shop_id).or_default().insert(staff_id);
    }
}
