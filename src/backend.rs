use uuid::Uuid;

use crate::error::BookingError;
use crate::types::{Appointment, BookedInterval, DayWindow, NewAppointment, StaffHours};

/// Storage behind the scheduler: shop and staff hours plus the appointment
/// book. Implemented in memory and on PostgreSQL.
pub trait SchedulingBackend: Clone + Send + Sync + 'static {
    fn shop_schedule(&self, shop_id: Uuid) -> Vec<DayWindow>;

    /// `None` when the staff member is unknown to the store.
    fn staff_schedule(&self, staff_id: Uuid) -> Option<Vec<StaffHours>>;

    fn staff_count(&self, shop_id: Uuid) -> usize;

    /// Every active booking of the shop on the date, all staff included;
    /// the availability engine does its own staff filtering.
    fn booked_intervals(&self, shop_id: Uuid, date: &str) -> Vec<BookedInterval>;

    fn appointment(&self, id: Uuid) -> Option<Appointment>;

    /// Inserts a booking after re-running the conflict check atomically with
    /// the insert, so a slot taken since the availability read surfaces as
    /// `SlotNoLongerAvailable` instead of a double booking.
    fn book_appointment(&self, appointment: NewAppointment) -> Result<Appointment, BookingError>;

    /// Cancelled appointments stop occupying time immediately.
    fn cancel_appointment(&self, id: Uuid) -> Result<(), BookingError>;

    fn set_shop_schedule(&self, shop_id: Uuid, windows: Vec<DayWindow>);

    fn set_staff_schedule(&self, shop_id: Uuid, staff_id: Uuid, windows: Vec<StaffHours>);
}
