use axum::extract::{Query, Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::availability::{
    compute_available_slots, shift_and_check, shifted_date, RecurrenceCheck, SlotQuery,
};
use crate::backend::SchedulingBackend;
use crate::clock::Clock;
use crate::configuration::Configuration;
use crate::error::BookingError;
use crate::types::{
    validate_shop_schedule, validate_staff_schedule, DayWindow, NewAppointment, StaffHours,
};

#[derive(Clone)]
pub struct AppState<B, K> {
    backend: B,
    clock: K,
    admin_password: String,
    slot_interval_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
struct SlotsParams {
    shop_id: Uuid,
    date: String,
    duration_minutes: i64,
    staff_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
struct BookingRequest {
    shop_id: Uuid,
    staff_id: Option<Uuid>,
    #[validate(length(min = 1))]
    client_name: String,
    date: String,
    time: String,
    #[validate(range(min = 1))]
    duration_minutes: i64,
    #[serde(default)]
    notes: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
struct RecurrenceRequest {
    appointment_id: Uuid,
    #[validate(range(min = 1))]
    weeks_forward: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ShopHoursRequest {
    shop_id: Uuid,
    windows: Vec<DayWindow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StaffHoursRequest {
    shop_id: Uuid,
    staff_id: Uuid,
    windows: Vec<StaffHours>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CancelRequest {
    appointment_id: Uuid,
}

pub fn create_app<B: SchedulingBackend, K: Clock, C: Configuration>(
    backend: B,
    clock: K,
    configuration: C,
) -> Router {
    let state = AppState {
        backend,
        clock,
        admin_password: configuration.admin_password(),
        slot_interval_minutes: configuration.slot_interval_minutes(),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let public = Router::new()
        .route("/slots", get(get_slots::<B, K>))
        .route("/book", post(book_appointment::<B, K>))
        .route("/recurring", post(book_recurring::<B, K>));

    let admin = Router::new()
        .route("/shop_hours", post(set_shop_hours::<B, K>))
        .route("/staff_hours", post(set_staff_hours::<B, K>))
        .route("/cancel", post(cancel_appointment::<B, K>))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            admin_auth::<B, K>,
        ));

    Router::new()
        .merge(public)
        .merge(admin)
        .with_state(state)
        .layer(cors)
}

async fn admin_auth<B: SchedulingBackend, K: Clock>(
    State(state): State<AppState<B, K>>,
    request: Request,
    next: Next,
) -> Result<Response, (StatusCode, String)> {
    match request.headers().get("x-admin-password") {
        Some(header) if header.to_str().unwrap_or("") == state.admin_password => {
            Ok(next.run(request).await)
        }
        Some(_) => Err((StatusCode::UNAUTHORIZED, "Unauthorized".to_string())),
        None => Err((StatusCode::UNAUTHORIZED, "Missing credentials".to_string())),
    }
}

async fn get_slots<B: SchedulingBackend, K: Clock>(
    State(state): State<AppState<B, K>>,
    Query(params): Query<SlotsParams>,
) -> Response {
    let shop_schedule = state.backend.shop_schedule(params.shop_id);
    let staff_schedule = params
        .staff_id
        .and_then(|staff_id| state.backend.staff_schedule(staff_id));
    let booked = state.backend.booked_intervals(params.shop_id, &params.date);
    let staff_count = state.backend.staff_count(params.shop_id);

    let query = SlotQuery {
        shop_schedule: &shop_schedule,
        staff_schedule: staff_schedule.as_deref(),
        staff_id: params.staff_id,
        date: &params.date,
        service_duration_minutes: params.duration_minutes,
        slot_interval_minutes: state.slot_interval_minutes,
        booked: &booked,
        staff_count,
        now: state.clock.now(),
    };
    match compute_available_slots(&query) {
        Ok(slots) => Json(slots).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn book_appointment<B: SchedulingBackend, K: Clock>(
    State(state): State<AppState<B, K>>,
    Json(booking): Json<BookingRequest>,
) -> Response {
    if let Err(err) = booking.validate() {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": err.to_string() })))
            .into_response();
    }
    let appointment = NewAppointment {
        shop_id: booking.shop_id,
        staff_id: booking.staff_id,
        client_name: booking.client_name,
        date: booking.date,
        time: booking.time,
        duration_minutes: booking.duration_minutes,
        notes: booking.notes,
        source_appointment_id: None,
    };
    match state.backend.book_appointment(appointment) {
        Ok(appointment) => {
            info!(appointment_id = %appointment.id, "appointment booked");
            Json(appointment).into_response()
        }
        Err(err) => err.into_response(),
    }
}

/// Books the source appointment's exact time N weeks ahead, strictly
/// go/no-go: a 409 with the shifted date means the caller should offer
/// other times instead.
async fn book_recurring<B: SchedulingBackend, K: Clock>(
    State(state): State<AppState<B, K>>,
    Json(recurrence): Json<RecurrenceRequest>,
) -> Response {
    if let Err(err) = recurrence.validate() {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": err.to_string() })))
            .into_response();
    }
    let Some(source) = state.backend.appointment(recurrence.appointment_id) else {
        return BookingError::NotFound.into_response();
    };
    let new_date = match shifted_date(&source.date, recurrence.weeks_forward) {
        Ok(date) => date.format("%Y-%m-%d").to_string(),
        Err(err) => return err.into_response(),
    };

    let shop_schedule = state.backend.shop_schedule(source.shop_id);
    let staff_schedule = source
        .staff_id
        .and_then(|staff_id| state.backend.staff_schedule(staff_id));
    let booked = state.backend.booked_intervals(source.shop_id, &new_date);
    let staff_count = state.backend.staff_count(source.shop_id);

    let query = SlotQuery {
        shop_schedule: &shop_schedule,
        staff_schedule: staff_schedule.as_deref(),
        staff_id: source.staff_id,
        date: &new_date,
        service_duration_minutes: source.duration_minutes,
        slot_interval_minutes: state.slot_interval_minutes,
        booked: &booked,
        staff_count,
        now: state.clock.now(),
    };
    match shift_and_check(&source.time, &query) {
        Ok(RecurrenceCheck::Confirmed { date, time }) => {
            let appointment = NewAppointment {
                shop_id: source.shop_id,
                staff_id: source.staff_id,
                client_name: source.client_name.clone(),
                date,
                time,
                duration_minutes: source.duration_minutes,
                notes: source.notes.clone(),
                source_appointment_id: Some(source.id),
            };
            match state.backend.book_appointment(appointment) {
                Ok(appointment) => {
                    info!(appointment_id = %appointment.id, source_id = %source.id, "recurring appointment booked");
                    Json(appointment).into_response()
                }
                Err(err) => err.into_response(),
            }
        }
        Ok(RecurrenceCheck::Unavailable { date }) => (
            StatusCode::CONFLICT,
            Json(json!({ "error": "slot is no longer available", "date": date })),
        )
            .into_response(),
        Err(err) => err.into_response(),
    }
}

async fn set_shop_hours<B: SchedulingBackend, K: Clock>(
    State(state): State<AppState<B, K>>,
    Json(request): Json<ShopHoursRequest>,
) -> Response {
    if let Err(err) = validate_shop_schedule(&request.windows) {
        return err.into_response();
    }
    state
        .backend
        .set_shop_schedule(request.shop_id, request.windows);
    (StatusCode::OK, "Shop hours updated".to_string()).into_response()
}

async fn set_staff_hours<B: SchedulingBackend, K: Clock>(
    State(state): State<AppState<B, K>>,
    Json(request): Json<StaffHoursRequest>,
) -> Response {
    if let Err(err) = validate_staff_schedule(&request.windows) {
        return err.into_response();
    }
    state
        .backend
        .set_staff_schedule(request.shop_id, request.staff_id, request.windows);
    (StatusCode::OK, "Staff hours updated".to_string()).into_response()
}

async fn cancel_appointment<B: SchedulingBackend, K: Clock>(
    State(state): State<AppState<B, K>>,
    Json(request): Json<CancelRequest>,
) -> Response {
    match state.backend.cancel_appointment(request.appointment_id) {
        Ok(()) => (StatusCode::OK, "Appointment cancelled".to_string()).into_response(),
        Err(err) => err.into_response(),
    }
}
