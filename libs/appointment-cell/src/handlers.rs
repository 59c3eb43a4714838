// libs/appointment-cell/src/handlers.rs
use axum::{
    extract::{Extension, Path, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::{Actor, BookAppointmentRequest};
use crate::services::booking::BookingEngine;
use crate::services::lifecycle::AppointmentLifecycleService;
use crate::AppointmentState;

fn actor_id(user: &User) -> Result<Uuid, AppError> {
    Uuid::parse_str(&user.id).map_err(|_| AppError::Auth("Invalid user id in token".to_string()))
}

fn actor(user: &User) -> Result<Actor, AppError> {
    let id = actor_id(user)?;
    if user.is_doctor() {
        Ok(Actor::Doctor(id))
    } else {
        Ok(Actor::Patient(id))
    }
}

/// Reserve a slot for the authenticated patient.
#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<AppointmentState>,
    Extension(user): Extension<User>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    if !user.is_patient() {
        return Err(AppError::Forbidden(
            "Only patients may book appointments".to_string(),
        ));
    }
    let patient_id = actor_id(&user)?;

    let engine = BookingEngine::new(state.slots.clone(), state.appointments.clone());
    let appointment = engine.book(patient_id, request.slot_id).await?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment
    })))
}

/// Fetch one appointment. Restricted to its patient and doctor.
#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<AppointmentState>,
    Extension(user): Extension<User>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let id = actor_id(&user)?;

    let appointment = state.appointments.get(appointment_id).await.map_err(AppError::from)?;
    if appointment.patient_id != id && appointment.doctor_id != id {
        return Err(AppError::Forbidden(
            "Not a participant in this appointment".to_string(),
        ));
    }

    Ok(Json(json!({ "appointment": appointment })))
}

/// List the authenticated patient's appointments, newest first.
#[axum::debug_handler]
pub async fn get_patient_appointments(
    State(state): State<AppointmentState>,
    Extension(user): Extension<User>,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let id = actor_id(&user)?;
    if id != patient_id {
        return Err(AppError::Forbidden(
            "Patients may only list their own appointments".to_string(),
        ));
    }

    let appointments = state.appointments.list_for_patient(patient_id).await;
    Ok(Json(json!({ "appointments": appointments })))
}

/// List the authenticated doctor's appointments, newest first.
#[axum::debug_handler]
pub async fn get_doctor_appointments(
    State(state): State<AppointmentState>,
    Extension(user): Extension<User>,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let id = actor_id(&user)?;
    if id != doctor_id {
        return Err(AppError::Forbidden(
            "Doctors may only list their own appointments".to_string(),
        ));
    }

    let appointments = state.appointments.list_for_doctor(doctor_id).await;
    Ok(Json(json!({ "appointments": appointments })))
}

/// Doctor accepts a pending appointment.
#[axum::debug_handler]
pub async fn accept_appointment(
    State(state): State<AppointmentState>,
    Extension(user): Extension<User>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    if !user.is_doctor() {
        return Err(AppError::Forbidden(
            "Only doctors may accept appointments".to_string(),
        ));
    }
    let doctor_id = actor_id(&user)?;

    let lifecycle =
        AppointmentLifecycleService::new(state.slots.clone(), state.appointments.clone());
    let appointment = lifecycle.accept(appointment_id, doctor_id).await?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment
    })))
}

/// Cancel an appointment as its patient or doctor. Cancelling releases the
/// slot for rebooking.
#[axum::debug_handler]
pub async fn cancel_appointment(
    State(state): State<AppointmentState>,
    Extension(user): Extension<User>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let acting = actor(&user)?;

    let lifecycle =
        AppointmentLifecycleService::new(state.slots.clone(), state.appointments.clone());
    let appointment = lifecycle.cancel(appointment_id, acting).await?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment
    })))
}
