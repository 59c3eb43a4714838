// libs/availability-cell/src/handlers.rs
use axum::{
    extract::{Extension, Path, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::{CreateSlotRequest, DoctorSlotsResponse, UpdateSlotRequest};
use crate::services::maintenance::SlotMaintenanceService;
use crate::AvailabilityState;

fn actor_id(user: &User) -> Result<Uuid, AppError> {
    Uuid::parse_str(&user.id).map_err(|_| AppError::Auth("Invalid user id in token".to_string()))
}

fn require_doctor(user: &User) -> Result<Uuid, AppError> {
    if !user.is_doctor() {
        return Err(AppError::Forbidden(
            "Only doctors may manage availability slots".to_string(),
        ));
    }
    actor_id(user)
}

/// Publish a new availability slot for the authenticated doctor.
#[axum::debug_handler]
pub async fn create_slot(
    State(state): State<AvailabilityState>,
    Extension(user): Extension<User>,
    Json(request): Json<CreateSlotRequest>,
) -> Result<Json<Value>, AppError> {
    let doctor_id = require_doctor(&user)?;

    let service = SlotMaintenanceService::new(state.slots.clone());
    let slot = service.create_slot(doctor_id, request).await?;

    Ok(Json(json!({
        "success": true,
        "slot": slot
    })))
}

/// List a doctor's published slots, decorated with the profile the external
/// directory knows about.
#[axum::debug_handler]
pub async fn list_doctor_slots(
    State(state): State<AvailabilityState>,
    Extension(_user): Extension<User>,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<DoctorSlotsResponse>, AppError> {
    let service = SlotMaintenanceService::new(state.slots.clone());
    let slots = service.list_slots(doctor_id).await;
    let doctor = state.directory.lookup(doctor_id).await;

    Ok(Json(DoctorSlotsResponse { doctor, slots }))
}

/// Move a slot to a new time. Only the owning doctor; only while unbooked.
#[axum::debug_handler]
pub async fn update_slot(
    State(state): State<AvailabilityState>,
    Extension(user): Extension<User>,
    Path(slot_id): Path<Uuid>,
    Json(request): Json<UpdateSlotRequest>,
) -> Result<Json<Value>, AppError> {
    let doctor_id = require_doctor(&user)?;

    let service = SlotMaintenanceService::new(state.slots.clone());
    let slot = service.update_slot(doctor_id, slot_id, request).await?;

    Ok(Json(json!({
        "success": true,
        "slot": slot
    })))
}

/// Delete an unbooked slot. Only the owning doctor.
#[axum::debug_handler]
pub async fn delete_slot(
    State(state): State<AvailabilityState>,
    Extension(user): Extension<User>,
    Path(slot_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let doctor_id = require_doctor(&user)?;

    let service = SlotMaintenanceService::new(state.slots.clone());
    service.delete_slot(doctor_id, slot_id).await?;

    Ok(Json(json!({
        "success": true,
        "deleted": slot_id
    })))
}
