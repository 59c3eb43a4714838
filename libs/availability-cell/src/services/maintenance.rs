// libs/availability-cell/src/services/maintenance.rs
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use shared_models::error::BookingError;

use crate::models::{CreateSlotRequest, Slot, UpdateSlotRequest};
use crate::services::store::SlotStore;
use crate::services::validation::validate_slot_times;

/// Doctor-initiated slot maintenance. Only the owning doctor may mutate or
/// delete a slot; the store enforces the no-mutation-while-booked rule.
pub struct SlotMaintenanceService {
    slots: Arc<SlotStore>,
}

impl SlotMaintenanceService {
    pub fn new(slots: Arc<SlotStore>) -> Self {
        Self { slots }
    }

    pub async fn create_slot(
        &self,
        acting_doctor_id: Uuid,
        request: CreateSlotRequest,
    ) -> Result<Slot, BookingError> {
        debug!("Creating slot for doctor {}", acting_doctor_id);

        let (start, end) = validate_slot_times(
            request.date,
            request.start_time,
            request.duration_minutes,
            Utc::now(),
        )?;

        let slot = self.slots.create(acting_doctor_id, start, end).await?;
        info!("Doctor {} published slot {}", acting_doctor_id, slot.slot_id);
        Ok(slot)
    }

    pub async fn update_slot(
        &self,
        acting_doctor_id: Uuid,
        slot_id: Uuid,
        request: UpdateSlotRequest,
    ) -> Result<Slot, BookingError> {
        let slot = self.slots.get(slot_id).await?;
        if slot.doctor_id != acting_doctor_id {
            return Err(BookingError::Forbidden(
                "only the owning doctor may edit a slot".to_string(),
            ));
        }

        let (start, end) = validate_slot_times(
            request.date,
            request.start_time,
            request.duration_minutes,
            Utc::now(),
        )?;

        self.slots.update_time(slot_id, start, end).await
    }

    pub async fn delete_slot(
        &self,
        acting_doctor_id: Uuid,
        slot_id: Uuid,
    ) -> Result<(), BookingError> {
        let slot = self.slots.get(slot_id).await?;
        if slot.doctor_id != acting_doctor_id {
            return Err(BookingError::Forbidden(
                "only the owning doctor may delete a slot".to_string(),
            ));
        }

        self.slots.delete(slot_id).await?;
        info!("Doctor {} deleted slot {}", acting_doctor_id, slot_id);
        Ok(())
    }

    pub async fn list_slots(&self, doctor_id: Uuid) -> Vec<Slot> {
        self.slots.list_for_doctor(doctor_id).await
    }
}
