// libs/appointment-cell/src/services/lifecycle.rs
use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use availability_cell::services::store::SlotStore;
use shared_models::error::BookingError;

use crate::models::{Actor, Appointment, AppointmentStatus};
use crate::services::store::AppointmentStore;

/// Enforces legal appointment status transitions and releases the slot on
/// cancellation. The only writer that may flip a slot back to free.
pub struct AppointmentLifecycleService {
    slots: Arc<SlotStore>,
    appointments: Arc<AppointmentStore>,
}

impl AppointmentLifecycleService {
    pub fn new(slots: Arc<SlotStore>, appointments: Arc<AppointmentStore>) -> Self {
        Self {
            slots,
            appointments,
        }
    }

    /// Doctor accepts a pending appointment.
    pub async fn accept(
        &self,
        appointment_id: Uuid,
        acting_doctor_id: Uuid,
    ) -> Result<Appointment, BookingError> {
        debug!(
            "Doctor {} accepting appointment {}",
            acting_doctor_id, appointment_id
        );

        let appointment = self.appointments.get(appointment_id).await?;
        if appointment.doctor_id != acting_doctor_id {
            return Err(BookingError::Forbidden(
                "only the appointment's doctor may accept it".to_string(),
            ));
        }

        let confirmed = self
            .appointments
            .set_status(appointment_id, AppointmentStatus::Confirmed)
            .await?;

        info!("Appointment {} confirmed", appointment_id);
        Ok(confirmed)
    }

    /// Cancel by the owning patient or doctor, from either `pending` or
    /// `confirmed`. The referenced slot is released as part of the same unit
    /// of work; cancel does not report success until the slot is free again.
    pub async fn cancel(
        &self,
        appointment_id: Uuid,
        actor: Actor,
    ) -> Result<Appointment, BookingError> {
        let appointment = self.appointments.get(appointment_id).await?;

        match actor {
            Actor::Patient(id) if id == appointment.patient_id => {}
            Actor::Doctor(id) if id == appointment.doctor_id => {}
            _ => {
                return Err(BookingError::Forbidden(
                    "only the owning patient or doctor may cancel".to_string(),
                ))
            }
        }

        let cancelled = self
            .appointments
            .set_status(appointment_id, AppointmentStatus::Cancelled)
            .await?;

        self.slots.mark_free(cancelled.slot_id).await?;

        info!(
            "Appointment {} cancelled by {:?}, slot {} released",
            appointment_id, actor, cancelled.slot_id
        );
        Ok(cancelled)
    }
}
