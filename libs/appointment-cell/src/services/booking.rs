// libs/appointment-cell/src/services/booking.rs
use std::sync::Arc;

use tracing::{error, info, warn};
use uuid::Uuid;

use availability_cell::services::store::SlotStore;
use shared_models::error::BookingError;

use crate::models::Appointment;
use crate::services::store::AppointmentStore;

/// Orchestrates slot reservation and appointment creation as one unit of
/// work. This is the only writer that may flip a slot from free to booked.
pub struct BookingEngine {
    slots: Arc<SlotStore>,
    appointments: Arc<AppointmentStore>,
}

impl BookingEngine {
    pub fn new(slots: Arc<SlotStore>, appointments: Arc<AppointmentStore>) -> Self {
        Self {
            slots,
            appointments,
        }
    }

    /// Reserve `slot_id` for `patient_id` and create the pending
    /// appointment. Under concurrent attempts on the same slot exactly one
    /// caller wins; the rest get `SlotAlreadyBooked`.
    pub async fn book(
        &self,
        patient_id: Uuid,
        slot_id: Uuid,
    ) -> Result<Appointment, BookingError> {
        // The conditional flip is the reservation guard: it refuses a slot
        // that is already booked, atomically with respect to every other
        // slot operation.
        let slot = self.slots.mark_booked(slot_id).await?;

        match self
            .appointments
            .create(patient_id, slot.doctor_id, slot_id)
            .await
        {
            Ok(appointment) => {
                info!(
                    "Appointment {} booked: patient {} reserved slot {} of doctor {}",
                    appointment.appointment_id, patient_id, slot_id, slot.doctor_id
                );
                Ok(appointment)
            }
            Err(err) => {
                // The uniqueness backstop fired: an active appointment
                // already references this slot. Release the reservation so
                // no partial state survives.
                warn!(
                    "Appointment creation for slot {} failed after reservation: {}",
                    slot_id, err
                );
                if let Err(release_err) = self.slots.mark_free(slot_id).await {
                    error!(
                        "Failed to release slot {} after aborted booking: {}",
                        slot_id, release_err
                    );
                    return Err(release_err);
                }
                Err(err)
            }
        }
    }
}
